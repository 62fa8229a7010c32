use serde::Serialize;
use tracing::{debug, info, warn};

use crate::ai::collaborator::MappingCollaborator;
use crate::ai::correlation::CorrelationTable;
use crate::ai::mapping_model::{AiMapping, MappingRequest, UnmatchedEntry};
use crate::document::adapter::DocumentAdapter;
use crate::fill::executor::fill;
use crate::matching::resolver::CandidateInput;
use crate::profile::profile_model::Profile;
use crate::report::report_model::FilledInput;

/// Marker class present on unresolved controls while the collaborator runs.
pub const PENDING_CLASS: &str = "formfill-ai-pending";

/// What the fallback pass did.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FallbackOutcome {
    /// Heuristics resolved every control.
    NotNeeded,
    /// Controls were left over but no collaborator is configured.
    Disabled { unresolved: usize },
    Completed {
        filled: Vec<FilledInput>,
        /// Controls answered with null or with a key the profile lacks.
        unmatched: usize,
        /// Identifiers in the reply that this pass never issued.
        stale: usize,
    },
    /// The collaborator call failed; nothing was filled by this pass.
    Failed { reason: String },
}

impl FallbackOutcome {
    pub fn filled(&self) -> &[FilledInput] {
        match self {
            FallbackOutcome::Completed { filled, .. } => filled,
            _ => &[],
        }
    }
}

/// Ask the collaborator about every control the heuristic pass left over,
/// then fill the ones it maps to a known profile key.
///
/// Best effort: failures are logged and reported in the outcome, never
/// propagated. The pending marker is removed from every control on all paths.
pub fn run_fallback<D>(
    doc: &mut D,
    unresolved: &[CandidateInput],
    profile: &Profile,
    collaborator: &dyn MappingCollaborator,
) -> FallbackOutcome
where
    D: DocumentAdapter + ?Sized,
{
    if unresolved.is_empty() {
        return FallbackOutcome::NotNeeded;
    }

    info!(
        count = unresolved.len(),
        "fields not matched by heuristics, trying AI"
    );

    for input in unresolved {
        if let Err(e) = doc.add_class(input.handle, PENDING_CLASS) {
            debug!(input = %input.handle, error = %e, "could not mark input pending");
        }
    }

    let table = CorrelationTable::build(unresolved);
    let request = MappingRequest {
        form_fields: table
            .unmatched_entries()
            .iter()
            .map(UnmatchedEntry::to_form_field)
            .collect(),
        profile_keys: profile.keys(),
    };

    let outcome = match collaborator.map_fields(&request) {
        Ok(mapping) => apply_mapping(doc, &table, &mapping, profile),
        Err(e) => {
            warn!(error = %e, "AI mapping failed");
            FallbackOutcome::Failed {
                reason: e.to_string(),
            }
        }
    };

    for input in unresolved {
        if let Err(e) = doc.remove_class(input.handle, PENDING_CLASS) {
            debug!(input = %input.handle, error = %e, "could not clear pending marker");
        }
    }

    outcome
}

fn apply_mapping<D>(
    doc: &mut D,
    table: &CorrelationTable,
    mapping: &AiMapping,
    profile: &Profile,
) -> FallbackOutcome
where
    D: DocumentAdapter + ?Sized,
{
    let mut filled = Vec::new();
    let mut unmatched = 0;

    for (token, input) in table.iter() {
        let Some(key) = mapping.key_for(token) else {
            unmatched += 1;
            continue;
        };

        let Some(field) = profile.field_by_key(key) else {
            debug!(identifier = token, key, "mapped key not in profile");
            unmatched += 1;
            continue;
        };

        if fill(doc, input.handle, &field.value) {
            filled.push(FilledInput::from_ai(input, field));
        }
    }

    let stale = mapping
        .identifiers()
        .filter(|id| table.lookup(id).is_none())
        .count();
    if stale > 0 {
        debug!(stale, "ignored identifiers not issued in this pass");
    }

    info!(filled = filled.len(), unmatched, "AI fallback complete");

    FallbackOutcome::Completed {
        filled,
        unmatched,
        stale,
    }
}
