use tracing::{info, warn};
use uuid::Uuid;

use crate::ai::collaborator::MappingCollaborator;
use crate::ai::orchestrator::{FallbackOutcome, run_fallback};
use crate::document::adapter::DocumentAdapter;
use crate::error::DocumentError;
use crate::fill::executor::fill;
use crate::fill::extract;
use crate::matching::resolver::{read_candidates, resolve};
use crate::matching::scorer::Scorer;
use crate::profile::profile_model::{FormEntry, Profile};
use crate::report::report_model::{FillReport, FilledInput};
use crate::trace::logger::TraceLogger;

/// Matches profile fields to the controls of a page and fills them.
///
/// Holds configuration only; every call rescans the page. The exclusive
/// borrow on the document keeps a single pass in flight per page.
#[derive(Default)]
pub struct FillEngine {
    scorer: Scorer,
    collaborator: Option<Box<dyn MappingCollaborator>>,
    tracer: Option<TraceLogger>,
}

impl FillEngine {
    pub fn new(scorer: Scorer) -> Self {
        Self {
            scorer,
            collaborator: None,
            tracer: None,
        }
    }

    pub fn with_collaborator(mut self, collaborator: Box<dyn MappingCollaborator>) -> Self {
        self.collaborator = Some(collaborator);
        self
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = Some(tracer);
        self
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    /// Resolve, fill heuristic matches, then run the AI fallback for the rest.
    ///
    /// Never fails: page and collaborator problems are logged and reflected
    /// in the report.
    pub fn match_and_fill(&self, doc: &mut dyn DocumentAdapter, profile: &Profile) -> FillReport {
        self.match_and_fill_with(doc, profile, self.collaborator.as_deref())
    }

    /// Same as [`FillEngine::match_and_fill`] with a borrowed collaborator
    /// in place of the configured one.
    pub fn match_and_fill_with(
        &self,
        doc: &mut dyn DocumentAdapter,
        profile: &Profile,
        collaborator: Option<&dyn MappingCollaborator>,
    ) -> FillReport {
        let pass = Uuid::new_v4().to_string();

        let candidates = match read_candidates(&mut *doc) {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "could not read fillable inputs");
                return FillReport::empty(&profile.name);
            }
        };

        let inputs_scanned = candidates.len();
        let resolution = resolve(candidates, &profile.fields, &self.scorer);

        // Heuristic fills land before the collaborator is ever consulted.
        let mut heuristic = Vec::with_capacity(resolution.resolved.len());
        for m in &resolution.resolved {
            if fill(&mut *doc, m.input.handle, &m.field.value) {
                heuristic.push(FilledInput::from_match(m));
            }
        }

        info!(
            profile = %profile.name,
            scanned = inputs_scanned,
            filled = heuristic.len(),
            unresolved = resolution.unresolved.len(),
            "heuristic pass complete"
        );

        let fallback = match collaborator {
            _ if resolution.unresolved.is_empty() => FallbackOutcome::NotNeeded,
            Some(collaborator) => {
                run_fallback(&mut *doc, &resolution.unresolved, profile, collaborator)
            }
            None => FallbackOutcome::Disabled {
                unresolved: resolution.unresolved.len(),
            },
        };

        let report = FillReport {
            profile_name: profile.name.clone(),
            inputs_scanned,
            heuristic,
            unresolved: resolution.unresolved.len(),
            fallback,
        };

        if let Some(tracer) = &self.tracer {
            tracer.record_pass(&pass, report.filled());
        }

        report
    }

    /// Capture the populated controls of the first visible form.
    pub fn extract_form_data(
        &self,
        doc: &mut dyn DocumentAdapter,
    ) -> Result<Vec<FormEntry>, DocumentError> {
        extract::extract_form_data(doc)
    }
}
