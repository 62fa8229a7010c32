use tracing::debug;

use crate::document::adapter::{DocumentAdapter, InputHandle};
use crate::error::DocumentError;
use crate::matching::normalize::normalize;
use crate::matching::scorer::Scorer;
use crate::profile::profile_model::ProfileField;

/// A fillable control together with the raw text the matcher reads from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateInput {
    pub handle: InputHandle,
    pub label: String,
    pub placeholder: String,
    pub name: String,
    pub id: String,
}

impl CandidateInput {
    /// Label, placeholder, name and id joined with spaces, then normalized.
    pub fn input_text(&self) -> String {
        normalize(
            format!(
                "{} {} {} {}",
                self.label, self.placeholder, self.name, self.id
            )
            .as_str(),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub input: CandidateInput,
    pub field: ProfileField,
    pub score: f32,
}

/// Outcome of the heuristic pass. Both lists keep document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub resolved: Vec<MatchResult>,
    pub unresolved: Vec<CandidateInput>,
}

/// Read every fillable control on the page, in document order.
pub fn read_candidates<D>(doc: &mut D) -> Result<Vec<CandidateInput>, DocumentError>
where
    D: DocumentAdapter + ?Sized,
{
    let handles = doc.fillable_inputs()?;
    let mut candidates = Vec::with_capacity(handles.len());

    for handle in handles {
        let label = doc.associated_label_text(handle)?.unwrap_or_default();
        let attrs = doc.attributes(handle)?;

        candidates.push(CandidateInput {
            handle,
            label,
            placeholder: attrs.placeholder.unwrap_or_default(),
            name: attrs.name.unwrap_or_default(),
            id: attrs.id.unwrap_or_default(),
        });
    }

    Ok(candidates)
}

/// Partition candidates into heuristic matches and leftovers.
pub fn resolve(
    inputs: Vec<CandidateInput>,
    fields: &[ProfileField],
    scorer: &Scorer,
) -> Resolution {
    let mut resolution = Resolution::default();

    for input in inputs {
        let text = input.input_text();

        match scorer.best_match(&text, fields) {
            Some((field, score)) if Scorer::accepts(score) => {
                debug!(input = %input.handle, key = %field.key, score, "heuristic match");
                resolution.resolved.push(MatchResult {
                    input,
                    field: field.clone(),
                    score,
                });
            }
            _ => {
                debug!(input = %input.handle, text = %text, "no heuristic match");
                resolution.unresolved.push(input);
            }
        }
    }

    resolution
}
