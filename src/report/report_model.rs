use serde::Serialize;

use crate::ai::orchestrator::FallbackOutcome;
use crate::document::adapter::InputHandle;
use crate::matching::resolver::{CandidateInput, MatchResult};
use crate::profile::profile_model::ProfileField;

// ============================================================================
// Fill report: what one match-and-fill pass did
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FillSource {
    Heuristic,
    Ai,
}

/// One control that received a value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilledInput {
    pub input: InputHandle,
    /// Human-facing name of the control (label, name, id or placeholder)
    pub descriptor: String,
    /// Profile key whose value was written
    pub key: String,
    pub source: FillSource,
    /// Heuristic confidence; absent for AI fills
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl FilledInput {
    pub fn from_match(m: &MatchResult) -> Self {
        Self {
            input: m.input.handle,
            descriptor: describe(&m.input),
            key: m.field.key.clone(),
            source: FillSource::Heuristic,
            score: Some(m.score),
        }
    }

    pub fn from_ai(input: &CandidateInput, field: &ProfileField) -> Self {
        Self {
            input: input.handle,
            descriptor: describe(input),
            key: field.key.clone(),
            source: FillSource::Ai,
            score: None,
        }
    }
}

fn describe(input: &CandidateInput) -> String {
    [&input.label, &input.name, &input.id, &input.placeholder]
        .into_iter()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| input.handle.to_string())
}

/// Summary of a pass. Purely informational; the pass itself never fails.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FillReport {
    pub profile_name: String,

    /// Fillable controls found on the page
    pub inputs_scanned: usize,

    /// Controls filled by the heuristic pass, in document order
    pub heuristic: Vec<FilledInput>,

    /// Controls the heuristic pass left for the fallback
    pub unresolved: usize,

    pub fallback: FallbackOutcome,
}

impl FillReport {
    pub fn empty(profile_name: &str) -> Self {
        Self {
            profile_name: profile_name.to_string(),
            inputs_scanned: 0,
            heuristic: Vec::new(),
            unresolved: 0,
            fallback: FallbackOutcome::NotNeeded,
        }
    }

    /// Heuristic fills followed by AI fills.
    pub fn filled(&self) -> impl Iterator<Item = &FilledInput> {
        self.heuristic.iter().chain(self.fallback.filled())
    }

    pub fn filled_count(&self) -> usize {
        self.heuristic.len() + self.fallback.filled().len()
    }

    /// Controls still empty-handed after both passes.
    pub fn left_unfilled(&self) -> usize {
        self.inputs_scanned - self.filled_count()
    }
}
