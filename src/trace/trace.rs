use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::report::report_model::{FillSource, FilledInput};

/// One line of the fill trace.
#[derive(Debug, Serialize)]
pub struct FillEvent {
    pub timestamp_ms: u128,
    /// Identifies the match-and-fill pass the fill belongs to
    pub pass: String,

    pub source: FillSource,
    pub input: String,
    pub descriptor: String,
    pub key: String,

    pub score: Option<f32>,
}

impl FillEvent {
    pub fn now(pass: &str, filled: &FilledInput) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            pass: pass.to_string(),
            source: filled.source,
            input: filled.input.to_string(),
            descriptor: filled.descriptor.clone(),
            key: filled.key.clone(),
            score: filled.score,
        }
    }
}
