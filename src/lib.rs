use crate::{
    ai::collaborator::MappingCollaborator,
    document::adapter::DocumentAdapter,
    engine::FillEngine,
    error::DocumentError,
    profile::profile_model::{FormEntry, Profile},
    report::report_model::FillReport,
};

pub mod ai;
pub mod browser;
pub mod cli;
pub mod document;
pub mod engine;
pub mod error;
pub mod fill;
pub mod matching;
pub mod profile;
pub mod report;
pub mod trace;

/// Fill every control on the page that a profile field can be matched to,
/// using the built-in synonym dictionary.
///
/// Heuristic matches are written first. Whatever is left goes to
/// `collaborator` in a single batched call, when one is given. Problems are
/// logged, never returned.
pub fn match_and_fill(
    doc: &mut dyn DocumentAdapter,
    profile: &Profile,
    collaborator: Option<&dyn MappingCollaborator>,
) -> FillReport {
    FillEngine::default().match_and_fill_with(doc, profile, collaborator)
}

/// Capture the populated controls of the first visible form as key/value
/// pairs, ready to become a new profile.
pub fn extract_form_data(doc: &mut dyn DocumentAdapter) -> Result<Vec<FormEntry>, DocumentError> {
    fill::extract::extract_form_data(doc)
}
