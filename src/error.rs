use thiserror::Error;

use crate::document::adapter::InputHandle;

/// Failures talking to the page, whether through the browser helper process
/// or a loaded snapshot.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Node.js helper failed to spawn
    #[error("Failed to spawn {script} (is Node.js installed?): {source}")]
    SubprocessSpawn {
        script: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading from or writing to the helper's pipes failed
    #[error("Browser session I/O error: {0}")]
    SessionIO(String),

    /// The helper answered with `ok: false` or an unexpected shape
    #[error("Browser command '{command}' failed: {error}")]
    SessionProtocol { command: String, error: String },

    #[error("JSON parse error ({context}): {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON serialize error ({context}): {source}")]
    JsonSerialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Handle was never handed out by this document, or the input is gone
    #[error("Input {0} is not part of the current document")]
    UnknownInput(InputHandle),

    /// Page snapshot could not be read
    #[error("Invalid page snapshot: {0}")]
    Snapshot(String),
}

/// Failures of the remote field-mapping call. The orchestrator treats every
/// variant the same way: the fallback pass is abandoned.
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("Mapping request could not be sent: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Mapping endpoint responded with status: {0}")]
    Status(u16),

    /// Collaborator replied `{ success: false, error }`
    #[error("Mapping rejected: {0}")]
    Rejected(String),

    #[error("Malformed mapping response ({context}): {source}")]
    MalformedResponse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Mapping response reported success without data")]
    MissingData,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access profile store '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse profiles: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid profile format: {0}")]
    InvalidFormat(String),

    #[error("Profile not found: {0}")]
    NotFound(String),
}
