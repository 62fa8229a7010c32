use std::time::Duration;

use tracing::debug;

use crate::ai::mapping_model::{AiMapping, MappingEnvelope, MappingRequest};
use crate::error::MappingError;

pub const DEFAULT_WORKER_ENDPOINT: &str = "http://127.0.0.1:8787/api/map-field";

/// Remote party that picks a profile key for each unresolved control.
///
/// One call per fill pass. Any error means the whole call failed; there are
/// no partial results.
pub trait MappingCollaborator {
    fn map_fields(&self, request: &MappingRequest) -> Result<AiMapping, MappingError>;
}

// ============================================================================
// Worker client: POSTs the request to the mapping endpoint
// ============================================================================

pub struct WorkerClient {
    pub endpoint: String,
    client: reqwest::blocking::Client,
}

impl Default for WorkerClient {
    fn default() -> Self {
        Self::new(DEFAULT_WORKER_ENDPOINT)
    }
}

impl WorkerClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Client whose requests give up after `timeout`.
    pub fn with_timeout(endpoint: &str, timeout: Duration) -> Result<Self, MappingError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            endpoint: endpoint.to_string(),
            client,
        })
    }
}

impl MappingCollaborator for WorkerClient {
    fn map_fields(&self, request: &MappingRequest) -> Result<AiMapping, MappingError> {
        debug!(endpoint = %self.endpoint, fields = request.form_fields.len(), "requesting field mapping");

        let response = self.client.post(&self.endpoint).json(request).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(MappingError::Status(status.as_u16()));
        }

        let body = response.text()?;
        parse_envelope(&body)
    }
}

/// Unwrap a `{ success, data | error }` reply.
pub fn parse_envelope(body: &str) -> Result<AiMapping, MappingError> {
    let envelope: MappingEnvelope =
        serde_json::from_str(body).map_err(|e| MappingError::MalformedResponse {
            context: "mapping envelope".into(),
            source: e,
        })?;

    if envelope.success {
        envelope.data.ok_or(MappingError::MissingData)
    } else {
        Err(MappingError::Rejected(envelope.error.unwrap_or_else(|| {
            "AI mapping failed in background script.".to_string()
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_yields_mapping() {
        let mapping =
            parse_envelope(r#"{"success":true,"data":{"input_0":"email","input_1":null}}"#)
                .unwrap();
        assert_eq!(mapping.key_for("input_0"), Some("email"));
        assert_eq!(mapping.key_for("input_1"), None);
    }

    #[test]
    fn failure_envelope_is_rejected() {
        let err = parse_envelope(r#"{"success":false,"error":"AI response was not valid JSON."}"#)
            .unwrap_err();
        assert!(matches!(err, MappingError::Rejected(msg) if msg.contains("not valid JSON")));
    }

    #[test]
    fn success_without_data_is_an_error() {
        assert!(matches!(
            parse_envelope(r#"{"success":true}"#),
            Err(MappingError::MissingData)
        ));
    }

    #[test]
    fn non_json_and_wrong_shapes_are_malformed() {
        for body in ["<html>502</html>", r#"{"data":{}}"#, r#"{"success":true,"data":{"input_0":7}}"#] {
            assert!(
                matches!(parse_envelope(body), Err(MappingError::MalformedResponse { .. })),
                "{}",
                body
            );
        }
    }
}
