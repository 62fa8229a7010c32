use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ai::collaborator::MappingCollaborator;
use crate::ai::mapping_model::{AiMapping, MappingEnvelope, MappingRequest};
use crate::error::MappingError;

// ============================================================================
// Ollama-backed mapper
// ============================================================================

/// Field mapper that asks a local Ollama model directly.
pub struct OllamaMapper {
    pub endpoint: String,
    pub model: String,
    client: reqwest::blocking::Client,
}

impl Default for OllamaMapper {
    fn default() -> Self {
        Self::new("http://localhost:11434/api/generate", "qwen2.5:1.5b")
    }
}

#[derive(Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
    format: &'static str,
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
}

impl OllamaMapper {
    pub fn new(endpoint: &str, model: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            client: reqwest::blocking::Client::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, MappingError> {
        self.client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(self)
    }

    pub fn build_prompt(request: &MappingRequest) -> String {
        // Vec<struct>/Vec<String> serialization cannot fail.
        let fields = serde_json::to_string(&request.form_fields).unwrap_or_default();
        let keys = serde_json::to_string(&request.profile_keys).unwrap_or_default();

        format!(
r#"You are an expert form-filling AI. Your task is to map form field identifiers to user profile keys.
Analyze the following form fields and user profile keys.
For each form field, determine the best matching profile key.

Form Fields: {}
Profile Keys: {}

Respond with a JSON object where keys are the form field identifiers and values are the best-matched profile key.
If no good match is found for a form field, use the value null.
Example response:
{{
  "input_0": "email",
  "input_1": "firstName",
  "input_2": null
}}

Respond with ONLY valid JSON, no explanation."#,
            fields, keys
        )
    }
}

/// Parse the model's reply. Anything other than a JSON object of strings or
/// nulls fails the whole call. A literal `"null"` string counts as null.
pub fn parse_mapping_reply(reply: &str) -> Result<AiMapping, MappingError> {
    let raw: HashMap<String, Option<String>> =
        serde_json::from_str(reply.trim()).map_err(|e| MappingError::MalformedResponse {
            context: "model reply".into(),
            source: e,
        })?;

    Ok(AiMapping(
        raw.into_iter()
            .map(|(id, key)| (id, key.filter(|k| k != "null")))
            .collect(),
    ))
}

impl MappingCollaborator for OllamaMapper {
    fn map_fields(&self, request: &MappingRequest) -> Result<AiMapping, MappingError> {
        let prompt = Self::build_prompt(request);

        let body = OllamaRequest {
            model: self.model.clone(),
            prompt,
            stream: false,
            format: "json",
        };

        debug!(endpoint = %self.endpoint, model = %self.model, "querying model for field mapping");

        let response = self.client.post(&self.endpoint).json(&body).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(MappingError::Status(status.as_u16()));
        }

        let text = response.text()?;
        let ollama: OllamaResponse =
            serde_json::from_str(&text).map_err(|e| MappingError::MalformedResponse {
                context: "ollama response".into(),
                source: e,
            })?;

        parse_mapping_reply(&ollama.response)
    }
}

/// Run a collaborator and wrap the outcome in the endpoint envelope.
pub fn respond(collaborator: &dyn MappingCollaborator, request: &MappingRequest) -> MappingEnvelope {
    match collaborator.map_fields(request) {
        Ok(mapping) => MappingEnvelope::ok(mapping),
        Err(e @ MappingError::MalformedResponse { .. }) => {
            warn!(error = %e, "failed to parse AI mapping response");
            MappingEnvelope::failed("AI response was not valid JSON.")
        }
        Err(e) => {
            warn!(error = %e, "AI mapping error");
            MappingEnvelope::failed("Failed to process AI field mapping.")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::mapping_model::FormFieldContext;

    #[test]
    fn prompt_embeds_fields_and_keys() {
        let request = MappingRequest {
            form_fields: vec![FormFieldContext {
                identifier: "input_0".into(),
                context: r#"Label: "", Placeholder: "", Name: "", ID: "field7""#.into(),
            }],
            profile_keys: vec!["company".into()],
        };
        let prompt = OllamaMapper::build_prompt(&request);
        assert!(prompt.contains(r#""identifier":"input_0""#));
        assert!(prompt.contains(r#"Profile Keys: ["company"]"#));
    }

    #[test]
    fn reply_with_null_string_is_null() {
        let mapping = parse_mapping_reply(r#" {"input_0":"email","input_1":"null","input_2":null} "#)
            .unwrap();
        assert_eq!(mapping.key_for("input_0"), Some("email"));
        assert_eq!(mapping.key_for("input_1"), None);
        assert_eq!(mapping.key_for("input_2"), None);
    }

    #[test]
    fn prose_reply_fails_whole_call() {
        assert!(parse_mapping_reply("Sure! Here is the mapping: {}").is_err());
        assert!(parse_mapping_reply(r#"["email"]"#).is_err());
    }
}
