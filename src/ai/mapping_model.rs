use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ============================================================================
// Wire shapes exchanged with the field-mapping collaborator
// ============================================================================

/// Raw context of one unresolved control, keyed by its per-pass identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmatchedEntry {
    pub identifier: String,
    pub label: String,
    pub placeholder: String,
    pub name: String,
    pub id: String,
}

impl UnmatchedEntry {
    /// One human-readable line summarizing the control for the model.
    pub fn context(&self) -> String {
        format!(
            r#"Label: "{}", Placeholder: "{}", Name: "{}", ID: "{}""#,
            self.label, self.placeholder, self.name, self.id
        )
    }

    pub fn to_form_field(&self) -> FormFieldContext {
        FormFieldContext {
            identifier: self.identifier.clone(),
            context: self.context(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormFieldContext {
    pub identifier: String,
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingRequest {
    pub form_fields: Vec<FormFieldContext>,
    pub profile_keys: Vec<String>,
}

/// Identifier → chosen profile key, or `null` for "no match".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AiMapping(pub HashMap<String, Option<String>>);

impl AiMapping {
    /// Chosen key for `identifier`. `None` for both an explicit null and an
    /// identifier the collaborator left out.
    pub fn key_for(&self, identifier: &str) -> Option<&str> {
        self.0.get(identifier).and_then(|k| k.as_deref())
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<I: Into<String>, K: Into<String>> FromIterator<(I, Option<K>)> for AiMapping {
    fn from_iter<T: IntoIterator<Item = (I, Option<K>)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(id, key)| (id.into(), key.map(Into::into)))
                .collect(),
        )
    }
}

/// `{ success: true, data }` or `{ success: false, error }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<AiMapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MappingEnvelope {
    pub fn ok(mapping: AiMapping) -> Self {
        Self {
            success: true,
            data: Some(mapping),
            error: None,
        }
    }

    pub fn failed(error: impl ToString) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
        }
    }
}
