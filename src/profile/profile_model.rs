use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;

pub const DEFAULT_CAPTURED_PROFILE_NAME: &str = "New Profile from Form";

/// One key/value pair a user has configured for autofill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileField {
    pub id: String,
    pub key: String,
    pub value: String,
}

impl ProfileField {
    /// New field with a fresh random id.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub fields: Vec<ProfileField>,
}

/// A populated control captured from a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormEntry {
    pub key: String,
    pub value: String,
}

impl Profile {
    pub fn new(name: impl Into<String>, fields: Vec<ProfileField>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            fields,
        }
    }

    /// Build a new profile from captured form data. Every field gets a fresh id.
    pub fn from_form_data(name: Option<&str>, entries: &[FormEntry]) -> Self {
        let fields = entries
            .iter()
            .map(|e| ProfileField::new(e.key.clone(), e.value.clone()))
            .collect();

        Self::new(name.unwrap_or(DEFAULT_CAPTURED_PROFILE_NAME), fields)
    }

    /// Keys offered to the mapping collaborator, in field order.
    pub fn keys(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.key.clone()).collect()
    }

    /// First field whose key equals `key` exactly.
    pub fn field_by_key(&self, key: &str) -> Option<&ProfileField> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Name must be set and every field needs both a key and a value.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.name.trim().is_empty() {
            return Err(StoreError::InvalidFormat("Profile name is required".into()));
        }

        for (i, field) in self.fields.iter().enumerate() {
            if field.key.trim().is_empty() {
                return Err(StoreError::InvalidFormat(format!(
                    "Key is required (field {} of '{}')",
                    i + 1,
                    self.name
                )));
            }
            if field.value.is_empty() {
                return Err(StoreError::InvalidFormat(format!(
                    "Value is required for '{}'",
                    field.key
                )));
            }
        }

        Ok(())
    }
}
