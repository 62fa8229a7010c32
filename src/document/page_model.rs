use serde::{Deserialize, Serialize};

use crate::document::adapter::InputAttributes;

/// One control as extracted from the page. The browser helper produces these
/// in document order; snapshots store the same shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageElement {
    pub tag: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    /// Text of the first associated `<label>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, rename = "formId", skip_serializing_if = "Option::is_none")]
    pub form_id: Option<String>,
}

impl PageElement {
    pub fn attributes(&self) -> InputAttributes {
        InputAttributes {
            placeholder: self.placeholder.clone(),
            name: self.name.clone(),
            id: self.id.clone(),
            value: self.value.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormInfo {
    pub id: String,
    /// `false` when the form is hidden with an inline `display: none`.
    #[serde(default = "default_true")]
    pub visible: bool,
}

/// Serialized view of a page: its forms and every form control.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub forms: Vec<FormInfo>,
    #[serde(default)]
    pub elements: Vec<PageElement>,
}

fn default_true() -> bool {
    true
}
