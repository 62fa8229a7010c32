use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::DocumentError;

/// Opaque reference to one live control on the page. Handles are assigned by
/// the adapter and are only meaningful to the adapter that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputHandle(pub u32);

impl fmt::Display for InputHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Raw attributes the matcher consults besides the associated label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputAttributes {
    pub placeholder: Option<String>,
    pub name: Option<String>,
    pub id: Option<String>,
    pub value: Option<String>,
}

/// Everything the engine needs from a page. Matching and filling depend only
/// on this trait, never on a concrete browser.
pub trait DocumentAdapter {
    /// All fillable controls in document order.
    fn fillable_inputs(&mut self) -> Result<Vec<InputHandle>, DocumentError>;

    /// Populatable controls of the first form that is not hidden, in
    /// document order. Empty when the page has no such form.
    fn first_form_inputs(&mut self) -> Result<Vec<InputHandle>, DocumentError>;

    /// Text of the first label associated with the control, if any.
    fn associated_label_text(&mut self, input: InputHandle)
    -> Result<Option<String>, DocumentError>;

    fn attributes(&mut self, input: InputHandle) -> Result<InputAttributes, DocumentError>;

    /// Write the control's value. `Ok(false)` when the control has left the
    /// page and nothing was written.
    fn set_value(&mut self, input: InputHandle, value: &str) -> Result<bool, DocumentError>;

    /// Dispatch an input event followed by a change event on the control.
    fn notify_changed(&mut self, input: InputHandle) -> Result<(), DocumentError>;

    fn add_class(&mut self, input: InputHandle, class: &str) -> Result<(), DocumentError>;

    fn remove_class(&mut self, input: InputHandle, class: &str) -> Result<(), DocumentError>;

    /// Add a marker class that the page drops on its own after `duration`.
    /// Fire-and-forget: the call returns before the class is removed.
    fn add_transient_class(
        &mut self,
        input: InputHandle,
        class: &str,
        duration: Duration,
    ) -> Result<(), DocumentError>;
}

// ============================================================================
// Element filters
// ============================================================================

/// Fillable controls: inputs, textareas and selects, minus hidden, submit,
/// checkbox and radio inputs.
pub fn is_fillable(tag: &str, input_type: Option<&str>) -> bool {
    match tag {
        "textarea" | "select" => true,
        "input" => !matches!(
            input_type.map(str::to_ascii_lowercase).as_deref(),
            Some("hidden") | Some("submit") | Some("checkbox") | Some("radio")
        ),
        _ => false,
    }
}

/// Controls considered when capturing a form: like [`is_fillable`] but
/// checkboxes and radios are kept.
pub fn is_extractable(tag: &str, input_type: Option<&str>) -> bool {
    match tag {
        "textarea" | "select" => true,
        "input" => !matches!(
            input_type.map(str::to_ascii_lowercase).as_deref(),
            Some("hidden") | Some("submit")
        ),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fillable_excludes_choice_and_hidden_inputs() {
        assert!(is_fillable("input", None));
        assert!(is_fillable("input", Some("email")));
        assert!(is_fillable("textarea", None));
        assert!(is_fillable("select", None));
        assert!(!is_fillable("input", Some("hidden")));
        assert!(!is_fillable("input", Some("SUBMIT")));
        assert!(!is_fillable("input", Some("checkbox")));
        assert!(!is_fillable("input", Some("radio")));
        assert!(!is_fillable("button", None));
    }

    #[test]
    fn extractable_keeps_choice_inputs() {
        assert!(is_extractable("input", Some("checkbox")));
        assert!(is_extractable("input", Some("radio")));
        assert!(!is_extractable("input", Some("hidden")));
        assert!(!is_extractable("input", Some("submit")));
    }
}
