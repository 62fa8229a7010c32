use std::time::Duration;

use tracing::debug;

use crate::document::adapter::{DocumentAdapter, InputHandle};

/// Marker class applied to a control right after it is filled.
pub const HIGHLIGHT_CLASS: &str = "formfill-highlighted";
pub const HIGHLIGHT_DURATION: Duration = Duration::from_millis(1500);

/// Write `value` into the control, announce the change and flash the
/// highlight marker.
///
/// A control that has left the page makes this a no-op. Returns whether
/// the value write went through; only then are events and highlight applied.
pub fn fill<D>(doc: &mut D, input: InputHandle, value: &str) -> bool
where
    D: DocumentAdapter + ?Sized,
{
    match doc.set_value(input, value) {
        Ok(true) => {}
        Ok(false) => {
            debug!(input = %input, "input left the page, fill skipped");
            return false;
        }
        Err(e) => {
            debug!(input = %input, error = %e, "fill skipped");
            return false;
        }
    }

    // Without the events, frameworks bound to their own state miss the write.
    if let Err(e) = doc.notify_changed(input) {
        debug!(input = %input, error = %e, "change notification failed");
    }

    if let Err(e) = doc.add_transient_class(input, HIGHLIGHT_CLASS, HIGHLIGHT_DURATION) {
        debug!(input = %input, error = %e, "highlight failed");
    }

    true
}
