use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::warn;

use crate::report::report_model::FilledInput;
use crate::trace::trace::FillEvent;

/// JSONL sink for fill events, one line per written control.
///
/// An unopenable file turns the logger into a no-op; a fill pass never fails
/// because of its trace.
pub struct TraceLogger {
    path: PathBuf,
    sink: Option<Mutex<File>>,
}

impl TraceLogger {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let sink = match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(f) => Some(Mutex::new(f)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not open trace file, tracing off");
                None
            }
        };
        Self { path, sink }
    }

    /// Append every fill of one pass, heuristic ones first.
    pub fn record_pass<'a>(&self, pass: &str, fills: impl IntoIterator<Item = &'a FilledInput>) {
        for filled in fills {
            self.log(&FillEvent::now(pass, filled));
        }
    }

    pub fn log(&self, event: &FillEvent) {
        let Some(sink) = &self.sink else {
            return;
        };

        let line = match serde_json::to_string(event) {
            Ok(l) => l,
            Err(e) => {
                warn!(error = %e, "failed to serialize fill event");
                return;
            }
        };

        let Ok(mut file) = sink.lock() else {
            warn!(path = %self.path.display(), "trace sink poisoned");
            return;
        };

        if let Err(e) = writeln!(file, "{}", line) {
            warn!(path = %self.path.display(), error = %e, "failed to append fill event");
        }
    }
}
