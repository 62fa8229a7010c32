use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::document::adapter::{DocumentAdapter, InputAttributes, InputHandle};
use crate::document::page_model::PageElement;
use crate::error::DocumentError;

pub const DEFAULT_SERVER_SCRIPT: &str = "node/browser_server.js";

/// Which controls a `query_inputs` command returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputScope {
    /// Every fillable control on the page
    Fillable,
    /// Populatable controls of the first visible form
    FirstForm,
}

/// Request sent to browser_server.js over stdin (one JSON line).
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BrowserRequest {
    Navigate {
        cmd: &'static str,
        url: String,
    },
    QueryInputs {
        cmd: &'static str,
        scope: InputScope,
    },
    SetValue {
        cmd: &'static str,
        handle: InputHandle,
        value: String,
    },
    Dispatch {
        cmd: &'static str,
        handle: InputHandle,
        events: Vec<&'static str>,
    },
    Class {
        cmd: &'static str,
        handle: InputHandle,
        class: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        duration_ms: Option<u64>,
    },
    Quit {
        cmd: &'static str,
    },
}

impl BrowserRequest {
    pub fn navigate(url: &str) -> Self {
        BrowserRequest::Navigate {
            cmd: "navigate",
            url: url.to_string(),
        }
    }

    pub fn query_inputs(scope: InputScope) -> Self {
        BrowserRequest::QueryInputs {
            cmd: "query_inputs",
            scope,
        }
    }

    pub fn set_value(handle: InputHandle, value: &str) -> Self {
        BrowserRequest::SetValue {
            cmd: "set_value",
            handle,
            value: value.to_string(),
        }
    }

    /// Bubbling `input` then `change`, the pair reactive frameworks listen to.
    pub fn notify_changed(handle: InputHandle) -> Self {
        BrowserRequest::Dispatch {
            cmd: "dispatch",
            handle,
            events: vec!["input", "change"],
        }
    }

    pub fn add_class(handle: InputHandle, class: &str) -> Self {
        BrowserRequest::Class {
            cmd: "add_class",
            handle,
            class: class.to_string(),
            duration_ms: None,
        }
    }

    /// The helper schedules the removal on the page itself.
    pub fn add_transient_class(handle: InputHandle, class: &str, duration: Duration) -> Self {
        BrowserRequest::Class {
            cmd: "add_class",
            handle,
            class: class.to_string(),
            duration_ms: Some(duration.as_millis() as u64),
        }
    }

    pub fn remove_class(handle: InputHandle, class: &str) -> Self {
        BrowserRequest::Class {
            cmd: "remove_class",
            handle,
            class: class.to_string(),
            duration_ms: None,
        }
    }

    pub fn quit() -> Self {
        BrowserRequest::Quit { cmd: "quit" }
    }
}

/// Response received from browser_server.js over stdout (one JSON line).
#[derive(Debug, Deserialize)]
pub struct BrowserResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub ready: Option<bool>,
}

/// A control as reported by `query_inputs`.
#[derive(Debug, Clone, Deserialize)]
pub struct QueriedInput {
    pub handle: InputHandle,
    #[serde(flatten)]
    pub element: PageElement,
}

/// Parse the `data` array of a `query_inputs` response.
pub fn parse_queried_inputs(data: Value) -> Result<Vec<QueriedInput>, DocumentError> {
    serde_json::from_value(data).map_err(|e| DocumentError::JsonParse {
        context: "query_inputs data".into(),
        source: e,
    })
}

/// Read the `data` flag of a `set_value` response: `true` when the value
/// landed, `false` when the control is no longer attached to the page.
pub fn written_flag(data: Option<&Value>) -> Result<bool, DocumentError> {
    data.and_then(Value::as_bool)
        .ok_or_else(|| DocumentError::SessionProtocol {
            command: "set_value".into(),
            error: "Missing write flag in set_value response".into(),
        })
}

/// A live page driven through a long-lived browser_server.js process.
///
/// Commands go out as NDJSON on stdin and answers come back one line each on
/// stdout. Element details are cached from the last `query_inputs` so that
/// reading a control's label and attributes needs no extra round trip.
pub struct BrowserSession {
    child: Child,
    stdin: std::process::ChildStdin,
    reader: BufReader<std::process::ChildStdout>,
    elements: HashMap<InputHandle, PageElement>,
}

impl BrowserSession {
    /// Launch a new browser session by spawning the helper script.
    pub fn launch(script: &str) -> Result<Self, DocumentError> {
        let mut child = Command::new("node")
            .arg(script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| DocumentError::SubprocessSpawn {
                script: script.into(),
                source: e,
            })?;

        let stdin = child.stdin.take().ok_or_else(|| {
            DocumentError::SessionIO(format!("Failed to capture stdin of {}", script))
        })?;

        let stdout = child.stdout.take().ok_or_else(|| {
            DocumentError::SessionIO(format!("Failed to capture stdout of {}", script))
        })?;

        let mut reader = BufReader::new(stdout);

        // Wait for the ready signal
        let mut line = String::new();
        reader.read_line(&mut line).map_err(|e| {
            DocumentError::SessionIO(format!("Failed to read ready signal: {}", e))
        })?;

        let response: BrowserResponse =
            serde_json::from_str(line.trim()).map_err(|e| DocumentError::JsonParse {
                context: "browser_server.js ready signal".into(),
                source: e,
            })?;

        if !response.ok || response.ready != Some(true) {
            return Err(DocumentError::SessionProtocol {
                command: "launch".into(),
                error: "Did not receive ready signal from browser_server.js".into(),
            });
        }

        Ok(BrowserSession {
            child,
            stdin,
            reader,
            elements: HashMap::new(),
        })
    }

    /// Send a request and read the response.
    fn send(&mut self, request: &BrowserRequest) -> Result<BrowserResponse, DocumentError> {
        let json = serde_json::to_string(request).map_err(|e| DocumentError::JsonSerialize {
            context: "BrowserRequest".into(),
            source: e,
        })?;

        writeln!(self.stdin, "{}", json).map_err(|e| {
            DocumentError::SessionIO(format!("Failed to write to browser_server.js stdin: {}", e))
        })?;

        self.stdin.flush().map_err(|e| {
            DocumentError::SessionIO(format!("Failed to flush browser_server.js stdin: {}", e))
        })?;

        let mut line = String::new();
        self.reader.read_line(&mut line).map_err(|e| {
            DocumentError::SessionIO(format!("Failed to read from browser_server.js stdout: {}", e))
        })?;

        if line.trim().is_empty() {
            return Err(DocumentError::SessionIO(
                "Empty response from browser_server.js (process may have died)".into(),
            ));
        }

        serde_json::from_str(line.trim()).map_err(|e| DocumentError::JsonParse {
            context: "browser_server.js response".into(),
            source: e,
        })
    }

    /// Send a request and verify it succeeded.
    fn send_ok(
        &mut self,
        request: &BrowserRequest,
        command_name: &str,
    ) -> Result<BrowserResponse, DocumentError> {
        let response = self.send(request)?;
        if !response.ok {
            return Err(DocumentError::SessionProtocol {
                command: command_name.into(),
                error: response.error.unwrap_or_else(|| "Unknown error".into()),
            });
        }
        Ok(response)
    }

    /// Navigate to a URL. Cached element details are dropped.
    pub fn navigate(&mut self, url: &str) -> Result<(), DocumentError> {
        self.send_ok(&BrowserRequest::navigate(url), "navigate")?;
        self.elements.clear();
        Ok(())
    }

    fn query(&mut self, scope: InputScope) -> Result<Vec<InputHandle>, DocumentError> {
        let response = self.send_ok(&BrowserRequest::query_inputs(scope), "query_inputs")?;
        let data = response.data.ok_or_else(|| DocumentError::SessionProtocol {
            command: "query_inputs".into(),
            error: "No data in query_inputs response".into(),
        })?;

        let inputs = parse_queried_inputs(data)?;
        debug!(?scope, count = inputs.len(), "queried inputs");

        let handles = inputs.iter().map(|i| i.handle).collect();
        for input in inputs {
            self.elements.insert(input.handle, input.element);
        }
        Ok(handles)
    }

    fn cached(&self, input: InputHandle) -> Result<&PageElement, DocumentError> {
        self.elements
            .get(&input)
            .ok_or(DocumentError::UnknownInput(input))
    }

    /// Quit the browser session.
    pub fn quit(&mut self) -> Result<(), DocumentError> {
        // Best-effort quit, the process may already be gone
        let _ = self.send(&BrowserRequest::quit());
        let _ = self.child.wait();
        Ok(())
    }
}

impl DocumentAdapter for BrowserSession {
    fn fillable_inputs(&mut self) -> Result<Vec<InputHandle>, DocumentError> {
        self.query(InputScope::Fillable)
    }

    fn first_form_inputs(&mut self) -> Result<Vec<InputHandle>, DocumentError> {
        self.query(InputScope::FirstForm)
    }

    fn associated_label_text(
        &mut self,
        input: InputHandle,
    ) -> Result<Option<String>, DocumentError> {
        Ok(self.cached(input)?.label.clone())
    }

    fn attributes(&mut self, input: InputHandle) -> Result<InputAttributes, DocumentError> {
        Ok(self.cached(input)?.attributes())
    }

    fn set_value(&mut self, input: InputHandle, value: &str) -> Result<bool, DocumentError> {
        let response = self.send_ok(&BrowserRequest::set_value(input, value), "set_value")?;
        let written = written_flag(response.data.as_ref())?;
        if written {
            if let Some(el) = self.elements.get_mut(&input) {
                el.value = Some(value.to_string());
            }
        }
        Ok(written)
    }

    fn notify_changed(&mut self, input: InputHandle) -> Result<(), DocumentError> {
        self.send_ok(&BrowserRequest::notify_changed(input), "dispatch")?;
        Ok(())
    }

    fn add_class(&mut self, input: InputHandle, class: &str) -> Result<(), DocumentError> {
        self.send_ok(&BrowserRequest::add_class(input, class), "add_class")?;
        Ok(())
    }

    fn remove_class(&mut self, input: InputHandle, class: &str) -> Result<(), DocumentError> {
        self.send_ok(&BrowserRequest::remove_class(input, class), "remove_class")?;
        Ok(())
    }

    fn add_transient_class(
        &mut self,
        input: InputHandle,
        class: &str,
        duration: Duration,
    ) -> Result<(), DocumentError> {
        let request = BrowserRequest::add_transient_class(input, class, duration);
        self.send_ok(&request, "add_class")?;
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        // Best-effort cleanup
        let _ = self.quit();
    }
}
