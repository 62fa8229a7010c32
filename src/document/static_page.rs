use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use crate::document::adapter::{
    DocumentAdapter, InputAttributes, InputHandle, is_extractable, is_fillable,
};
use crate::document::page_model::{PageElement, PageSnapshot};
use crate::error::DocumentError;

/// Events dispatched on a control, in the order they were fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEvent {
    Input(InputHandle),
    Change(InputHandle),
}

#[derive(Debug, Clone)]
struct ClassMarker {
    class: String,
    expires_at: Option<Instant>,
}

impl ClassMarker {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|deadline| now < deadline)
    }
}

/// In-memory document built from a [`PageSnapshot`].
///
/// Handles are element positions in the snapshot. Transient classes carry a
/// deadline instead of a timer and stop being reported once it passes.
/// Writes to a detached element are ignored, mirroring a DOM node that was
/// removed from the page; `set_value` reports them as not written.
#[derive(Debug, Clone, Default)]
pub struct StaticDocument {
    snapshot: PageSnapshot,
    detached: HashSet<InputHandle>,
    classes: HashMap<InputHandle, Vec<ClassMarker>>,
    events: Vec<DocumentEvent>,
}

impl StaticDocument {
    pub fn new(snapshot: PageSnapshot) -> Self {
        Self {
            snapshot,
            ..Self::default()
        }
    }

    pub fn from_elements(elements: Vec<PageElement>) -> Self {
        Self::new(PageSnapshot {
            elements,
            ..PageSnapshot::default()
        })
    }

    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let snapshot: PageSnapshot =
            serde_json::from_str(json).map_err(|e| DocumentError::JsonParse {
                context: "page snapshot".into(),
                source: e,
            })?;
        Ok(Self::new(snapshot))
    }

    pub fn load(path: &str) -> Result<Self, DocumentError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DocumentError::Snapshot(format!("{}: {}", path, e)))?;
        Self::from_json(&content)
    }

    pub fn snapshot(&self) -> &PageSnapshot {
        &self.snapshot
    }

    pub fn element(&self, input: InputHandle) -> Option<&PageElement> {
        self.snapshot.elements.get(input.0 as usize)
    }

    pub fn value(&self, input: InputHandle) -> Option<&str> {
        self.element(input).and_then(|el| el.value.as_deref())
    }

    pub fn events(&self) -> &[DocumentEvent] {
        &self.events
    }

    pub fn has_class(&self, input: InputHandle, class: &str) -> bool {
        let now = Instant::now();
        self.classes
            .get(&input)
            .is_some_and(|markers| markers.iter().any(|m| m.class == class && m.is_live(now)))
    }

    /// Remove the element from the page. Its handle stays valid for reads.
    pub fn detach(&mut self, input: InputHandle) {
        self.detached.insert(input);
    }

    fn attached(&self) -> impl Iterator<Item = (InputHandle, &PageElement)> {
        self.snapshot
            .elements
            .iter()
            .enumerate()
            .map(|(i, el)| (InputHandle(i as u32), el))
            .filter(|(handle, _)| !self.detached.contains(handle))
    }

    fn checked(&self, input: InputHandle) -> Result<&PageElement, DocumentError> {
        self.element(input).ok_or(DocumentError::UnknownInput(input))
    }

    fn writable(&self, input: InputHandle) -> Result<bool, DocumentError> {
        self.checked(input)?;
        Ok(!self.detached.contains(&input))
    }
}

impl DocumentAdapter for StaticDocument {
    fn fillable_inputs(&mut self) -> Result<Vec<InputHandle>, DocumentError> {
        Ok(self
            .attached()
            .filter(|(_, el)| is_fillable(&el.tag, el.input_type.as_deref()))
            .map(|(handle, _)| handle)
            .collect())
    }

    fn first_form_inputs(&mut self) -> Result<Vec<InputHandle>, DocumentError> {
        let Some(form) = self.snapshot.forms.iter().find(|f| f.visible) else {
            return Ok(Vec::new());
        };

        Ok(self
            .attached()
            .filter(|(_, el)| el.form_id.as_deref() == Some(form.id.as_str()))
            .filter(|(_, el)| is_extractable(&el.tag, el.input_type.as_deref()))
            .map(|(handle, _)| handle)
            .collect())
    }

    fn associated_label_text(
        &mut self,
        input: InputHandle,
    ) -> Result<Option<String>, DocumentError> {
        Ok(self.checked(input)?.label.clone())
    }

    fn attributes(&mut self, input: InputHandle) -> Result<InputAttributes, DocumentError> {
        Ok(self.checked(input)?.attributes())
    }

    fn set_value(&mut self, input: InputHandle, value: &str) -> Result<bool, DocumentError> {
        if !self.writable(input)? {
            return Ok(false);
        }
        match self.snapshot.elements.get_mut(input.0 as usize) {
            Some(el) => {
                el.value = Some(value.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn notify_changed(&mut self, input: InputHandle) -> Result<(), DocumentError> {
        if self.writable(input)? {
            self.events.push(DocumentEvent::Input(input));
            self.events.push(DocumentEvent::Change(input));
        }
        Ok(())
    }

    fn add_class(&mut self, input: InputHandle, class: &str) -> Result<(), DocumentError> {
        if self.writable(input)? {
            self.classes.entry(input).or_default().push(ClassMarker {
                class: class.to_string(),
                expires_at: None,
            });
        }
        Ok(())
    }

    fn remove_class(&mut self, input: InputHandle, class: &str) -> Result<(), DocumentError> {
        self.checked(input)?;
        if let Some(markers) = self.classes.get_mut(&input) {
            markers.retain(|m| m.class != class);
        }
        Ok(())
    }

    fn add_transient_class(
        &mut self,
        input: InputHandle,
        class: &str,
        duration: Duration,
    ) -> Result<(), DocumentError> {
        if self.writable(input)? {
            self.classes.entry(input).or_default().push(ClassMarker {
                class: class.to_string(),
                expires_at: Some(Instant::now() + duration),
            });
        }
        Ok(())
    }
}
