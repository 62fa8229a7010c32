use std::cell::RefCell;

use formfill::{
    ai::{
        collaborator::{MappingCollaborator, parse_envelope},
        mapping_model::{AiMapping, MappingRequest},
    },
    document::page_model::PageElement,
    error::MappingError,
    profile::profile_model::{Profile, ProfileField},
};

// =========================================================================
// Page builders
// =========================================================================

pub fn text_input() -> PageElement {
    PageElement {
        tag: "input".into(),
        input_type: Some("text".into()),
        ..PageElement::default()
    }
}

pub fn named(name: &str) -> PageElement {
    PageElement {
        name: Some(name.into()),
        ..text_input()
    }
}

pub fn with_id(id: &str) -> PageElement {
    PageElement {
        id: Some(id.into()),
        ..text_input()
    }
}

pub fn typed(input_type: &str) -> PageElement {
    PageElement {
        input_type: Some(input_type.into()),
        ..text_input()
    }
}

// =========================================================================
// Profiles
// =========================================================================

pub fn profile(fields: &[(&str, &str)]) -> Profile {
    Profile::new(
        "Test",
        fields.iter().map(|(k, v)| ProfileField::new(*k, *v)).collect(),
    )
}

// =========================================================================
// Collaborators
// =========================================================================

/// Returns a canned mapping and records every request.
pub struct StaticMapper {
    pub mapping: AiMapping,
    pub requests: RefCell<Vec<MappingRequest>>,
}

impl StaticMapper {
    pub fn new(pairs: &[(&str, Option<&str>)]) -> Self {
        Self {
            mapping: pairs.iter().map(|(id, key)| (*id, *key)).collect(),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn last_request(&self) -> MappingRequest {
        self.requests.borrow().last().cloned().expect("no request recorded")
    }
}

impl MappingCollaborator for StaticMapper {
    fn map_fields(&self, request: &MappingRequest) -> Result<AiMapping, MappingError> {
        self.requests.borrow_mut().push(request.clone());
        Ok(self.mapping.clone())
    }
}

/// Fails like an unreachable endpoint.
pub struct FailingMapper;

impl MappingCollaborator for FailingMapper {
    fn map_fields(&self, _request: &MappingRequest) -> Result<AiMapping, MappingError> {
        Err(MappingError::Status(502))
    }
}

/// Answers with a body that is not a mapping envelope.
pub struct GarbledMapper;

impl MappingCollaborator for GarbledMapper {
    fn map_fields(&self, _request: &MappingRequest) -> Result<AiMapping, MappingError> {
        parse_envelope("I could not decide, sorry.")
    }
}
