pub mod collaborator;
pub mod correlation;
pub mod mapping_model;
pub mod ollama;
pub mod orchestrator;
