pub mod executor;
pub mod extract;
