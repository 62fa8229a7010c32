pub mod adapter;
pub mod page_model;
pub mod static_page;
