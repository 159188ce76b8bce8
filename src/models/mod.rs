// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod contact;
pub mod input_row;
pub mod search_document;

pub use contact::{ContactRecord, NOT_FOUND, ValidationStatus, is_found};
pub use input_row::InputRow;
pub use search_document::{KnowledgeGraph, OrganicResult, SearchResultDocument};
