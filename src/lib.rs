// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod error;
pub mod exporter;
pub mod extractor;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod search;
pub mod utils;
pub mod validator;

#[cfg(test)]
mod testing;

pub use config::{Config, ExtractionConfig, ModelConfig, PipelineConfig, SearchConfig};
pub use error::{EnrichError, Result};
pub use exporter::{ExportManifest, JsonExporter};
pub use extractor::{
    ContactExtractor, DescriptionMode, HeuristicExtractor, RegionPatterns, RegionProfile,
};
pub use llm::{ChatCompletionClient, LanguageModel, ModelAssistedExtractor};
pub use models::{
    ContactRecord, InputRow, KnowledgeGraph, NOT_FOUND, OrganicResult, SearchResultDocument,
    ValidationStatus,
};
pub use pipeline::{Enricher, PipelineStats, ProgressTracker, RowOutcome, load_rows};
pub use search::{SearchProvider, SerperClient};
pub use utils::Validator;
pub use validator::AddressValidator;
