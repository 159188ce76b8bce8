// file: src/extractor/mod.rs
// description: contact field extraction module exports and the extractor strategy seam
// reference: internal module structure

pub mod fields;
pub mod heuristic;
pub mod patterns;
pub mod phone;
pub mod region;

pub use fields::DescriptionMode;
pub use heuristic::HeuristicExtractor;
pub use phone::{Confidence, PhoneCandidate};
pub use region::{RegionPatterns, RegionProfile};

use crate::models::{ContactRecord, SearchResultDocument};
use async_trait::async_trait;

/// Turns one search result document into a contact record. Never fails: implementations
/// degrade to sentinel values instead.
#[async_trait]
pub trait ContactExtractor: Send + Sync {
    async fn extract(&self, company: &str, doc: &SearchResultDocument) -> ContactRecord;

    fn name(&self) -> &'static str;
}
