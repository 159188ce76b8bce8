// file: src/search/mod.rs
// description: search provider seam and the Serper implementation
// reference: internal module structure

pub mod serper;

pub use serper::SerperClient;

use crate::models::SearchResultDocument;
use async_trait::async_trait;

/// Web search capability the engine consumes.
///
/// Implementations never fail: transport problems degrade to an empty document so one bad
/// request cannot abort a batch. Retries, if wanted, belong to the caller.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> SearchResultDocument;
}
