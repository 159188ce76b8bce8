// file: src/llm/mod.rs
// description: language model seam, chat completion client and model-assisted extraction
// reference: internal module structure

pub mod assisted;
pub mod chat;
pub mod prompt;

pub use assisted::ModelAssistedExtractor;
pub use chat::ChatCompletionClient;

use crate::error::Result;
use async_trait::async_trait;

/// Text completion capability. The only contract is "return text"; callers parse it.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}
