// file: src/testing.rs
// description: in-memory search and language model doubles for exercising the engine offline
// reference: internal test utilities

use crate::error::{EnrichError, Result};
use crate::llm::LanguageModel;
use crate::models::SearchResultDocument;
use crate::search::SearchProvider;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Search provider answering from canned documents keyed by exact query.
///
/// Unknown queries yield an empty document, mirroring a degraded transport.
#[derive(Default)]
pub struct StaticSearch {
    documents: HashMap<String, SearchResultDocument>,
    queries: Mutex<Vec<String>>,
}

impl StaticSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, query: impl Into<String>, doc: SearchResultDocument) -> Self {
        self.documents.insert(query.into(), doc);
        self
    }

    /// Every query received, in call order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchProvider for StaticSearch {
    async fn search(&self, query: &str) -> SearchResultDocument {
        self.queries.lock().unwrap().push(query.to_string());
        self.documents.get(query).cloned().unwrap_or_default()
    }
}

/// Language model replaying scripted replies; once exhausted every call fails.
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String>>>,
    calls: Mutex<usize>,
}

impl ScriptedModel {
    pub fn always_failing() -> Self {
        Self::default()
    }

    pub fn with_replies(replies: Vec<Result<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        *self.calls.lock().unwrap() += 1;
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(EnrichError::Transport("scripted model exhausted".to_string())))
    }
}
