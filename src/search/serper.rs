// file: src/search/serper.rs
// description: Serper (Google search) client returning normalized result documents
// reference: https://serper.dev/

use crate::config::SearchConfig;
use crate::error::{EnrichError, Result};
use crate::models::SearchResultDocument;
use crate::search::SearchProvider;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Serialize)]
struct SerperRequest<'a> {
    q: String,
    num: usize,
    location: &'a str,
}

pub struct SerperClient {
    client: Client,
    api_key: String,
    endpoint: String,
    result_count: usize,
    location: String,
}

impl SerperClient {
    pub fn new(config: &SearchConfig, location: impl Into<String>) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| EnrichError::Config("Search API key is not configured".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key,
            endpoint: config.endpoint.clone(),
            result_count: config.result_count,
            location: location.into(),
        })
    }

    /// The raw query with the fixed region qualifier appended.
    pub fn qualified_query(&self, query: &str) -> String {
        format!("{} {} contact information", query.trim(), self.location)
    }

    pub async fn try_search(&self, query: &str) -> Result<SearchResultDocument> {
        let request = SerperRequest {
            q: self.qualified_query(query),
            num: self.result_count,
            location: &self.location,
        };

        debug!("Searching for: {}", request.q);

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| EnrichError::Transport(format!("Failed to send search request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(EnrichError::Transport(format!(
                "Search request failed with status {}: {}",
                status, error_text
            )));
        }

        let document: SearchResultDocument = response.json().await.map_err(|e| {
            EnrichError::Parse(format!("Failed to parse search response: {}", e))
        })?;

        debug!(
            "Search returned {} organic results (knowledge graph: {})",
            document.organic.len(),
            document.knowledge_graph.is_some()
        );

        Ok(document)
    }
}

#[async_trait]
impl SearchProvider for SerperClient {
    async fn search(&self, query: &str) -> SearchResultDocument {
        match self.try_search(query).await {
            Ok(document) => document,
            Err(e) => {
                warn!("Search error for {}: {}", query, e);
                SearchResultDocument::empty()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(endpoint: &str) -> SearchConfig {
        SearchConfig {
            endpoint: endpoint.to_string(),
            api_key: Some("test-key".to_string()),
            result_count: 10,
            timeout_secs: 2,
        }
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let mut cfg = config("https://google.serper.dev/search");
        cfg.api_key = None;
        assert!(matches!(
            SerperClient::new(&cfg, "Singapore"),
            Err(EnrichError::Config(_))
        ));
    }

    #[test]
    fn test_query_gets_region_qualifier() {
        let client = SerperClient::new(&config("https://google.serper.dev/search"), "Singapore")
            .unwrap();
        assert_eq!(
            client.qualified_query(" ABC Pte Ltd "),
            "ABC Pte Ltd Singapore contact information"
        );
    }

    #[tokio::test]
    async fn test_transport_failure_degrades_to_empty_document() {
        // nothing listens on port 9 of the loopback interface
        let client = SerperClient::new(&config("http://127.0.0.1:9/search"), "Singapore").unwrap();

        assert!(client.try_search("ABC").await.is_err());
        assert!(client.search("ABC").await.is_empty());
    }
}
