// file: src/config.rs
// description: application configuration management with toml support and env overrides
// reference: https://docs.rs/config

use crate::error::{EnrichError, Result};
use crate::extractor::{DescriptionMode, RegionProfile};
use crate::utils::validation::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const SEARCH_API_KEY_ENV: &str = "SERPER_API_KEY";
pub const MODEL_API_KEY_ENV: &str = "LLM_API_KEY";
pub const MAX_MODEL_RETRIES: u32 = 3;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub model: ModelConfig,
    pub extraction: ExtractionConfig,
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub result_count: usize,
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://google.serper.dev/search".to_string(),
            api_key: None,
            result_count: 10,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelConfig {
    pub enabled: bool,
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub max_retries: u32,
    pub backoff_base_ms: u64,
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://api.groq.com/openai/v1".to_string(),
            api_key: None,
            model: "llama-3.3-70b-versatile".to_string(),
            max_retries: 3,
            backoff_base_ms: 1000,
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub description_mode: DescriptionMode,
    pub region: RegionProfile,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Cooldown between rows, skipped after the last row and after empty searches.
    pub row_delay_ms: u64,
    pub validate_addresses: bool,
    pub company_column: String,
    pub address_column: String,
    pub postal_code_column: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            row_delay_ms: 2000,
            validate_addresses: false,
            company_column: "entity_name".to_string(),
            address_column: "address".to_string(),
            postal_code_column: "postal_code".to_string(),
        }
    }
}

impl Config {
    /// Layer the toml file (if present) and `CONTACT_ENRICH__SECTION__KEY` overrides.
    ///
    /// Call [`Config::validate`] once command-line overrides have been applied.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder
                .add_source(config::File::from(Path::new(DEFAULT_CONFIG_PATH)).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("CONTACT_ENRICH")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| EnrichError::Config(e.to_string()))?;

        let mut config: Config = settings
            .try_deserialize()
            .map_err(|e| EnrichError::Config(e.to_string()))?;

        config.apply_key_fallbacks(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self::default()
    }

    fn apply_key_fallbacks(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.search.api_key.as_deref().is_none_or(|k| k.trim().is_empty()) {
            self.search.api_key = lookup(SEARCH_API_KEY_ENV);
        }
        if self.model.api_key.as_deref().is_none_or(|k| k.trim().is_empty()) {
            self.model.api_key = lookup(MODEL_API_KEY_ENV);
        }
    }

    pub fn validate(&self) -> Result<()> {
        Validator::validate_api_key(self.search.api_key.as_deref(), "search")?;
        Validator::validate_url(&self.search.endpoint)?;

        if self.search.result_count == 0 {
            return Err(EnrichError::Config(
                "search.result_count must be greater than 0".to_string(),
            ));
        }

        if self.model.enabled {
            Validator::validate_api_key(self.model.api_key.as_deref(), "model")?;
            Validator::validate_url(&self.model.base_url)?;
        }

        Validator::validate_retry_count(self.model.max_retries, MAX_MODEL_RETRIES)?;

        if self.pipeline.company_column.trim().is_empty() {
            return Err(EnrichError::Config(
                "pipeline.company_column must not be empty".to_string(),
            ));
        }

        self.extraction.region.validate()
    }
}
