// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EnrichError>;

#[derive(Error, Debug)]
pub enum EnrichError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("File operation failed for {path}: {source}")]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<reqwest::Error> for EnrichError {
    fn from(err: reqwest::Error) -> Self {
        EnrichError::Transport(err.to_string())
    }
}

impl From<regex::Error> for EnrichError {
    fn from(err: regex::Error) -> Self {
        EnrichError::Config(format!("Invalid region pattern: {}", err))
    }
}
