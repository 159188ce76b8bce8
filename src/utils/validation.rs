// file: src/utils/validation.rs
// description: configuration and input validation helpers
// reference: input validation patterns

use crate::error::{EnrichError, Result};

pub struct Validator;

impl Validator {
    pub fn validate_url(url: &str) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(EnrichError::Config(format!("Invalid URL format: {}", url)));
        }
        Ok(())
    }

    /// `service` names the key in the error message, e.g. "search".
    pub fn validate_api_key(key: Option<&str>, service: &str) -> Result<()> {
        match key.map(str::trim) {
            Some(key) if !key.is_empty() => Ok(()),
            _ => Err(EnrichError::Config(format!(
                "Missing {} API key",
                service
            ))),
        }
    }

    pub fn validate_retry_count(retries: u32, max: u32) -> Result<()> {
        if retries > max {
            return Err(EnrichError::Config(format!(
                "Retry count {} exceeds maximum of {}",
                retries, max
            )));
        }
        Ok(())
    }

    pub fn validate_company_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(EnrichError::Validation(
                "Company name is empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Truncates on a char boundary so multi-byte text never panics.
    pub fn truncate_text(text: &str, max_chars: usize) -> String {
        match text.char_indices().nth(max_chars) {
            None => text.to_string(),
            Some((cut, _)) => format!("{}...", &text[..cut]),
        }
    }
}
