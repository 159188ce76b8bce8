// file: src/models/contact.rs
// description: contact record produced per company plus its validation status tag
// reference: internal data structures

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Sentinel written into every field the engine could not populate.
pub const NOT_FOUND: &str = "Not found";

pub fn is_found(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && trimmed != NOT_FOUND
}

fn not_found() -> String {
    NOT_FOUND.to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum ValidationStatus {
    #[default]
    Unknown,
    PostalMatch,
    Similarity(f64),
    Revalidated,
    /// Re-search produced an address that still disagreed; reference copied in.
    ForcedFallback,
    /// Re-search produced no address at all; reference copied in.
    ReferenceFallback,
}

impl ValidationStatus {
    pub fn is_fallback(&self) -> bool {
        matches!(
            self,
            ValidationStatus::ForcedFallback | ValidationStatus::ReferenceFallback
        )
    }

    fn parse(tag: &str) -> Self {
        match tag {
            "Postal match" => ValidationStatus::PostalMatch,
            "Revalidated" => ValidationStatus::Revalidated,
            "Forced CSV fallback" => ValidationStatus::ForcedFallback,
            "CSV fallback" => ValidationStatus::ReferenceFallback,
            other => other
                .strip_prefix("Similarity ")
                .and_then(|ratio| ratio.parse::<f64>().ok())
                .map(ValidationStatus::Similarity)
                .unwrap_or(ValidationStatus::Unknown),
        }
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationStatus::Unknown => write!(f, "Unknown"),
            ValidationStatus::PostalMatch => write!(f, "Postal match"),
            ValidationStatus::Similarity(ratio) => write!(f, "Similarity {:.2}", ratio),
            ValidationStatus::Revalidated => write!(f, "Revalidated"),
            ValidationStatus::ForcedFallback => write!(f, "Forced CSV fallback"),
            ValidationStatus::ReferenceFallback => write!(f, "CSV fallback"),
        }
    }
}

impl Serialize for ValidationStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ValidationStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(ValidationStatus::parse(&tag))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub company_name: String,
    #[serde(default = "not_found")]
    pub website_link: String,
    #[serde(default = "not_found")]
    pub address: String,
    #[serde(default = "not_found")]
    pub phone_number: String,
    #[serde(default = "not_found")]
    pub extra_phone: String,
    #[serde(default = "not_found")]
    pub email_address: String,
    /// Comma-joined, de-duplicated social profile URLs.
    #[serde(default = "not_found")]
    pub social_media_links: String,
    #[serde(default = "not_found")]
    pub description: String,
    #[serde(default)]
    pub validation_status: ValidationStatus,
}

impl ContactRecord {
    /// A record with every field set to the sentinel.
    pub fn not_found(company_name: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            website_link: not_found(),
            address: not_found(),
            phone_number: not_found(),
            extra_phone: not_found(),
            email_address: not_found(),
            social_media_links: not_found(),
            description: not_found(),
            validation_status: ValidationStatus::Unknown,
        }
    }

    pub fn has_address(&self) -> bool {
        is_found(&self.address)
    }

    pub fn has_website(&self) -> bool {
        is_found(&self.website_link)
    }

    pub fn has_phone(&self) -> bool {
        is_found(&self.phone_number)
    }

    pub fn with_status(mut self, status: ValidationStatus) -> Self {
        self.validation_status = status;
        self
    }
}
