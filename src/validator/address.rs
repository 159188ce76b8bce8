// file: src/validator/address.rs
// description: compares extracted addresses with reference data and re-searches on disagreement
// reference: internal validation workflow

use crate::extractor::{ContactExtractor, RegionPatterns};
use crate::models::{ContactRecord, ValidationStatus, is_found};
use crate::search::SearchProvider;
use crate::validator::similarity::similarity_ratio;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Ratio an address must exceed to count as agreeing with the reference.
pub const SIMILARITY_THRESHOLD: f64 = 0.7;

pub struct AddressValidator {
    search: Arc<dyn SearchProvider>,
    extractor: Arc<dyn ContactExtractor>,
    region: Arc<RegionPatterns>,
}

impl AddressValidator {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        extractor: Arc<dyn ContactExtractor>,
        region: Arc<RegionPatterns>,
    ) -> Self {
        Self {
            search,
            extractor,
            region,
        }
    }

    /// Validate `record.address` against the reference, issuing at most one extra search.
    ///
    /// The returned status is also stored on the returned record.
    pub async fn validate(
        &self,
        record: ContactRecord,
        reference_address: Option<&str>,
        reference_postal: Option<&str>,
    ) -> (ContactRecord, ValidationStatus) {
        let reference = reference_address.map(str::trim).filter(|r| is_found(r));
        let Some(reference) = reference.filter(|_| record.has_address()) else {
            return finish(record, ValidationStatus::Unknown);
        };

        let reference_postal = reference_postal.and_then(|p| self.region.normalize_postal_code(p));

        if let Some(status) = self.agreement(&record.address, reference, reference_postal.as_deref())
        {
            debug!("{} address agrees with reference ({})", record.company_name, status);
            return finish(record, status);
        }

        info!(
            "{} address '{}' disagrees with reference '{}', re-searching",
            record.company_name, record.address, reference
        );

        let query = format!("{} {}", record.company_name, reference);
        let doc = self.search.search(&query).await;
        let refined = self.extractor.extract(&record.company_name, &doc).await;

        if refined.has_address()
            && self
                .agreement(&refined.address, reference, reference_postal.as_deref())
                .is_some()
        {
            return finish(refined, ValidationStatus::Revalidated);
        }

        let status = if refined.has_address() {
            ValidationStatus::ForcedFallback
        } else {
            ValidationStatus::ReferenceFallback
        };
        warn!(
            "{} address could not be confirmed, using reference ({})",
            record.company_name, status
        );

        let mut record = record;
        record.address = reference.to_string();
        finish(record, status)
    }

    /// `PostalMatch` or `Similarity` when `address` agrees with the reference.
    fn agreement(
        &self,
        address: &str,
        reference: &str,
        reference_postal: Option<&str>,
    ) -> Option<ValidationStatus> {
        let extracted_postal = self.region.find_postal_code(address);
        if let (Some(extracted), Some(expected)) = (extracted_postal.as_deref(), reference_postal)
            && extracted == expected
        {
            return Some(ValidationStatus::PostalMatch);
        }

        let ratio = similarity_ratio(&address.to_lowercase(), &reference.to_lowercase());
        (ratio > SIMILARITY_THRESHOLD).then_some(ValidationStatus::Similarity(ratio))
    }
}

fn finish(record: ContactRecord, status: ValidationStatus) -> (ContactRecord, ValidationStatus) {
    (record.with_status(status), status)
}
