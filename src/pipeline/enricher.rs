// file: src/pipeline/enricher.rs
// description: sequential per-row driver: search, extract, optionally validate, cool down
// reference: one row at a time on the tokio runtime, failures degrade only that row

use crate::extractor::ContactExtractor;
use crate::models::{ContactRecord, InputRow};
use crate::pipeline::progress::ProgressTracker;
use crate::search::SearchProvider;
use crate::utils::Validator;
use crate::validator::AddressValidator;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// What happened to one row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    /// No company name; the record is all sentinel values.
    Skipped(ContactRecord),
    /// The search returned nothing usable.
    EmptySearch(ContactRecord),
    Enriched(ContactRecord),
}

impl RowOutcome {
    pub fn record(&self) -> &ContactRecord {
        match self {
            RowOutcome::Skipped(record)
            | RowOutcome::EmptySearch(record)
            | RowOutcome::Enriched(record) => record,
        }
    }

    pub fn into_record(self) -> ContactRecord {
        match self {
            RowOutcome::Skipped(record)
            | RowOutcome::EmptySearch(record)
            | RowOutcome::Enriched(record) => record,
        }
    }

    /// Only rows that issued a non-empty search are followed by the cooldown.
    fn needs_cooldown(&self) -> bool {
        matches!(self, RowOutcome::Enriched(_))
    }
}

pub struct Enricher {
    search: Arc<dyn SearchProvider>,
    extractor: Arc<dyn ContactExtractor>,
    validator: Option<AddressValidator>,
    row_delay: Duration,
}

impl Enricher {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        extractor: Arc<dyn ContactExtractor>,
        row_delay: Duration,
    ) -> Self {
        Self {
            search,
            extractor,
            validator: None,
            row_delay,
        }
    }

    pub fn with_validator(mut self, validator: AddressValidator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub async fn enrich_row(&self, row: &InputRow) -> RowOutcome {
        let Some(company) = row.company() else {
            warn!("Skipping row without a company name");
            return RowOutcome::Skipped(ContactRecord::not_found(""));
        };

        let doc = self.search.search(company).await;
        if doc.is_empty() {
            warn!("No search results for {}", company);
            return RowOutcome::EmptySearch(ContactRecord::not_found(company));
        }

        let record = self.extractor.extract(company, &doc).await;
        debug!(
            "Extracted {} via {}: website={}, phone={}",
            company,
            self.extractor.name(),
            record.website_link,
            record.phone_number
        );

        let record = match &self.validator {
            Some(validator) => {
                validator
                    .validate(
                        record,
                        row.reference_address.as_deref(),
                        row.reference_postal_code.as_deref(),
                    )
                    .await
                    .0
            }
            None => record,
        };

        RowOutcome::Enriched(record)
    }

    /// Process rows in input order; the output has one record per input row.
    pub async fn run(&self, rows: &[InputRow], progress: &ProgressTracker) -> Vec<ContactRecord> {
        info!(
            "Enriching {} rows with the {} extractor",
            rows.len(),
            self.extractor.name()
        );

        let model_assisted = self.extractor.name() == "model-assisted";
        let mut records = Vec::with_capacity(rows.len());

        for (index, row) in rows.iter().enumerate() {
            progress.set_message(Validator::truncate_text(
                row.company().unwrap_or("<missing>"),
                40,
            ));

            let outcome = self.enrich_row(row).await;
            match &outcome {
                RowOutcome::Skipped(_) => progress.inc_rows_skipped(),
                RowOutcome::EmptySearch(record) => {
                    progress.inc_empty_searches();
                    progress.record_row(record, false);
                }
                RowOutcome::Enriched(record) => progress.record_row(record, model_assisted),
            }

            let is_last = index + 1 == rows.len();
            let cooldown = outcome.needs_cooldown() && !is_last;
            records.push(outcome.into_record());

            if cooldown && !self.row_delay.is_zero() {
                tokio::time::sleep(self.row_delay).await;
            }
        }

        records
    }
}
