// file: src/llm/assisted.rs
// description: language-model extraction with bounded retries and heuristic fallback
// reference: exponential backoff, https://docs.rs/tokio/latest/tokio/time/fn.sleep.html

use crate::config::ModelConfig;
use crate::extractor::fields::normalize_social_links;
use crate::extractor::phone::extract_primary_phone;
use crate::extractor::{ContactExtractor, HeuristicExtractor};
use crate::llm::LanguageModel;
use crate::llm::prompt::{build_prompt, parse_reply};
use crate::models::{ContactRecord, SearchResultDocument, is_found};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct ModelAssistedExtractor {
    model: Arc<dyn LanguageModel>,
    fallback: HeuristicExtractor,
    max_retries: u32,
    backoff_base: Duration,
}

impl ModelAssistedExtractor {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        fallback: HeuristicExtractor,
        max_retries: u32,
        backoff_base: Duration,
    ) -> Self {
        Self {
            model,
            fallback,
            max_retries,
            backoff_base,
        }
    }

    pub fn from_config(
        model: Arc<dyn LanguageModel>,
        fallback: HeuristicExtractor,
        config: &ModelConfig,
    ) -> Self {
        Self::new(
            model,
            fallback,
            config.max_retries,
            Duration::from_millis(config.backoff_base_ms),
        )
    }

    /// Delay before the attempt after `attempt` (zero-based): `base * 2^attempt`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.backoff_base.saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Model replies get the same guarantees as heuristic records: the phone passes the
    /// region validator (else the heuristic phone is used) and social links are unique.
    fn conform(&self, mut record: ContactRecord, doc: &SearchResultDocument) -> ContactRecord {
        let region = self.fallback.region();

        if is_found(&record.phone_number) && !region.is_valid_phone(&record.phone_number) {
            debug!(
                "Model phone '{}' for {} fails validation, using heuristic phone",
                record.phone_number, record.company_name
            );
            record.phone_number = extract_primary_phone(doc, region);
        }

        record.social_media_links = normalize_social_links(&record.social_media_links);
        record
    }

    async fn ask_model(&self, company: &str, prompt: &str) -> Option<ContactRecord> {
        for attempt in 0..self.max_retries {
            debug!(
                "Model attempt {}/{} for {}",
                attempt + 1,
                self.max_retries,
                company
            );

            let outcome = match self.model.complete(prompt).await {
                Ok(reply) => parse_reply(company, &reply),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(record) => return Some(record),
                Err(e) => warn!(
                    "Model attempt {}/{} failed for {}: {}",
                    attempt + 1,
                    self.max_retries,
                    company,
                    e
                ),
            }

            if attempt + 1 < self.max_retries {
                tokio::time::sleep(self.backoff_delay(attempt)).await;
            }
        }

        None
    }
}

#[async_trait]
impl ContactExtractor for ModelAssistedExtractor {
    async fn extract(&self, company: &str, doc: &SearchResultDocument) -> ContactRecord {
        let Some(prompt) = build_prompt(company, doc) else {
            debug!("No search content for {}, using heuristics", company);
            return self.fallback.extract_record(company, doc);
        };

        if let Some(record) = self.ask_model(company, &prompt).await {
            return self.conform(record, doc);
        }

        if self.max_retries > 0 {
            info!("Falling back to heuristic extraction for {}", company);
        }
        self.fallback.extract_record(company, doc)
    }

    fn name(&self) -> &'static str {
        "model-assisted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::{DescriptionMode, RegionPatterns, RegionProfile};
    use crate::models::OrganicResult;
    use crate::testing::ScriptedModel;
    use pretty_assertions::assert_eq;

    fn heuristic() -> HeuristicExtractor {
        let region = RegionPatterns::compile(RegionProfile::singapore()).unwrap();
        HeuristicExtractor::new(Arc::new(region), DescriptionMode::Strict)
    }

    fn abc_document() -> SearchResultDocument {
        SearchResultDocument::with_organic(vec![OrganicResult::new(
            "ABC Pte Ltd",
            "Call us at 91234567 or email info@abc.sg",
            "https://abc.sg",
        )])
    }

    fn extractor(model: Arc<ScriptedModel>, retries: u32) -> ModelAssistedExtractor {
        ModelAssistedExtractor::new(model, heuristic(), retries, Duration::ZERO)
    }

    #[tokio::test]
    async fn test_zero_retries_never_calls_model() {
        let model = Arc::new(ScriptedModel::always_failing());
        let record = extractor(model.clone(), 0)
            .extract("ABC Pte Ltd", &abc_document())
            .await;

        assert_eq!(model.calls(), 0);
        assert_eq!(record, heuristic().extract_record("ABC Pte Ltd", &abc_document()));
    }

    #[tokio::test]
    async fn test_failing_model_called_exactly_r_times() {
        let model = Arc::new(ScriptedModel::always_failing());
        let record = extractor(model.clone(), 3)
            .extract("ABC Pte Ltd", &abc_document())
            .await;

        assert_eq!(model.calls(), 3);
        assert_eq!(record, heuristic().extract_record("ABC Pte Ltd", &abc_document()));
    }

    #[tokio::test]
    async fn test_fenced_reply_is_used() {
        let model = Arc::new(ScriptedModel::with_replies(vec![Ok(
            "```json\n{\"company_name\": \"ABC Pte Ltd\", \"address\": \"10 Orchard Road\"}\n```"
                .to_string(),
        )]));
        let record = extractor(model.clone(), 2)
            .extract("ABC Pte Ltd", &abc_document())
            .await;

        assert_eq!(model.calls(), 1);
        assert_eq!(record.address, "10 Orchard Road");
        assert_eq!(record.phone_number, crate::models::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_model_reply_is_held_to_record_invariants() {
        let model = Arc::new(ScriptedModel::with_replies(vec![Ok(r#"{
            "phone_number": "12345678",
            "social_media_links": ["https://facebook.com/abc", "https://facebook.com/abc"]
        }"#
        .to_string())]));
        let record = extractor(model, 1)
            .extract("ABC Pte Ltd", &abc_document())
            .await;

        assert_eq!(record.phone_number, "91234567");
        assert_eq!(record.social_media_links, "https://facebook.com/abc");
    }

    #[tokio::test]
    async fn test_valid_model_phone_is_kept() {
        let model = Arc::new(ScriptedModel::with_replies(vec![Ok(
            r#"{"phone_number": "+65 6555 0000"}"#.to_string(),
        )]));
        let record = extractor(model, 1)
            .extract("ABC Pte Ltd", &abc_document())
            .await;

        assert_eq!(record.phone_number, "+65 6555 0000");
        assert_eq!(record.social_media_links, crate::models::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unparseable_reply_is_retried() {
        let model = Arc::new(ScriptedModel::with_replies(vec![
            Ok("sorry, no idea".to_string()),
            Ok("{\"email_address\": \"hello@abc.sg\"}".to_string()),
        ]));
        let record = extractor(model.clone(), 3)
            .extract("ABC Pte Ltd", &abc_document())
            .await;

        assert_eq!(model.calls(), 2);
        assert_eq!(record.email_address, "hello@abc.sg");
    }

    #[tokio::test]
    async fn test_empty_document_skips_model() {
        let model = Arc::new(ScriptedModel::always_failing());
        let record = extractor(model.clone(), 3)
            .extract("Ghost Co", &SearchResultDocument::empty())
            .await;

        assert_eq!(model.calls(), 0);
        assert_eq!(record, ContactRecord::not_found("Ghost Co"));
    }

    #[test]
    fn test_backoff_doubles() {
        let model = Arc::new(ScriptedModel::always_failing());
        let extractor =
            ModelAssistedExtractor::new(model, heuristic(), 3, Duration::from_millis(500));
        assert_eq!(extractor.backoff_delay(0), Duration::from_millis(500));
        assert_eq!(extractor.backoff_delay(1), Duration::from_millis(1000));
        assert_eq!(extractor.backoff_delay(2), Duration::from_millis(2000));
        assert_eq!(extractor.name(), "model-assisted");
    }
}
