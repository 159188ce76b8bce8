// file: src/extractor/heuristic.rs
// description: merges knowledge graph values and regex field heuristics into one contact record
// reference: knowledge graph precedence, gap filling from organic results

use crate::extractor::ContactExtractor;
use crate::extractor::fields::{
    DescriptionMode, collect_social_links, extract_address, extract_description, extract_email,
    extract_website, join_social_links,
};
use crate::extractor::phone::{extract_extra_phones, extract_primary_phone};
use crate::extractor::region::RegionPatterns;
use crate::models::{ContactRecord, KnowledgeGraph, SearchResultDocument, is_found};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct HeuristicExtractor {
    region: Arc<RegionPatterns>,
    description_mode: DescriptionMode,
}

impl HeuristicExtractor {
    pub fn new(region: Arc<RegionPatterns>, description_mode: DescriptionMode) -> Self {
        Self {
            region,
            description_mode,
        }
    }

    pub fn region(&self) -> &RegionPatterns {
        &self.region
    }

    /// Deterministic: the same document always yields the same record.
    pub fn extract_record(&self, company: &str, doc: &SearchResultDocument) -> ContactRecord {
        debug!(
            "Heuristic extraction for {} over {} organic results (knowledge graph: {})",
            company,
            doc.organic.len(),
            doc.knowledge_graph.is_some()
        );

        let mut record = ContactRecord::not_found(company);

        if let Some(kg) = &doc.knowledge_graph {
            self.overlay_knowledge_graph(&mut record, kg);
        }

        let text = doc.combined_text();

        if !is_found(&record.website_link)
            && let Some(website) = extract_website(doc, &self.region)
        {
            record.website_link = website;
        }

        if !is_found(&record.phone_number) {
            record.phone_number = extract_primary_phone(doc, &self.region);
        }

        if !is_found(&record.extra_phone) {
            record.extra_phone = extract_extra_phones(&text, &record.phone_number);
        }

        if !is_found(&record.email_address)
            && let Some(email) = extract_email(&text)
        {
            record.email_address = email;
        }

        if !is_found(&record.address)
            && let Some(address) = extract_address(doc, &self.region)
        {
            record.address = address;
        }

        if !is_found(&record.description)
            && let Some(description) = extract_description(doc, &self.region, self.description_mode)
        {
            record.description = description;
        }

        let social = collect_social_links(doc, &self.region);
        record.social_media_links = join_social_links(&social);

        record
    }

    fn overlay_knowledge_graph(&self, record: &mut ContactRecord, kg: &KnowledgeGraph) {
        let present = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        if let Some(website) = present(&kg.website) {
            record.website_link = website;
        }
        if let Some(address) = present(&kg.address) {
            record.address = address;
        }
        if let Some(phone) = present(&kg.phone).filter(|p| self.region.is_valid_phone(p)) {
            record.phone_number = phone;
        }
        if let Some(extra) = present(&kg.extra_phone) {
            record.extra_phone = extra;
        }
        if let Some(email) = present(&kg.email) {
            record.email_address = email;
        }
        if let Some(description) = present(&kg.description) {
            record.description = description;
        }
    }
}

#[async_trait]
impl ContactExtractor for HeuristicExtractor {
    async fn extract(&self, company: &str, doc: &SearchResultDocument) -> ContactRecord {
        self.extract_record(company, doc)
    }

    fn name(&self) -> &'static str {
        "heuristic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::region::RegionProfile;
    use crate::models::{NOT_FOUND, OrganicResult};
    use pretty_assertions::assert_eq;

    fn extractor(mode: DescriptionMode) -> HeuristicExtractor {
        let region = RegionPatterns::compile(RegionProfile::singapore()).unwrap();
        HeuristicExtractor::new(Arc::new(region), mode)
    }

    fn abc_document() -> SearchResultDocument {
        SearchResultDocument::with_organic(vec![OrganicResult::new(
            "ABC Pte Ltd",
            "Call us at 91234567 or email info@abc.sg",
            "https://abc.sg",
        )])
    }

    #[test]
    fn test_end_to_end_organic_only() {
        let record = extractor(DescriptionMode::Strict).extract_record("ABC Pte Ltd", &abc_document());

        let mut expected = ContactRecord::not_found("ABC Pte Ltd");
        expected.website_link = "https://abc.sg".to_string();
        expected.phone_number = "91234567".to_string();
        expected.email_address = "info@abc.sg".to_string();

        assert_eq!(record, expected);
        assert_eq!(record.address, NOT_FOUND);
        assert_eq!(record.social_media_links, NOT_FOUND);
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let doc = SearchResultDocument::with_organic(vec![
            OrganicResult::new("ABC", "Tel: +65 6123 4567, +60 3-2141 8888", "https://abc.sg"),
            OrganicResult::new("ABC", "", "https://facebook.com/abc"),
            OrganicResult::new("ABC", "", "https://instagram.com/abc"),
            OrganicResult::new("ABC", "Visit 10 Orchard Road", "https://abc.com"),
        ]);
        let extractor = extractor(DescriptionMode::Strict);

        let first = extractor.extract_record("ABC", &doc);
        let second = extractor.extract_record("ABC", &doc);
        assert_eq!(first, second);
        assert_eq!(first.extra_phone, "+60 3-2141 8888");
        assert_eq!(first.address, "10 Orchard Road");
    }

    #[test]
    fn test_knowledge_graph_takes_precedence() {
        let doc = abc_document().with_knowledge_graph(KnowledgeGraph {
            website: Some("https://www.abc.com.sg".to_string()),
            phone: Some("+65 6555 0000".to_string()),
            email: Some("hello@abc.com.sg".to_string()),
            address: Some("1 Marina Boulevard, Singapore 018989".to_string()),
            description: Some("Apparel label".to_string()),
            social: vec!["https://facebook.com/abc".to_string()],
            ..Default::default()
        });

        let record = extractor(DescriptionMode::Strict).extract_record("ABC", &doc);
        assert_eq!(record.website_link, "https://www.abc.com.sg");
        assert_eq!(record.phone_number, "+65 6555 0000");
        assert_eq!(record.email_address, "hello@abc.com.sg");
        assert_eq!(record.address, "1 Marina Boulevard, Singapore 018989");
        assert_eq!(record.description, "Apparel label");
        assert_eq!(record.social_media_links, "https://facebook.com/abc");
        assert_eq!(record.extra_phone, NOT_FOUND);
    }

    #[test]
    fn test_invalid_knowledge_graph_phone_falls_back_to_text() {
        let doc = abc_document().with_knowledge_graph(KnowledgeGraph {
            phone: Some("not a phone".to_string()),
            ..Default::default()
        });

        let record = extractor(DescriptionMode::Strict).extract_record("ABC", &doc);
        assert_eq!(record.phone_number, "91234567");
    }

    #[test]
    fn test_empty_document_is_all_not_found() {
        let record = extractor(DescriptionMode::Permissive)
            .extract_record("Ghost Co", &SearchResultDocument::empty());
        assert_eq!(record, ContactRecord::not_found("Ghost Co"));
    }

    #[test]
    fn test_trait_dispatch_matches_direct_call() {
        let extractor = extractor(DescriptionMode::Strict);
        let doc = abc_document();
        let via_trait = tokio_test::block_on(ContactExtractor::extract(&extractor, "ABC", &doc));
        assert_eq!(via_trait, extractor.extract_record("ABC", &doc));
        assert_eq!(extractor.name(), "heuristic");
    }
}
