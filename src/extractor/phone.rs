// file: src/extractor/phone.rs
// description: primary and secondary phone extraction with registration-number rejection and safe UTF-8 context windows
// reference: https://docs.rs/regex

use crate::extractor::patterns::{
    PLUS_PREFIXED_NUMBER, REGISTRATION_KEYWORDS, REGISTRATION_SHAPE, digits_only,
};
use crate::extractor::region::RegionPatterns;
use crate::models::{NOT_FOUND, SearchResultDocument, is_found};
use std::collections::HashSet;
use tracing::debug;

const MEDIUM_CONTEXT_WINDOW: usize = 50;
const LOW_CONTEXT_WINDOW: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhoneCandidate {
    pub confidence: Confidence,
    pub number: String,
    pub context: String,
}

/// Every phone-shaped match in `text`, ordered by confidence then discovery.
pub fn collect_candidates(text: &str, region: &RegionPatterns) -> Vec<PhoneCandidate> {
    let mut candidates = Vec::new();

    for caps in region.keyword_phone.captures_iter(text) {
        if let (Some(whole), Some(number)) = (caps.get(0), caps.get(1)) {
            candidates.push(PhoneCandidate {
                confidence: Confidence::High,
                number: number.as_str().to_string(),
                context: whole.as_str().to_string(),
            });
        }
    }

    for found in region.international_phone.find_iter(text) {
        candidates.push(PhoneCandidate {
            confidence: Confidence::Medium,
            number: found.as_str().to_string(),
            context: context_window(text, found.start(), found.end(), MEDIUM_CONTEXT_WINDOW),
        });
    }

    for found in region.local_phone.find_iter(text) {
        candidates.push(PhoneCandidate {
            confidence: Confidence::Low,
            number: found.as_str().to_string(),
            context: context_window(text, found.start(), found.end(), LOW_CONTEXT_WINDOW),
        });
    }

    // stable: ties keep discovery order
    candidates.sort_by_key(|candidate| candidate.confidence);
    candidates
}

pub fn is_registration_number(number: &str, context: &str) -> bool {
    let cleaned: String = number
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();

    if cleaned.len() < 8 || !REGISTRATION_SHAPE.is_match(&cleaned) {
        return false;
    }

    let context = context.to_lowercase();
    REGISTRATION_KEYWORDS
        .iter()
        .any(|keyword| context.contains(keyword))
}

/// Most probable primary phone, or the sentinel.
pub fn extract_primary_phone(doc: &SearchResultDocument, region: &RegionPatterns) -> String {
    if let Some(phone) = doc
        .knowledge_graph
        .as_ref()
        .and_then(|kg| kg.phone.as_deref())
        .filter(|phone| region.is_valid_phone(phone))
    {
        return phone.to_string();
    }

    let text = doc.combined_text();
    let candidates = collect_candidates(&text, region);
    debug!("Found {} phone candidates", candidates.len());

    candidates
        .into_iter()
        .find(|candidate| {
            region.is_valid_phone(&candidate.number)
                && !is_registration_number(&candidate.number, &candidate.context)
        })
        .map(|candidate| candidate.number)
        .unwrap_or_else(|| NOT_FOUND.to_string())
}

/// "+"-prefixed numbers other than the primary, comma-joined, or the sentinel.
///
/// A number only counts as the primary when its digits are identical, so
/// "+65 9123 4567" is kept next to a primary of "91234567".
pub fn extract_extra_phones(text: &str, primary: &str) -> String {
    let primary_digits = is_found(primary).then(|| digits_only(primary));

    let mut seen = HashSet::new();
    let mut extras = Vec::new();

    for found in PLUS_PREFIXED_NUMBER.find_iter(text) {
        let number = found.as_str().trim();

        if primary_digits.as_deref() == Some(digits_only(number).as_str()) {
            continue;
        }

        if seen.insert(number.to_string()) {
            extras.push(number.to_string());
        }
    }

    if extras.is_empty() {
        NOT_FOUND.to_string()
    } else {
        extras.join(", ")
    }
}

fn context_window(text: &str, start: usize, end: usize, window: usize) -> String {
    let context_start = find_char_boundary_before(text, start.saturating_sub(window));
    let context_end = find_char_boundary_after(text, (end + window).min(text.len()));
    text[context_start..context_end].to_string()
}

fn find_char_boundary_before(text: &str, pos: usize) -> usize {
    let mut pos = pos.min(text.len());
    while pos > 0 && !text.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

fn find_char_boundary_after(text: &str, pos: usize) -> usize {
    let mut pos = pos.min(text.len());
    while pos < text.len() && !text.is_char_boundary(pos) {
        pos += 1;
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::region::RegionProfile;
    use crate::models::{KnowledgeGraph, OrganicResult};

    fn region() -> RegionPatterns {
        RegionPatterns::compile(RegionProfile::singapore()).unwrap()
    }

    fn doc_with_snippet(snippet: &str) -> SearchResultDocument {
        SearchResultDocument::with_organic(vec![OrganicResult::new(
            "ABC Pte Ltd",
            snippet,
            "https://abc.sg",
        )])
    }

    #[test]
    fn test_keyword_candidate_outranks_earlier_bare_number() {
        let doc = doc_with_snippet("Showroom 81234567 open daily. Contact: 6123 4567");
        assert_eq!(extract_primary_phone(&doc, &region()), "6123 4567");
    }

    #[test]
    fn test_international_outranks_local() {
        let doc = doc_with_snippet("Fax 61112222 or reach +65 9876 5432 anytime");
        assert_eq!(extract_primary_phone(&doc, &region()), "+65 9876 5432");
    }

    #[test]
    fn test_candidate_order() {
        let text = "Fax 61112222, Tel: 62223333 and +65 93334444";
        let candidates = collect_candidates(text, &region());
        let tiers: Vec<_> = candidates.iter().map(|c| c.confidence).collect();
        assert_eq!(
            tiers,
            vec![
                Confidence::High,
                Confidence::Medium,
                Confidence::Low,
                Confidence::Low,
                Confidence::Low
            ]
        );
        assert_eq!(candidates[0].number, "62223333");
        assert_eq!(candidates[2].number, "61112222");
    }

    #[test]
    fn test_registration_number_rejected_near_uen() {
        let doc = doc_with_snippet("UEN 81234567 registered with ACRA");
        assert_eq!(extract_primary_phone(&doc, &region()), NOT_FOUND);
    }

    #[test]
    fn test_registration_shaped_token_never_returned() {
        let doc = doc_with_snippet("ABC Pte Ltd UEN: 202012345K. Call 9123 4567");
        let phone = extract_primary_phone(&doc, &region());
        assert_ne!(phone, "202012345K");
        assert!(is_registration_number("202012345K", "UEN: 202012345K"));
    }

    #[test]
    fn test_registration_requires_business_context() {
        assert!(!is_registration_number("91234567", "Call us at 91234567"));
        assert!(is_registration_number("91234567", "Company reg no 91234567"));
        assert!(!is_registration_number("+65 9123 4567", "UEN +65 9123 4567"));
    }

    #[test]
    fn test_knowledge_graph_phone_wins() {
        let doc = doc_with_snippet("Call us at 91234567").with_knowledge_graph(KnowledgeGraph {
            phone: Some("+65 6555 0000".to_string()),
            ..Default::default()
        });
        assert_eq!(extract_primary_phone(&doc, &region()), "+65 6555 0000");
    }

    #[test]
    fn test_invalid_knowledge_graph_phone_ignored() {
        let doc = doc_with_snippet("Call us at 91234567").with_knowledge_graph(KnowledgeGraph {
            phone: Some("1800 123 4567".to_string()),
            ..Default::default()
        });
        assert_eq!(extract_primary_phone(&doc, &region()), "91234567");
    }

    #[test]
    fn test_no_candidates() {
        let doc = doc_with_snippet("Leading fashion retailer since 1999");
        assert_eq!(extract_primary_phone(&doc, &region()), NOT_FOUND);
    }

    #[test]
    fn test_extra_phones_skip_primary_and_duplicates() {
        let text = "Tel +65 6123 4567. KL office +60 3-2141 8888, again +60 3-2141 8888 ";
        let extras = extract_extra_phones(text, "+65 6123-4567");
        assert_eq!(extras, "+60 3-2141 8888");
    }

    #[test]
    fn test_extra_phones_keep_international_form_of_local_primary() {
        let text = "Tel +65 9123 4567. KL office +60 3-2141 8888 ";
        let extras = extract_extra_phones(text, "91234567");
        assert_eq!(extras, "+65 9123 4567, +60 3-2141 8888");
    }

    #[test]
    fn test_extra_phones_when_primary_missing() {
        let extras = extract_extra_phones("+65 6123 4567 and +1 415 555 0100", NOT_FOUND);
        assert_eq!(extras, "+65 6123 4567, +1 415 555 0100");
        assert_eq!(extract_extra_phones("no numbers", NOT_FOUND), NOT_FOUND);
    }

    #[test]
    fn test_context_window_is_char_safe() {
        let text = "🚨中文 Call 91234567 日本語 🎌";
        let candidates = collect_candidates(text, &region());
        assert!(!candidates.is_empty());
        assert!(candidates.iter().all(|c| c.context.contains("91234567")));
    }
}
