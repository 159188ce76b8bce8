// file: src/extractor/fields.rs
// description: website, social, email, address and description heuristics over search results
// reference: https://docs.rs/regex, https://docs.rs/url

use crate::extractor::patterns::EMAIL;
use crate::extractor::region::RegionPatterns;
use crate::models::{NOT_FOUND, SearchResultDocument, is_found};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use url::Url;

const MIN_DESCRIPTION_CHARS: usize = 20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptionMode {
    /// First snippet longer than the minimum length.
    Permissive,
    /// Additionally skips snippets that read like an address or contact blurb.
    #[default]
    Strict,
}

pub fn extract_website(doc: &SearchResultDocument, region: &RegionPatterns) -> Option<String> {
    doc.organic
        .iter()
        .map(|item| item.link.as_str())
        .find(|link| !region.mentions_social_platform(link) && has_allowed_suffix(link, region))
        .map(str::to_string)
}

fn has_allowed_suffix(link: &str, region: &RegionPatterns) -> bool {
    let Ok(url) = Url::parse(link) else {
        return false;
    };
    let Some(host) = url.host_str() else {
        return false;
    };
    let host = host.to_lowercase();

    region.profile().website_suffixes.iter().any(|suffix| {
        let suffix = suffix.to_lowercase();
        host.ends_with(&suffix) || host.contains(&format!("{}.", suffix))
    })
}

/// De-duplicated social profile URLs: knowledge graph first, then organic links in rank order.
pub fn collect_social_links(doc: &SearchResultDocument, region: &RegionPatterns) -> Vec<String> {
    let knowledge_links = doc
        .knowledge_graph
        .iter()
        .flat_map(|kg| kg.social.iter())
        .map(|link| link.trim())
        .filter(|link| !link.is_empty());

    let organic_links = doc
        .organic
        .iter()
        .map(|item| item.link.as_str())
        .filter(|link| region.is_social_link(link));

    let mut seen = HashSet::new();
    knowledge_links
        .chain(organic_links)
        .filter(|link| seen.insert(link.to_string()))
        .map(str::to_string)
        .collect()
}

pub fn join_social_links(links: &[String]) -> String {
    if links.is_empty() {
        NOT_FOUND.to_string()
    } else {
        links.join(", ")
    }
}

/// Re-join a comma-separated link list with blanks and repeats removed.
pub fn normalize_social_links(joined: &str) -> String {
    let mut seen = HashSet::new();
    let links: Vec<String> = joined
        .split(',')
        .map(str::trim)
        .filter(|link| is_found(link) && seen.insert(link.to_string()))
        .map(str::to_string)
        .collect();
    join_social_links(&links)
}

pub fn extract_email(text: &str) -> Option<String> {
    EMAIL.find(text).map(|found| found.as_str().to_string())
}

/// First street address found in organic snippets, in rank order.
pub fn extract_address(doc: &SearchResultDocument, region: &RegionPatterns) -> Option<String> {
    doc.organic.iter().find_map(|item| {
        region
            .address
            .find(&item.snippet)
            .map(|found| found.as_str().trim().to_string())
    })
}

pub fn extract_description(
    doc: &SearchResultDocument,
    region: &RegionPatterns,
    mode: DescriptionMode,
) -> Option<String> {
    let excluded = region.description_excluded_keywords();

    doc.organic
        .iter()
        .map(|item| item.snippet.trim())
        .filter(|snippet| snippet.chars().count() > MIN_DESCRIPTION_CHARS)
        .find(|snippet| match mode {
            DescriptionMode::Permissive => true,
            DescriptionMode::Strict => !looks_like_contact_details(snippet, region, &excluded),
        })
        .map(str::to_string)
}

fn looks_like_contact_details(snippet: &str, region: &RegionPatterns, excluded: &[String]) -> bool {
    if region.address.is_match(snippet) || region.find_postal_code(snippet).is_some() {
        return true;
    }

    let lower = snippet.to_lowercase();
    excluded.iter().any(|keyword| lower.contains(keyword.as_str()))
}
