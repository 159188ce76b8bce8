// file: src/llm/prompt.rs
// description: extraction prompt construction and tolerant JSON reply parsing
// reference: https://docs.rs/serde_json

use crate::error::{EnrichError, Result};
use crate::models::{ContactRecord, NOT_FOUND, SearchResultDocument};
use serde_json::{Map, Value};

const RECORD_KEYS: [(&str, &str); 7] = [
    ("website_link", "website or Not found"),
    ("address", "address or Not found"),
    ("phone_number", "phone or Not found"),
    ("extra_phone", "other phone numbers or Not found"),
    ("email_address", "email or Not found"),
    ("social_media_links", "social media links or Not found"),
    ("description", "business description or Not found"),
];

/// One line per organic result, knowledge-graph field and social link.
pub fn snippet_lines(doc: &SearchResultDocument) -> Vec<String> {
    let mut lines: Vec<String> = doc
        .organic
        .iter()
        .map(|item| format!("- {}: {} ({})", item.title, item.snippet, item.link))
        .collect();

    if let Some(kg) = &doc.knowledge_graph {
        lines.extend(
            kg.labeled_fields()
                .into_iter()
                .map(|(label, value)| format!("- {}: {}", label, value)),
        );
        lines.extend(kg.social.iter().map(|url| format!("- Social: {}", url)));
    }

    lines
}

/// `None` when the document has nothing to show the model.
pub fn build_prompt(company: &str, doc: &SearchResultDocument) -> Option<String> {
    let lines = snippet_lines(doc);
    if lines.is_empty() {
        return None;
    }

    let company_json = Value::String(company.to_string()).to_string();
    let mut template = format!("{{\n    \"company_name\": {},\n", company_json);
    for (index, (key, hint)) in RECORD_KEYS.iter().enumerate() {
        let separator = if index + 1 == RECORD_KEYS.len() { "" } else { "," };
        template.push_str(&format!("    \"{}\": \"{}\"{}\n", key, hint, separator));
    }
    template.push('}');

    Some(format!(
        "Extract company information from these search results. Return ONLY a JSON object.\n\n\
         Company: {}\n\
         Search Results:\n\
         {}\n\n\
         Return this exact JSON format:\n\
         {}\n",
        company,
        lines.join("\n"),
        template
    ))
}

/// Parse a model reply into a record; missing keys read as the sentinel.
pub fn parse_reply(company: &str, reply: &str) -> Result<ContactRecord> {
    let body = strip_code_fence(reply);

    let (Some(start), Some(end)) = (body.find('{'), body.rfind('}')) else {
        return Err(EnrichError::Parse("Reply contains no JSON object".to_string()));
    };
    if end < start {
        return Err(EnrichError::Parse("Reply contains no JSON object".to_string()));
    }

    let object: Map<String, Value> = serde_json::from_str(&body[start..=end])
        .map_err(|e| EnrichError::Parse(format!("Reply is not a JSON object: {}", e)))?;

    let field = |key: &str| object.get(key).map(value_to_field).unwrap_or_else(not_found);

    let company_name = object
        .get("company_name")
        .map(value_to_field)
        .filter(|name| crate::models::is_found(name))
        .unwrap_or_else(|| company.to_string());

    Ok(ContactRecord {
        company_name,
        website_link: field("website_link"),
        address: field("address"),
        phone_number: field("phone_number"),
        extra_phone: field("extra_phone"),
        email_address: field("email_address"),
        social_media_links: field("social_media_links"),
        description: field("description"),
        validation_status: Default::default(),
    })
}

fn strip_code_fence(reply: &str) -> &str {
    let mut body = reply.trim();

    if body.starts_with("```") {
        body = match body.find('\n') {
            Some(newline) => &body[newline + 1..],
            None => "",
        };
    }

    if let Some(stripped) = body.trim_end().strip_suffix("```") {
        body = stripped;
    }

    body.trim()
}

fn value_to_field(value: &Value) -> String {
    let text = match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_to_field)
            .filter(|item| crate::models::is_found(item))
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    };

    if text.is_empty() { not_found() } else { text }
}

fn not_found() -> String {
    NOT_FOUND.to_string()
}
