// file: src/extractor/patterns.rs
// description: compiled regex patterns and keyword tables shared by every region
// reference: https://docs.rs/regex

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    pub static ref EMAIL: Regex = Regex::new(
        r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b"
    ).expect("EMAIL regex is valid");

    // "+" then a digit and at least six more digits or separators
    pub static ref PLUS_PREFIXED_NUMBER: Regex = Regex::new(
        r"\+\d[\d\s\-()]{6,}"
    ).expect("PLUS_PREFIXED_NUMBER regex is valid");

    pub static ref PHONE_SEPARATORS: Regex = Regex::new(
        r"[\s\-()]"
    ).expect("PHONE_SEPARATORS regex is valid");

    pub static ref REGISTRATION_SHAPE: Regex = Regex::new(
        r"^[0-9]{8,10}[A-Z]?$"
    ).expect("REGISTRATION_SHAPE regex is valid");
}

/// Words that introduce a phone number in running text.
pub const PHONE_KEYWORDS: &[&str] = &["phone", "tel", "call", "contact", "mobile", "whatsapp"];

/// Words that mark a nearby number as a business registration identifier.
pub const REGISTRATION_KEYWORDS: &[&str] = &[
    "uen",
    "reg",
    "registration",
    "company",
    "acra",
    "incorporated",
    "roc",
];

/// Snippets containing any of these are contact blurbs, not descriptions.
pub const DESCRIPTION_EXCLUDED_KEYWORDS: &[&str] = &[
    "phone", "tel", "call", "whatsapp", "email", "@", "contact", "address",
];

pub fn strip_phone_separators(number: &str) -> String {
    PHONE_SEPARATORS.replace_all(number, "").into_owned()
}

pub fn digits_only(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}
