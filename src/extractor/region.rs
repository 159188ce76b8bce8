// file: src/extractor/region.rs
// description: locale profile (phone, postal, street vocabulary) compiled into region patterns
// reference: https://docs.rs/regex

use crate::error::{EnrichError, Result};
use crate::extractor::patterns::strip_phone_separators;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Locale-specific formats the extraction heuristics are parameterized over.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RegionProfile {
    pub country: String,
    /// Calling code without the leading "+".
    pub country_code: String,
    pub phone_length: usize,
    pub phone_first_digits: String,
    pub postal_code_length: usize,
    /// Letter that may precede a postal code, e.g. "S123456".
    pub postal_prefix: String,
    pub street_suffixes: Vec<String>,
    /// Domains identifying social profiles, e.g. "facebook.com".
    pub social_platforms: Vec<String>,
    pub website_suffixes: Vec<String>,
}

impl Default for RegionProfile {
    fn default() -> Self {
        Self::singapore()
    }
}

impl RegionProfile {
    pub fn singapore() -> Self {
        let to_strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();

        Self {
            country: "Singapore".to_string(),
            country_code: "65".to_string(),
            phone_length: 8,
            phone_first_digits: "689".to_string(),
            postal_code_length: 6,
            postal_prefix: "S".to_string(),
            street_suffixes: to_strings(&[
                "Road", "Rd", "Street", "St", "Avenue", "Ave", "Drive", "Dr", "Lane", "Ln",
                "Way", "Place", "Pl", "Close", "Cl", "Boulevard", "Blk", "Building", "Centre",
                "Tower", "Plaza",
            ]),
            social_platforms: to_strings(&[
                "facebook.com",
                "instagram.com",
                "linkedin.com",
                "twitter.com",
                "tiktok.com",
            ]),
            website_suffixes: to_strings(&[".com", ".sg", ".net", ".org"]),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.country_code.is_empty() || !self.country_code.chars().all(|c| c.is_ascii_digit()) {
            return Err(EnrichError::Config(format!(
                "country_code must be digits, got '{}'",
                self.country_code
            )));
        }

        if self.phone_length < 2 {
            return Err(EnrichError::Config(
                "phone_length must be at least 2".to_string(),
            ));
        }

        if self.phone_first_digits.is_empty()
            || !self.phone_first_digits.chars().all(|c| c.is_ascii_digit())
        {
            return Err(EnrichError::Config(
                "phone_first_digits must be a non-empty set of digits".to_string(),
            ));
        }

        if self.postal_code_length == 0 {
            return Err(EnrichError::Config(
                "postal_code_length must be greater than 0".to_string(),
            ));
        }

        if self.street_suffixes.is_empty() {
            return Err(EnrichError::Config(
                "street_suffixes must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// A `RegionProfile` with every derived regex compiled once.
#[derive(Debug, Clone)]
pub struct RegionPatterns {
    profile: RegionProfile,
    pub keyword_phone: Regex,
    pub international_phone: Regex,
    pub local_phone: Regex,
    pub address: Regex,
    pub postal_code: Regex,
    /// Platform names without their TLD ("facebook"), for rejecting website candidates.
    social_names: Vec<String>,
}

impl RegionPatterns {
    pub fn compile(profile: RegionProfile) -> Result<Self> {
        profile.validate()?;

        let cc = regex::escape(&profile.country_code);
        let local = local_number_pattern(&profile);

        let keywords = crate::extractor::patterns::PHONE_KEYWORDS.join("|");
        let keyword_phone = Regex::new(&format!(
            r"(?i)(?:{keywords})[\s:]*(\+?{cc}[\s\-]?{local}|{local})"
        ))?;
        let international_phone = Regex::new(&format!(r"\+{cc}[\s\-]?{local}"))?;
        let local_phone = Regex::new(&format!(r"\b{local}\b"))?;

        let suffixes = profile
            .street_suffixes
            .iter()
            .map(|s| regex::escape(s))
            .collect::<Vec<_>>()
            .join("|");
        let country = regex::escape(&profile.country);
        let prefix = regex::escape(&profile.postal_prefix);
        let postal_len = profile.postal_code_length;
        let postal_min = postal_len.saturating_sub(2).max(1);
        let address = Regex::new(&format!(
            r"(?i)(\d{{1,3}}[\w\s\-,]+(?:{suffixes})[^,.]*?({country}\s*\d{{{postal_min},{postal_len}}}|{prefix}\d{{{postal_min},{postal_len}}})?)"
        ))?;
        // the prefix letter or country name may sit directly against the digits
        let postal_code = Regex::new(&format!(
            r"(?i)(?:{prefix}|{country}\s*|\b)(\d{{{postal_len}}})\b"
        ))?;

        let social_names = profile
            .social_platforms
            .iter()
            .map(|platform| {
                platform
                    .split('.')
                    .next()
                    .unwrap_or(platform)
                    .to_lowercase()
            })
            .collect();

        Ok(Self {
            profile,
            keyword_phone,
            international_phone,
            local_phone,
            address,
            postal_code,
            social_names,
        })
    }

    pub fn profile(&self) -> &RegionProfile {
        &self.profile
    }

    /// The number with separators and a leading country code removed.
    pub fn national_number(&self, number: &str) -> String {
        let cleaned = strip_phone_separators(number);
        let cc = &self.profile.country_code;

        if let Some(rest) = cleaned.strip_prefix('+').and_then(|s| s.strip_prefix(cc.as_str())) {
            rest.to_string()
        } else if let Some(rest) = cleaned.strip_prefix(cc.as_str()) {
            rest.to_string()
        } else {
            cleaned
        }
    }

    pub fn is_valid_phone(&self, number: &str) -> bool {
        let national = self.national_number(number);

        national.len() == self.profile.phone_length
            && national.chars().all(|c| c.is_ascii_digit())
            && national
                .chars()
                .next()
                .is_some_and(|first| self.profile.phone_first_digits.contains(first))
    }

    /// First postal code found in `text`, without its prefix letter.
    pub fn find_postal_code(&self, text: &str) -> Option<String> {
        self.postal_code
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Reduce a reference postal code to digits, restoring leading zeros lost in spreadsheets.
    pub fn normalize_postal_code(&self, raw: &str) -> Option<String> {
        let without_fraction = raw.trim().split('.').next().unwrap_or_default();
        let digits = crate::extractor::patterns::digits_only(without_fraction);

        if digits.is_empty() || digits.len() > self.profile.postal_code_length {
            return None;
        }

        Some(format!(
            "{:0>width$}",
            digits,
            width = self.profile.postal_code_length
        ))
    }

    pub fn is_social_link(&self, link: &str) -> bool {
        let lower = link.to_lowercase();
        self.profile
            .social_platforms
            .iter()
            .any(|platform| lower.contains(&platform.to_lowercase()))
    }

    pub fn mentions_social_platform(&self, link: &str) -> bool {
        let lower = link.to_lowercase();
        self.social_names.iter().any(|name| lower.contains(name))
    }

    pub fn description_excluded_keywords(&self) -> Vec<String> {
        let mut keywords: Vec<String> = crate::extractor::patterns::DESCRIPTION_EXCLUDED_KEYWORDS
            .iter()
            .map(|k| k.to_string())
            .collect();
        keywords.push(format!("+{}", self.profile.country_code));
        keywords.push(self.profile.country.to_lowercase());
        keywords
    }
}

fn local_number_pattern(profile: &RegionProfile) -> String {
    let first = regex::escape(&profile.phone_first_digits);
    let split = profile.phone_length / 2;
    let head = split - 1;
    let tail = profile.phone_length - split;
    format!(r"[{first}]\d{{{head}}}[\s\-]?\d{{{tail}}}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn singapore() -> RegionPatterns {
        RegionPatterns::compile(RegionProfile::singapore()).unwrap()
    }

    #[test]
    fn test_phone_validator() {
        let region = singapore();
        assert!(region.is_valid_phone("+65 9123 4567"));
        assert_eq!(region.national_number("+65 9123 4567"), "91234567");
        assert!(region.is_valid_phone("6123-4567"));
        assert!(region.is_valid_phone("(65) 8123 4567"));
        assert!(!region.is_valid_phone("12345678"));
        assert!(!region.is_valid_phone("65123456"));
        assert!(!region.is_valid_phone("9123456"));
        assert!(!region.is_valid_phone("9123 456a"));
    }

    #[test]
    fn test_local_pattern_shape() {
        let region = singapore();
        assert!(region.local_phone.is_match("call 9123 4567 now"));
        assert!(region.local_phone.is_match("6123-4567"));
        assert!(!region.local_phone.is_match("912345678"));
        assert!(region.international_phone.is_match("+65 6123 4567"));
        assert!(!region.international_phone.is_match("+60 6123 4567"));
    }

    #[test]
    fn test_keyword_phone_capture() {
        let region = singapore();
        let caps = region.keyword_phone.captures("Tel: +65 6123 4567").unwrap();
        assert_eq!(&caps[1], "+65 6123 4567");
        let caps = region.keyword_phone.captures("WhatsApp 81234567").unwrap();
        assert_eq!(&caps[1], "81234567");
    }

    #[test]
    fn test_postal_code_extraction() {
        let region = singapore();
        assert_eq!(
            region.find_postal_code("1 Raffles Place S123456").as_deref(),
            Some("123456")
        );
        assert_eq!(
            region.find_postal_code("10 Orchard Road, Singapore 238841").as_deref(),
            Some("238841")
        );
        assert_eq!(region.find_postal_code("Call 61234567"), None);
        assert_eq!(
            region.find_postal_code("3 Temasek TowerS038986").as_deref(),
            Some("038986")
        );
        assert_eq!(
            region.find_postal_code("10 Orchard Road Singapore238841").as_deref(),
            Some("238841")
        );
        assert_eq!(region.find_postal_code("ref 1234567"), None);
    }

    #[test]
    fn test_normalize_postal_code() {
        let region = singapore();
        assert_eq!(region.normalize_postal_code("S123456").as_deref(), Some("123456"));
        assert_eq!(region.normalize_postal_code("18956").as_deref(), Some("018956"));
        assert_eq!(region.normalize_postal_code("238841.0").as_deref(), Some("238841"));
        assert_eq!(region.normalize_postal_code(""), None);
        assert_eq!(region.normalize_postal_code("1234567"), None);
    }

    #[test]
    fn test_social_detection() {
        let region = singapore();
        assert!(region.is_social_link("https://www.Facebook.com/abc"));
        assert!(!region.is_social_link("https://abc.sg"));
        assert!(region.mentions_social_platform("https://sg.linkedin.cn/company/abc"));
    }

    #[test]
    fn test_invalid_profile_rejected() {
        let profile = RegionProfile {
            country_code: "+65".to_string(),
            ..RegionProfile::singapore()
        };
        assert!(RegionPatterns::compile(profile).is_err());

        let profile = RegionProfile {
            street_suffixes: vec![],
            ..RegionProfile::singapore()
        };
        assert!(RegionPatterns::compile(profile).is_err());
    }
}
