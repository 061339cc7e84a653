//! Multilingual field values.
//!
//! Some stored fields (package names, for instance) hold either plain text or
//! a JSON object mapping language codes to text. They are decoded once into a
//! [`MultilingualText`] and resolved from there. Malformed values never fail:
//! anything that is not a JSON object is treated as plain text.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Category whose slugs carry [`ACTIVATION_SUFFIX`].
pub const ACTIVATION_CATEGORY: &str = "activation-player";

pub const ACTIVATION_SUFFIX: &str = "-activation";

static WHITESPACE_REGEX: OnceLock<Regex> = OnceLock::new();
static NON_SLUG_CHAR_REGEX: OnceLock<Regex> = OnceLock::new();
static HYPHEN_RUN_REGEX: OnceLock<Regex> = OnceLock::new();

/// A decoded multilingual field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultilingualText {
    /// Text stored without a language map; belongs to the fallback language.
    Plain(String),

    /// A JSON object of language code to text. `raw` keeps the stored string,
    /// which is the last resort when neither requested language is present.
    Localized {
        entries: BTreeMap<String, String>,
        raw: String,
    },
}

impl MultilingualText {
    pub fn decode(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::Plain(String::new());
        }

        match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(serde_json::Value::Object(map)) => Self::Localized {
                entries: map
                    .into_iter()
                    .filter_map(|(code, value)| match value {
                        serde_json::Value::String(text) => Some((code, text)),
                        _ => None,
                    })
                    .collect(),
                raw: raw.to_string(),
            },
            _ => Self::Plain(raw.to_string()),
        }
    }

    /// The string this value was decoded from.
    pub fn raw(&self) -> &str {
        match self {
            Self::Plain(text) => text,
            Self::Localized { raw, .. } => raw,
        }
    }

    /// Language map view. Plain text becomes a single entry under
    /// `fallback_language`; an empty field yields an empty map.
    pub fn entries(&self, fallback_language: &str) -> BTreeMap<String, String> {
        match self {
            Self::Plain(text) if text.is_empty() => BTreeMap::new(),
            Self::Plain(text) => BTreeMap::from([(fallback_language.to_string(), text.clone())]),
            Self::Localized { entries, .. } => entries.clone(),
        }
    }

    /// Resolve for `current_language`.
    ///
    /// Order: the current-language entry, the fallback-language entry, the raw
    /// stored string, then "". Empty entries count as missing.
    pub fn localized(&self, current_language: &str, fallback_language: &str) -> &str {
        match self {
            Self::Plain(text) => text,
            Self::Localized { entries, raw } => [current_language, fallback_language]
                .iter()
                .filter_map(|code| entries.get(*code))
                .find(|text| !text.is_empty())
                .map(String::as_str)
                .unwrap_or(raw.as_str()),
        }
    }
}

/// Decode `raw` into a language map.
pub fn parse_multilingual_text(raw: &str, fallback_language: &str) -> BTreeMap<String, String> {
    MultilingualText::decode(raw).entries(fallback_language)
}

/// Resolve a stored multilingual field for display.
pub fn get_localized_text(raw: &str, current_language: &str, fallback_language: &str) -> String {
    MultilingualText::decode(raw)
        .localized(current_language, fallback_language)
        .to_string()
}

/// Build a URL-safe identifier from the English form of a stored name.
pub fn generate_slug(raw: &str, category: &str) -> String {
    let english = get_localized_text(raw, "en", "en").to_lowercase();

    let whitespace = WHITESPACE_REGEX.get_or_init(|| Regex::new(r"\s+").unwrap());
    // ASCII word characters only; everything else is dropped.
    let non_slug = NON_SLUG_CHAR_REGEX.get_or_init(|| Regex::new(r"[^A-Za-z0-9_-]").unwrap());
    let hyphens = HYPHEN_RUN_REGEX.get_or_init(|| Regex::new(r"-+").unwrap());

    let slug = whitespace.replace_all(&english, "-");
    let slug = non_slug.replace_all(&slug, "");
    let slug = hyphens.replace_all(&slug, "-");
    let slug = slug.trim_matches('-');

    if category == ACTIVATION_CATEGORY {
        format!("{}{}", slug, ACTIVATION_SUFFIX)
    } else {
        slug.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ==================== parse_multilingual_text Tests ====================

    #[test]
    fn test_parse_plain_text_uses_fallback_language() {
        let parsed = parse_multilingual_text("not json", "en");
        assert_eq!(parsed, BTreeMap::from([("en".to_string(), "not json".to_string())]));
    }

    #[test]
    fn test_parse_language_map_exactly() {
        let parsed = parse_multilingual_text(r#"{"en":"Movies","fr":"Films"}"#, "en");
        assert_eq!(
            parsed,
            BTreeMap::from([
                ("en".to_string(), "Movies".to_string()),
                ("fr".to_string(), "Films".to_string()),
            ])
        );
    }

    #[test]
    fn test_parse_empty_is_empty_map() {
        assert!(parse_multilingual_text("", "en").is_empty());
    }

    #[test]
    fn test_parse_json_scalars_and_arrays_are_plain_text() {
        assert_eq!(parse_multilingual_text("42", "fr")["fr"], "42");
        assert_eq!(parse_multilingual_text(r#"["a","b"]"#, "en")["en"], r#"["a","b"]"#);
        assert_eq!(parse_multilingual_text(r#""quoted""#, "en")["en"], r#""quoted""#);
    }

    #[test]
    fn test_parse_skips_non_string_values() {
        let parsed = parse_multilingual_text(r#"{"en":"Sports","fr":null,"es":3}"#, "en");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed["en"], "Sports");
    }

    #[test]
    fn test_parse_truncated_json_is_plain_text() {
        let parsed = parse_multilingual_text(r#"{"en":"Mov"#, "en");
        assert_eq!(parsed["en"], r#"{"en":"Mov"#);
    }

    // ==================== get_localized_text Tests ====================

    #[test]
    fn test_localized_prefers_current_language() {
        let raw = r#"{"en":"Movies","fr":"Films"}"#;
        assert_eq!(get_localized_text(raw, "fr", "en"), "Films");
    }

    #[test]
    fn test_localized_falls_back_to_fallback_language() {
        let raw = r#"{"en":"Movies","fr":"Films"}"#;
        assert_eq!(get_localized_text(raw, "de", "en"), "Movies");
    }

    #[test]
    fn test_localized_falls_through_to_raw_string() {
        let raw = r#"{"fr":"Films"}"#;
        assert_eq!(get_localized_text(raw, "en", "en"), raw);
    }

    #[test]
    fn test_localized_empty_entry_counts_as_missing() {
        let raw = r#"{"en":"Movies","fr":""}"#;
        assert_eq!(get_localized_text(raw, "fr", "en"), "Movies");
    }

    #[test]
    fn test_localized_plain_text_under_any_language() {
        assert_eq!(get_localized_text("Séries", "ar", "en"), "Séries");
    }

    #[test]
    fn test_localized_empty_is_empty() {
        assert_eq!(get_localized_text("", "fr", "en"), "");
    }

    #[test]
    fn test_decode_keeps_raw() {
        let raw = r#"{"en":"Kids"}"#;
        assert_eq!(MultilingualText::decode(raw).raw(), raw);
        assert_eq!(MultilingualText::decode("Kids").raw(), "Kids");
    }

    // ==================== generate_slug Tests ====================

    #[test]
    fn test_slug_strips_emoji_and_collapses() {
        assert_eq!(generate_slug("PROMAX 4K IPTV ⚡", "movie"), "promax-4k-iptv");
    }

    #[test]
    fn test_slug_activation_category_suffix() {
        assert_eq!(generate_slug("Player X", "activation-player"), "player-x-activation");
    }

    #[test]
    fn test_slug_uses_english_entry() {
        let raw = r#"{"fr":"Offre Premium","en":"Premium Plan"}"#;
        assert_eq!(generate_slug(raw, "subscription"), "premium-plan");
    }

    #[test]
    fn test_slug_collapses_hyphen_runs_and_trims_edges() {
        assert_eq!(generate_slug("  --Smart -- TV--  ", "device"), "smart-tv");
    }

    #[test]
    fn test_slug_keeps_underscores() {
        assert_eq!(generate_slug("Box_One 12 Months", "x"), "box_one-12-months");
    }

    proptest! {
        #[test]
        fn prop_slug_is_url_safe(name in "\\PC{0,40}") {
            let slug = generate_slug(&name, "movie");
            prop_assert!(slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-'));
            prop_assert!(!slug.starts_with('-'));
            prop_assert!(!slug.ends_with('-'));
            prop_assert!(!slug.contains("--"));
        }

        #[test]
        fn prop_slug_is_deterministic(name in "[a-zA-Z0-9 ]{0,30}", category in "[a-z-]{0,20}") {
            prop_assert_eq!(generate_slug(&name, &category), generate_slug(&name, &category));
        }

        #[test]
        fn prop_localized_never_panics(raw in "\\PC{0,60}", lang in "[a-z]{2}") {
            let _ = get_localized_text(&raw, &lang, "en");
        }
    }
}
