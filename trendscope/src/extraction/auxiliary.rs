//! Auxiliary field parsing: search volume and recency.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Sentinel stored when an auxiliary field is absent.
pub const NOT_AVAILABLE: &str = "N/A";

static VOLUME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+[KM]?\+?)\s*search(?:es)?\b").expect("volume pattern is valid")
});

static RECENCY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+[hm]\s*ago)").expect("recency pattern is valid"));

/// Volume and recency read from the text surrounding a title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuxiliaryFields {
    /// Search volume such as `50K+`, or `N/A`.
    pub volume: String,
    /// Recency such as `3h ago`, or `N/A`.
    pub time_ago: String,
}

impl Default for AuxiliaryFields {
    fn default() -> Self {
        Self {
            volume: NOT_AVAILABLE.to_string(),
            time_ago: NOT_AVAILABLE.to_string(),
        }
    }
}

impl AuxiliaryFields {
    /// Parses both fields from `text`; each falls back to `N/A` independently.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self {
            volume: parse_volume(text).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            time_ago: parse_time_ago(text).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }
    }
}

/// First `<n>[K|M][+] search(es)` token, without the trailing word.
#[must_use]
pub fn parse_volume(text: &str) -> Option<String> {
    VOLUME
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// First `<n>h ago` / `<n>m ago` token.
#[must_use]
pub fn parse_time_ago(text: &str) -> Option<String> {
    RECENCY
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
