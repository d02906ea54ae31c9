//! Topical category labels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A topical label attached to a trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryLabel {
    /// Narrowly-scoped, currently fashionable technology.
    Niche,
    /// Broad technology.
    Tech,
    /// Film, music, celebrities.
    Entertainment,
    /// Sports.
    Sports,
    /// News and politics.
    News,
    /// Health and medicine.
    Health,
    /// Business and finance.
    Business,
    /// Looks like a person's name.
    Person,
    /// Mentions a country or city.
    Location,
    /// Nothing more specific matched.
    General,
}

impl CategoryLabel {
    /// Returns the lowercase wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Niche => "niche",
            Self::Tech => "tech",
            Self::Entertainment => "entertainment",
            Self::Sports => "sports",
            Self::News => "news",
            Self::Health => "health",
            Self::Business => "business",
            Self::Person => "person",
            Self::Location => "location",
            Self::General => "general",
        }
    }
}

impl fmt::Display for CategoryLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_serializes_lowercase() {
        let json = serde_json::to_string(&vec![CategoryLabel::Niche, CategoryLabel::General]).unwrap();
        assert_eq!(json, r#"["niche","general"]"#);
        assert_eq!(CategoryLabel::Entertainment.to_string(), "entertainment");
    }
}
