//! Title cleanup and acceptance.
//!
//! Cleanup is a fixed pipeline of pure string rules. The order matters:
//! boilerplate removal can expose a leading `+`, and word collapsing assumes
//! boilerplate tokens glued to words are already gone.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Boilerplate substrings injected by page chrome, stripped in this order.
static BOILERPLATE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)Search termquery_statsExplore",
        r"(?i)query_statsExplore",
        r"(?i)query_stats",
        r"(?i)Explore$",
        r"(?i)Search term$",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("boilerplate pattern is valid"))
    .collect()
});

static LEADING_PLUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*\+\s*)+").expect("leading plus pattern is valid"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Navigation and UI labels that are never trend titles.
static NAVIGATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(home|search|trends|explore|menu|settings|help|about|google|©|\d+|loading|error|sign in|log in|register|subscribe)$",
    )
    .expect("navigation pattern is valid")
});

/// One step of the cleanup pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CleanupRule {
    /// Remove known UI boilerplate tokens (repeated until stable).
    StripBoilerplate,
    /// Remove leading `+` markers and the whitespace around them.
    StripLeadingPlus,
    /// Drop a word that repeats the previous word, ignoring case.
    CollapseRepeatedWords,
    /// Collapse whitespace runs to one space and trim.
    NormalizeWhitespace,
}

impl CleanupRule {
    /// The rules in the order they must run.
    pub const PIPELINE: [Self; 4] = [
        Self::StripBoilerplate,
        Self::StripLeadingPlus,
        Self::CollapseRepeatedWords,
        Self::NormalizeWhitespace,
    ];

    /// Short rule name for logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::StripBoilerplate => "strip_boilerplate",
            Self::StripLeadingPlus => "strip_leading_plus",
            Self::CollapseRepeatedWords => "collapse_repeated_words",
            Self::NormalizeWhitespace => "normalize_whitespace",
        }
    }

    /// Applies this rule alone.
    #[must_use]
    pub fn apply(self, input: &str) -> String {
        match self {
            Self::StripBoilerplate => strip_boilerplate(input),
            Self::StripLeadingPlus => LEADING_PLUS.replace(input, "").trim().to_string(),
            Self::CollapseRepeatedWords => collapse_repeated_words(input),
            Self::NormalizeWhitespace => WHITESPACE.replace_all(input, " ").trim().to_string(),
        }
    }
}

fn strip_boilerplate(input: &str) -> String {
    let mut current = input.trim().to_string();
    loop {
        let mut next = current.clone();
        for pattern in BOILERPLATE.iter() {
            next = pattern.replace_all(&next, "").trim().to_string();
        }
        if next == current {
            return next;
        }
        current = next;
    }
}

fn collapse_repeated_words(input: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut previous: Option<String> = None;
    for word in input.split_whitespace() {
        let folded = word.to_lowercase();
        if previous.as_deref() != Some(folded.as_str()) {
            kept.push(word);
            previous = Some(folded);
        }
    }
    kept.join(" ")
}

/// Why a title was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// Nothing left after cleanup.
    Empty,
    /// Fewer characters than the configured minimum.
    TooShort,
    /// Already emitted in this pass.
    Duplicate,
    /// A navigation or UI label.
    Navigation,
}

/// Outcome of normalizing one raw title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The cleaned title is a valid, new trend title.
    Accepted(String),
    /// The title was rejected; `cleaned` is what cleanup produced.
    Rejected {
        /// Cleanup output.
        cleaned: String,
        /// Reason for rejection.
        reason: RejectReason,
    },
}

impl Verdict {
    /// Returns the accepted title, if any.
    #[must_use]
    pub fn accepted(&self) -> Option<&str> {
        match self {
            Self::Accepted(title) => Some(title),
            Self::Rejected { .. } => None,
        }
    }
}

/// Cleans raw titles and decides whether they are trend titles.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    min_chars: usize,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(2)
    }
}

impl TextNormalizer {
    /// Creates a normalizer rejecting titles shorter than `min_chars`.
    #[must_use]
    pub const fn new(min_chars: usize) -> Self {
        Self { min_chars }
    }

    /// Runs the cleanup pipeline until the text stops changing.
    ///
    /// Collapsing words can expose a trailing boilerplate token, so a
    /// single pass is not always a fixed point.
    #[must_use]
    pub fn clean(&self, raw: &str) -> String {
        let mut current = raw.to_string();
        loop {
            let next = CleanupRule::PIPELINE
                .iter()
                .fold(current.clone(), |text, rule| rule.apply(&text));
            if next == current {
                return next;
            }
            current = next;
        }
    }

    /// Cleans `raw` and judges it against `seen` without recording it.
    #[must_use]
    pub fn evaluate(&self, raw: &str, seen: &HashSet<String>) -> Verdict {
        let cleaned = self.clean(raw);
        let reason = if cleaned.is_empty() {
            Some(RejectReason::Empty)
        } else if cleaned.chars().count() < self.min_chars {
            Some(RejectReason::TooShort)
        } else if seen.contains(&cleaned) {
            Some(RejectReason::Duplicate)
        } else if NAVIGATION.is_match(&cleaned) {
            Some(RejectReason::Navigation)
        } else {
            None
        };
        match reason {
            Some(reason) => Verdict::Rejected { cleaned, reason },
            None => Verdict::Accepted(cleaned),
        }
    }

    /// Like [`evaluate`](Self::evaluate), recording accepted titles in `seen`.
    pub fn accept(&self, raw: &str, seen: &mut HashSet<String>) -> Verdict {
        let verdict = self.evaluate(raw, seen);
        if let Verdict::Accepted(title) = &verdict {
            seen.insert(title.clone());
        }
        verdict
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_boilerplate_composite_is_emptied() {
        let normalizer = TextNormalizer::default();
        let verdict = normalizer.evaluate("Search termquery_statsExplore", &HashSet::new());
        assert_eq!(
            verdict,
            Verdict::Rejected {
                cleaned: String::new(),
                reason: RejectReason::Empty,
            }
        );
    }

    #[test]
    fn test_boilerplate_individual_tokens() {
        assert_eq!(CleanupRule::StripBoilerplate.apply("Taylor Swiftquery_stats"), "Taylor Swift");
        assert_eq!(CleanupRule::StripBoilerplate.apply("nvidia earnings Explore"), "nvidia earnings");
        assert_eq!(CleanupRule::StripBoilerplate.apply("deno 2 Search term"), "deno 2");
        assert_eq!(CleanupRule::StripBoilerplate.apply("openai Explore Explore"), "openai");
    }

    #[test]
    fn test_leading_plus() {
        assert_eq!(CleanupRule::StripLeadingPlus.apply("  + 12 more"), "12 more");
        assert_eq!(CleanupRule::StripLeadingPlus.apply("+ + vite"), "vite");
        assert_eq!(CleanupRule::StripLeadingPlus.apply("c++"), "c++");
    }

    #[test]
    fn test_collapse_keeps_first_casing() {
        assert_eq!(CleanupRule::CollapseRepeatedWords.apply("Rust rust RUST lang"), "Rust lang");
        assert_eq!(CleanupRule::CollapseRepeatedWords.apply("go go gadget go"), "go gadget go");
    }

    #[test]
    fn test_collapse_is_word_level_only() {
        // Substring doubling without a word boundary is left alone.
        assert_eq!(CleanupRule::CollapseRepeatedWords.apply("cardi bcardi b"), "cardi bcardi b");
        assert_eq!(TextNormalizer::default().clean("cardi bcardi b"), "cardi bcardi b");
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(CleanupRule::NormalizeWhitespace.apply("  svelte \t\n kit  "), "svelte kit");
    }

    #[test]
    fn test_clean_is_idempotent() {
        let normalizer = TextNormalizer::default();
        for raw in [
            "+ Next.js  next.js 15query_statsExplore",
            "  Robert   Irwin ",
            "chatgpt Search term",
            "bun bun bun",
            "Search termquery_statsExplore",
            "Rust Search term term",
            "deno Explore explore",
        ] {
            let once = normalizer.clean(raw);
            assert_eq!(normalizer.clean(&once), once, "input: {raw:?}");
        }
    }

    #[test]
    fn test_clean_strips_boilerplate_exposed_by_collapsing() {
        let normalizer = TextNormalizer::default();
        assert_eq!(normalizer.clean("Rust Search term term"), "Rust");
        assert_eq!(
            normalizer.evaluate("Rust Search term term", &HashSet::new()),
            Verdict::Accepted("Rust".to_string())
        );
    }

    #[test]
    fn test_navigation_labels_rejected() {
        let normalizer = TextNormalizer::default();
        for label in ["Home", "MENU", "Sign in", "2024", "Loading", "subscribe"] {
            let verdict = normalizer.evaluate(label, &HashSet::new());
            assert!(
                matches!(verdict, Verdict::Rejected { reason: RejectReason::Navigation, .. }),
                "{label} should be navigation"
            );
        }
        assert!(normalizer.evaluate("home depot", &HashSet::new()).accepted().is_some());

        // Single-character labels fail the length check first.
        assert!(matches!(
            normalizer.evaluate("©", &HashSet::new()),
            Verdict::Rejected { reason: RejectReason::TooShort, .. }
        ));
    }

    #[test]
    fn test_short_and_duplicate() {
        let normalizer = TextNormalizer::default();
        let mut seen = HashSet::new();
        assert!(matches!(
            normalizer.accept("x", &mut seen),
            Verdict::Rejected { reason: RejectReason::TooShort, .. }
        ));
        assert_eq!(normalizer.accept("kafka", &mut seen), Verdict::Accepted("kafka".to_string()));
        assert!(matches!(
            normalizer.accept(" kafka ", &mut seen),
            Verdict::Rejected { reason: RejectReason::Duplicate, .. }
        ));
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn test_evaluate_does_not_record() {
        let normalizer = TextNormalizer::default();
        let seen = HashSet::new();
        assert!(normalizer.evaluate("astro", &seen).accepted().is_some());
        assert!(normalizer.evaluate("astro", &seen).accepted().is_some());
    }
}
