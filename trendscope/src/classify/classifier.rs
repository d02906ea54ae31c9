//! Keyword-membership classification and relevance scoring.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::trace;

use super::labels::CategoryLabel;
use super::taxonomy::Taxonomy;
use crate::pipeline::NormalizedTrend;

/// Score added when a niche term occurs in the title.
pub const NICHE_BONUS: u32 = 10;
/// Score added when a broad tech keyword occurs in the title (no niche hit).
pub const TECH_BONUS: u32 = 5;
/// Score added when a trending indicator occurs in the title.
pub const TRENDING_BONUS: u32 = 3;

static PERSON_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][a-z]+ [A-Z][a-z]+$").expect("person pattern is valid"));

/// Labels plus relevance score for one title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Non-empty, duplicate-free, in evaluation order.
    pub labels: Vec<CategoryLabel>,
    /// Additive ranking score.
    pub relevance_score: u32,
}

/// Either side contains the other.
fn overlaps(term: &str, keyword: &str) -> bool {
    term.contains(keyword) || keyword.contains(term)
}

fn any_overlap(term: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| overlaps(term, k))
}

fn any_contained(term: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| term.contains(k.as_str()))
}

/// Assigns topical labels and a relevance score from a [`Taxonomy`].
#[derive(Debug, Clone)]
pub struct CategoryClassifier {
    taxonomy: Taxonomy,
}

impl Default for CategoryClassifier {
    fn default() -> Self {
        Self::new(&Taxonomy::default())
    }
}

impl CategoryClassifier {
    /// Creates a classifier; keywords are lowercased up front.
    #[must_use]
    pub fn new(taxonomy: &Taxonomy) -> Self {
        Self {
            taxonomy: taxonomy.normalized(),
        }
    }

    /// Whether the term overlaps a niche term (either direction).
    #[must_use]
    pub fn is_niche(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        !term.is_empty() && any_overlap(&term, &self.taxonomy.niche_terms)
    }

    /// Whether the term overlaps a broad tech keyword (either direction).
    #[must_use]
    pub fn is_tech(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        !term.is_empty()
            && self
                .taxonomy
                .tech_categories
                .iter()
                .any(|group| any_overlap(&term, &group.keywords))
    }

    /// Niche or broad tech.
    #[must_use]
    pub fn is_tech_related(&self, term: &str) -> bool {
        self.is_niche(term) || self.is_tech(term)
    }

    /// Returns the labels for `title`; never empty.
    #[must_use]
    pub fn labels(&self, title: &str) -> Vec<CategoryLabel> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return vec![CategoryLabel::General];
        }
        let term = trimmed.to_lowercase();
        let taxonomy = &self.taxonomy;
        let mut labels = Vec::new();

        if self.is_niche(&term) {
            labels.push(CategoryLabel::Niche);
        } else if self.is_tech(&term) {
            labels.push(CategoryLabel::Tech);
        }

        let groups = [
            (CategoryLabel::Entertainment, &taxonomy.entertainment),
            (CategoryLabel::Sports, &taxonomy.sports),
            (CategoryLabel::News, &taxonomy.news),
            (CategoryLabel::Health, &taxonomy.health),
            (CategoryLabel::Business, &taxonomy.business),
        ];
        for (label, keywords) in groups {
            if any_contained(&term, keywords) {
                labels.push(label);
            }
        }

        if PERSON_NAME.is_match(trimmed) {
            labels.push(CategoryLabel::Person);
        }
        if any_contained(&term, &taxonomy.locations) {
            labels.push(CategoryLabel::Location);
        }

        if labels.is_empty() {
            labels.push(CategoryLabel::General);
        }
        labels
    }

    /// Additive relevance score for `title`.
    #[must_use]
    pub fn relevance_score(&self, title: &str) -> u32 {
        let term = title.trim().to_lowercase();
        if term.is_empty() {
            return 0;
        }
        let taxonomy = &self.taxonomy;
        let mut score = 0;

        if any_contained(&term, &taxonomy.niche_terms) {
            score += NICHE_BONUS;
        } else if taxonomy
            .tech_categories
            .iter()
            .any(|group| any_contained(&term, &group.keywords))
        {
            score += TECH_BONUS;
        }

        if any_contained(&term, &taxonomy.trending_indicators) {
            score += TRENDING_BONUS;
        }
        score
    }

    /// Labels and score together.
    #[must_use]
    pub fn classify(&self, title: &str) -> Classification {
        let classification = Classification {
            labels: self.labels(title),
            relevance_score: self.relevance_score(title),
        };
        trace!(title, ?classification, "Classified title");
        classification
    }

    /// Keeps only niche or tech trends, relabelled.
    #[must_use]
    pub fn filter_tech_trends(&self, trends: &[NormalizedTrend]) -> Vec<NormalizedTrend> {
        trends
            .iter()
            .filter(|trend| self.is_tech_related(&trend.title))
            .map(|trend| NormalizedTrend {
                categories: self.labels(&trend.title),
                ..trend.clone()
            })
            .collect()
    }

    /// Niche or tech trends, rescored, highest score first, at most `limit`.
    #[must_use]
    pub fn top_niche_trends(&self, trends: &[NormalizedTrend], limit: usize) -> Vec<NormalizedTrend> {
        let mut ranked: Vec<NormalizedTrend> = trends
            .iter()
            .filter(|trend| self.is_tech_related(&trend.title))
            .map(|trend| {
                let Classification {
                    labels,
                    relevance_score,
                } = self.classify(&trend.title);
                NormalizedTrend {
                    categories: labels,
                    relevance_score,
                    ..trend.clone()
                }
            })
            .collect();
        ranked.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));
        ranked.truncate(limit);
        ranked
    }

    /// Keywords of a tech category, or the niche list for `"niche"`.
    #[must_use]
    pub fn keyword_suggestions(&self, category: &str) -> &[String] {
        if let Some(group) = self
            .taxonomy
            .tech_categories
            .iter()
            .find(|group| group.name == category)
        {
            return &group.keywords;
        }
        if category == "niche" {
            return &self.taxonomy.niche_terms;
        }
        &[]
    }

    /// Tech category names followed by `niche`.
    #[must_use]
    pub fn all_categories(&self) -> Vec<&str> {
        let mut names = self.taxonomy.tech_category_names();
        names.push("niche");
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::KeywordGroup;
    use pretty_assertions::assert_eq;

    fn trend(title: &str, position: usize) -> NormalizedTrend {
        NormalizedTrend {
            title: title.to_string(),
            volume: "N/A".to_string(),
            time_ago: "N/A".to_string(),
            categories: vec![CategoryLabel::General],
            relevance_score: 0,
            position,
            source_tag: "selector_1".to_string(),
        }
    }

    #[test]
    fn test_rust_is_niche() {
        let classifier = CategoryClassifier::default();
        let result = classifier.classify("rust");
        assert!(result.labels.contains(&CategoryLabel::Niche));
        assert!(!result.labels.contains(&CategoryLabel::Tech));
        assert!(result.relevance_score >= NICHE_BONUS);
    }

    #[test]
    fn test_person_heuristic_suppresses_general() {
        let classifier = CategoryClassifier::default();
        assert_eq!(classifier.labels("Simone Biles"), vec![CategoryLabel::Person]);

        // Keywords match as substrings: "robert" contains "bert".
        let robert = classifier.classify("Robert Irwin");
        assert_eq!(robert.labels, vec![CategoryLabel::Tech, CategoryLabel::Person]);
        assert_eq!(robert.relevance_score, TECH_BONUS);

        // Exact two capitalized words only.
        assert!(!classifier.labels("robert irwin").contains(&CategoryLabel::Person));
        assert!(!classifier.labels("Steve Irwin Jr").contains(&CategoryLabel::Person));
    }

    #[test]
    fn test_general_fallback_and_totality() {
        let classifier = CategoryClassifier::default();
        assert_eq!(classifier.labels("qqq zzz"), vec![CategoryLabel::General]);
        for title in ["", "   ", "x", "©", "🔥🔥", "nba finals 2025 on netflix"] {
            assert!(!classifier.labels(title).is_empty(), "{title:?}");
        }
    }

    #[test]
    fn test_multiple_labels_accumulate() {
        let classifier = CategoryClassifier::default();
        let labels = classifier.labels("nba finals london");
        assert_eq!(labels, vec![CategoryLabel::Sports, CategoryLabel::Location]);

        let labels = classifier.labels("covid vaccine stock market");
        assert!(labels.contains(&CategoryLabel::Health));
        assert!(labels.contains(&CategoryLabel::Business));
    }

    #[test]
    fn test_tech_when_not_niche() {
        let classifier = CategoryClassifier::default();
        let labels = classifier.labels("kubernetes");
        assert_eq!(labels[0], CategoryLabel::Tech);
        assert_eq!(classifier.relevance_score("kubernetes"), TECH_BONUS);
    }

    #[test]
    fn test_symmetric_containment() {
        let classifier = CategoryClassifier::default();
        // The title is a substring of the keyword "hugging face".
        assert!(classifier.is_niche("hugging"));
        // The keyword is a substring of the title.
        assert!(classifier.is_niche("svelte 5 release"));
    }

    #[test]
    fn test_relevance_score_rules() {
        let classifier = CategoryClassifier::default();
        assert_eq!(classifier.relevance_score("deno 2 beta"), NICHE_BONUS + TRENDING_BONUS);
        assert_eq!(classifier.relevance_score("latest chatgpt"), TECH_BONUS + TRENDING_BONUS);
        assert_eq!(classifier.relevance_score("qqq"), 0);
        // Scoring is one-directional: "hugging" is inside a niche term, not the reverse.
        assert_eq!(classifier.relevance_score("hugging"), 0);
    }

    #[test]
    fn test_top_niche_trends_orders_by_score() {
        let classifier = CategoryClassifier::default();
        let trends = vec![
            trend("kafka", 1),
            trend("qqq", 2),
            trend("new svelte", 3),
            trend("terraform", 4),
        ];
        let top = classifier.top_niche_trends(&trends, 2);
        let titles: Vec<&str> = top.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["new svelte", "terraform"]);
        assert_eq!(top[0].relevance_score, NICHE_BONUS + TRENDING_BONUS);
        assert_eq!(top[0].categories[0], CategoryLabel::Niche);
    }

    #[test]
    fn test_filter_tech_trends() {
        let classifier = CategoryClassifier::default();
        let kept = classifier.filter_tech_trends(&[trend("qqq", 1), trend("redis", 2)]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].title, "redis");
        assert_eq!(kept[0].categories, vec![CategoryLabel::Tech]);
    }

    #[test]
    fn test_suggestions_and_categories() {
        let classifier = CategoryClassifier::default();
        assert!(classifier.keyword_suggestions("cloud").contains(&"aws".to_string()));
        assert!(classifier.keyword_suggestions("niche").contains(&"rust".to_string()));
        assert!(classifier.keyword_suggestions("cooking").is_empty());
        assert_eq!(classifier.all_categories().last(), Some(&"niche"));
        assert_eq!(classifier.all_categories().len(), 9);
    }

    #[test]
    fn test_custom_taxonomy() {
        let taxonomy = Taxonomy {
            tech_categories: vec![KeywordGroup::new("lang", &["Zig"])],
            niche_terms: vec![],
            ..Taxonomy::default()
        };
        let classifier = CategoryClassifier::new(&taxonomy);
        assert_eq!(classifier.labels("zig 0.14")[0], CategoryLabel::Tech);
        assert!(!classifier.is_niche("rust"));
    }
}
