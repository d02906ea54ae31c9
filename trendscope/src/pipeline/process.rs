//! Candidate normalization and classification.

use std::collections::HashSet;
use tracing::trace;

use super::models::NormalizedTrend;
use crate::classify::{CategoryClassifier, Classification};
use crate::config::TrendscopeConfig;
use crate::extraction::{RawCandidate, TextNormalizer, Verdict};

/// Turns raw candidates into classified trends.
#[derive(Debug, Clone, Default)]
pub struct TrendProcessor {
    normalizer: TextNormalizer,
    classifier: CategoryClassifier,
}

impl TrendProcessor {
    /// Creates a processor from its parts.
    #[must_use]
    pub fn new(normalizer: TextNormalizer, classifier: CategoryClassifier) -> Self {
        Self {
            normalizer,
            classifier,
        }
    }

    /// Creates a processor from configuration.
    #[must_use]
    pub fn from_config(config: &TrendscopeConfig) -> Self {
        Self::new(
            TextNormalizer::new(config.extraction.min_title_chars),
            CategoryClassifier::new(&config.taxonomy),
        )
    }

    /// Re-checks every candidate title, then classifies the survivors.
    ///
    /// Cleanup is idempotent, so titles from the cascade pass through
    /// unchanged; the check matters for candidates built elsewhere.
    /// Positions are assigned 1, 2, ... in emission order.
    #[must_use]
    pub fn process(&self, candidates: &[RawCandidate]) -> Vec<NormalizedTrend> {
        let mut seen = HashSet::new();
        candidates
            .iter()
            .filter_map(|candidate| match self.normalizer.accept(&candidate.title, &mut seen) {
                Verdict::Accepted(title) => Some((candidate, title)),
                Verdict::Rejected { reason, .. } => {
                    trace!(title = %candidate.title, ?reason, "Dropping candidate");
                    None
                }
            })
            .enumerate()
            .map(|(index, (candidate, title))| {
                let Classification {
                    labels,
                    relevance_score,
                } = self.classifier.classify(&title);
                NormalizedTrend {
                    title,
                    volume: candidate.volume.clone(),
                    time_ago: candidate.time_ago.clone(),
                    categories: labels,
                    relevance_score,
                    position: index + 1,
                    source_tag: candidate.source_tag.clone(),
                }
            })
            .collect()
    }
}

/// Normalizes and classifies with the default taxonomy and limits.
#[must_use]
pub fn normalize_and_classify(candidates: &[RawCandidate]) -> Vec<NormalizedTrend> {
    TrendProcessor::default().process(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::CategoryLabel;
    use pretty_assertions::assert_eq;

    fn candidate(title: &str, index: usize) -> RawCandidate {
        RawCandidate {
            title: title.to_string(),
            volume: "1K+".to_string(),
            time_ago: "2h ago".to_string(),
            source_tag: "selector_1".to_string(),
            position_hint: index,
        }
    }

    #[test]
    fn test_positions_follow_emission_order() {
        let trends = normalize_and_classify(&[
            candidate("rust 2024", 0),
            candidate("Home", 1),
            candidate("Robert Irwin", 2),
        ]);

        assert_eq!(trends.len(), 2);
        assert_eq!(trends[0].title, "rust 2024");
        assert_eq!(trends[0].position, 1);
        assert!(trends[0].has_label(CategoryLabel::Niche));
        assert_eq!(trends[0].relevance_score, 13);
        assert_eq!(trends[0].volume, "1K+");

        assert_eq!(trends[1].title, "Robert Irwin");
        assert_eq!(trends[1].position, 2);
        assert!(trends[1].has_label(CategoryLabel::Person));
    }

    #[test]
    fn test_dirty_candidates_are_cleaned_and_deduplicated() {
        let trends = normalize_and_classify(&[
            candidate("+ svelte svelte 5query_stats", 0),
            candidate("svelte 5", 1),
            candidate("Search termquery_statsExplore", 2),
        ]);
        let titles: Vec<&str> = trends.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["svelte 5"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(normalize_and_classify(&[]).is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let trends = normalize_and_classify(&[candidate("kafka", 0)]);
        let json = serde_json::to_value(&trends[0]).unwrap();
        assert_eq!(json["timeAgo"], "2h ago");
        assert_eq!(json["relevanceScore"], 5);
        assert_eq!(json["categories"][0], "tech");
        assert_eq!(json["position"], 1);
    }
}
