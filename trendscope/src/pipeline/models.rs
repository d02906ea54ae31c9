//! Output records.

use serde::{Deserialize, Serialize};

use crate::classify::CategoryLabel;

/// A cleaned, classified trend ready for serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedTrend {
    /// Cleaned title (at least the minimum length, no boilerplate).
    pub title: String,
    /// Search volume or `N/A`.
    pub volume: String,
    /// Recency or `N/A`.
    pub time_ago: String,
    /// Non-empty label set.
    pub categories: Vec<CategoryLabel>,
    /// Ranking score.
    pub relevance_score: u32,
    /// 1-based rank within its pass.
    pub position: usize,
    /// Strategy that produced the record.
    pub source_tag: String,
}

impl NormalizedTrend {
    /// Whether the trend carries `label`.
    #[must_use]
    pub fn has_label(&self, label: CategoryLabel) -> bool {
        self.categories.contains(&label)
    }
}
