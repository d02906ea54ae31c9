//! Merging trend lists from several extraction passes.
//!
//! Dedup is first-occurrence-wins on the lowercased, trimmed title; the
//! survivors are stably sorted by position and cut to the limit.

mod record;

pub use record::{Aggregatable, TrendRecord};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use crate::scheduler::SchedulerStats;

/// Counts describing one aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateMetadata {
    /// Records seen before dedup.
    pub total_trends: usize,
    /// Records left after dedup.
    pub unique_trends: usize,
    /// Records returned after the limit.
    pub returned_trends: usize,
    /// When the aggregate was built.
    pub generated_at: DateTime<Utc>,
    /// Scheduler counters at that time, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduler: Option<SchedulerStats>,
}

/// Deduplicated, ordered, capped records plus counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregate<T> {
    /// The records.
    pub data: Vec<T>,
    /// Counts.
    pub metadata: AggregateMetadata,
}

impl<T> Aggregate<T> {
    /// Attaches scheduler counters to the metadata.
    #[must_use]
    pub fn with_scheduler_stats(mut self, stats: SchedulerStats) -> Self {
        self.metadata.scheduler = Some(stats);
        self
    }
}

/// Merges passes with a fixed limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aggregator {
    limit: usize,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(25)
    }
}

impl Aggregator {
    /// Creates an aggregator returning at most `limit` records.
    #[must_use]
    pub const fn new(limit: usize) -> Self {
        Self { limit }
    }

    /// The limit.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Merges `passes` in order.
    pub fn aggregate<T, I>(&self, passes: I) -> Aggregate<T>
    where
        T: Aggregatable,
        I: IntoIterator<Item = Vec<T>>,
    {
        let mut total = 0;
        let mut seen = HashSet::new();
        let mut unique = Vec::new();

        for record in passes.into_iter().flatten() {
            total += 1;
            let Some(key) = record.dedup_key() else {
                continue;
            };
            if seen.insert(key) {
                unique.push(record);
            }
        }

        let unique_count = unique.len();
        unique.sort_by_key(|record| record.sort_position());
        unique.truncate(self.limit);

        debug!(
            total,
            unique = unique_count,
            returned = unique.len(),
            limit = self.limit,
            "Aggregated trends"
        );

        Aggregate {
            metadata: AggregateMetadata {
                total_trends: total,
                unique_trends: unique_count,
                returned_trends: unique.len(),
                generated_at: Utc::now(),
                scheduler: None,
            },
            data: unique,
        }
    }
}

/// Merges `passes` and keeps at most `limit` records.
pub fn aggregate<T, I>(passes: I, limit: usize) -> Aggregate<T>
where
    T: Aggregatable,
    I: IntoIterator<Item = Vec<T>>,
{
    Aggregator::new(limit).aggregate(passes)
}
