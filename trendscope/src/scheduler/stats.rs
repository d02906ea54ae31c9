//! Scheduler statistics and delay outcomes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::delay::DelayKind;

/// A snapshot of the scheduler counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerStats {
    /// Requests dispatched since creation or the last reset.
    pub total_requests: u64,
    /// Slots currently held.
    pub active_requests: usize,
    /// Configured concurrency bound.
    pub max_concurrent: usize,
    /// Wall-clock time of the most recent dispatch.
    pub last_request_time: Option<DateTime<Utc>>,
}

/// What [`smart_delay`](super::ConcurrencySlotManager::smart_delay) did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayOutcome {
    /// Request count after this dispatch.
    pub request_count: u64,
    /// The pause taken after the rate limit.
    pub kind: DelayKind,
    /// Length of that pause (excluding the rate-limit wait).
    pub waited: Duration,
}
