//! Delay ranges and the weighted human-like delay table.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::random::RandomSource;
use crate::errors::ConfigError;

const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Inclusive range of milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange {
    /// Lower bound in milliseconds.
    pub min_ms: u64,
    /// Upper bound in milliseconds.
    pub max_ms: u64,
}

impl DelayRange {
    /// Creates a range.
    #[must_use]
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    /// Whether `ms` lies inside the range.
    #[must_use]
    pub const fn contains(&self, ms: u64) -> bool {
        ms >= self.min_ms && ms <= self.max_ms
    }

    pub(crate) fn validate(&self, name: &str) -> Result<(), ConfigError> {
        if self.min_ms > self.max_ms {
            return Err(ConfigError::Invalid(format!(
                "{name}: min_ms {} exceeds max_ms {}",
                self.min_ms, self.max_ms
            )));
        }
        Ok(())
    }
}

impl fmt::Display for DelayRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}ms", self.min_ms, self.max_ms)
    }
}

/// One weighted bucket of the human-like delay distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DelayBucket {
    /// Selection probability.
    pub weight: f64,
    /// Lower bound in milliseconds.
    pub min_ms: u64,
    /// Upper bound in milliseconds.
    pub max_ms: u64,
}

impl DelayBucket {
    /// Creates a bucket.
    #[must_use]
    pub const fn new(weight: f64, min_ms: u64, max_ms: u64) -> Self {
        Self {
            weight,
            min_ms,
            max_ms,
        }
    }

    /// The bucket's range.
    #[must_use]
    pub const fn range(&self) -> DelayRange {
        DelayRange::new(self.min_ms, self.max_ms)
    }
}

/// Quick, normal, slow and rare very slow pauses.
pub const HUMAN_LIKE_BUCKETS: [DelayBucket; 4] = [
    DelayBucket::new(0.30, 1500, 3000),
    DelayBucket::new(0.50, 3000, 6000),
    DelayBucket::new(0.15, 6000, 10000),
    DelayBucket::new(0.05, 10000, 15000),
];

/// Which pause `smart_delay` took after the rate limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelayKind {
    /// A draw from the weighted delay table.
    HumanLike,
    /// The periodic medium rest.
    MediumRest,
    /// The periodic long rest.
    LongRest,
}

impl DelayKind {
    /// Picks the pause for the `request_count`-th request. Long rests take
    /// priority over medium rests.
    #[must_use]
    pub const fn for_request(request_count: u64, long_every: u64, medium_every: u64) -> Self {
        if long_every > 0 && request_count % long_every == 0 {
            Self::LongRest
        } else if medium_every > 0 && request_count % medium_every == 0 {
            Self::MediumRest
        } else {
            Self::HumanLike
        }
    }

    /// Name for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HumanLike => "human_like",
            Self::MediumRest => "medium_rest",
            Self::LongRest => "long_rest",
        }
    }
}

/// Checks bucket ranges and that the weights sum to one.
pub fn validate_buckets(buckets: &[DelayBucket]) -> Result<(), ConfigError> {
    if buckets.is_empty() {
        return Err(ConfigError::Invalid(
            "human_like delay table needs at least one bucket".to_string(),
        ));
    }
    for (index, bucket) in buckets.iter().enumerate() {
        if !bucket.weight.is_finite() || bucket.weight < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "human_like[{index}]: weight {} is not a probability",
                bucket.weight
            )));
        }
        bucket.range().validate(&format!("human_like[{index}]"))?;
    }
    let total: f64 = buckets.iter().map(|b| b.weight).sum();
    if (total - 1.0).abs() > WEIGHT_TOLERANCE {
        return Err(ConfigError::Invalid(format!(
            "human_like weights sum to {total}, expected 1"
        )));
    }
    Ok(())
}

/// Cumulative distribution over delay ranges, walked in listed order.
#[derive(Debug, Clone, PartialEq)]
pub struct DelayTable {
    entries: Vec<(f64, DelayRange)>,
}

impl Default for DelayTable {
    fn default() -> Self {
        Self::build(&HUMAN_LIKE_BUCKETS)
    }
}

impl DelayTable {
    /// Builds a table from weighted buckets.
    pub fn new(buckets: &[DelayBucket]) -> Result<Self, ConfigError> {
        validate_buckets(buckets)?;
        Ok(Self::build(buckets))
    }

    fn build(buckets: &[DelayBucket]) -> Self {
        let mut cumulative = 0.0;
        let entries = buckets
            .iter()
            .map(|bucket| {
                cumulative += bucket.weight;
                (cumulative, bucket.range())
            })
            .collect();
        Self { entries }
    }

    /// `(cumulative probability, range)` pairs.
    #[must_use]
    pub fn entries(&self) -> &[(f64, DelayRange)] {
        &self.entries
    }

    /// The range selected by a uniform draw: the first bucket whose
    /// cumulative weight is at least `unit`. Rounding slack past the final
    /// cumulative weight lands in the last bucket.
    #[must_use]
    pub fn pick(&self, unit: f64) -> DelayRange {
        self.entries
            .iter()
            .find(|(cumulative, _)| unit <= *cumulative)
            .or_else(|| self.entries.last())
            .map_or(DelayRange::new(0, 0), |(_, range)| *range)
    }

    /// Picks a bucket with one draw, then a delay inside it with another.
    pub fn sample(&self, random: &mut dyn RandomSource) -> u64 {
        let range = self.pick(random.unit());
        random.between(range.min_ms, range.max_ms)
    }
}
