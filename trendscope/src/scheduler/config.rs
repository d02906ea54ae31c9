//! Scheduler configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

use super::delay::{validate_buckets, DelayBucket, DelayRange, HUMAN_LIKE_BUCKETS};
use crate::errors::ConfigError;

/// Environment variable overriding [`SchedulerConfig::max_concurrent_requests`].
pub const MAX_CONCURRENT_ENV: &str = "MAX_CONCURRENT_REQUESTS";

/// Concurrency bound and pacing for page visits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Maximum passes holding a slot at once.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_requests: usize,
    /// Minimum spacing between dispatches.
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
    /// How often a waiting acquirer re-checks for a free slot.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Every n-th request takes a long rest.
    #[serde(default = "default_long_rest_every")]
    pub long_rest_every: u64,
    /// Every n-th request (not already resting long) takes a medium rest.
    #[serde(default = "default_medium_rest_every")]
    pub medium_rest_every: u64,
    /// Long rest duration range.
    #[serde(default = "default_long_rest")]
    pub long_rest: DelayRange,
    /// Medium rest duration range.
    #[serde(default = "default_medium_rest")]
    pub medium_rest: DelayRange,
    /// Weighted buckets for ordinary pauses.
    #[serde(default = "default_human_like")]
    pub human_like: Vec<DelayBucket>,
}

fn default_max_concurrent() -> usize {
    2
}

fn default_min_interval_ms() -> u64 {
    1000
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_long_rest_every() -> u64 {
    10
}

fn default_medium_rest_every() -> u64 {
    5
}

fn default_long_rest() -> DelayRange {
    DelayRange::new(15_000, 30_000)
}

fn default_medium_rest() -> DelayRange {
    DelayRange::new(8_000, 15_000)
}

fn default_human_like() -> Vec<DelayBucket> {
    HUMAN_LIKE_BUCKETS.to_vec()
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: default_max_concurrent(),
            min_interval_ms: default_min_interval_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            long_rest_every: default_long_rest_every(),
            medium_rest_every: default_medium_rest_every(),
            long_rest: default_long_rest(),
            medium_rest: default_medium_rest(),
            human_like: default_human_like(),
        }
    }
}

impl SchedulerConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults plus the `MAX_CONCURRENT_REQUESTS` override.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Applies overrides from the process environment.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides read through `lookup`. Unparsable or zero values
    /// are ignored.
    #[must_use]
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(raw) = lookup(MAX_CONCURRENT_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(value) if value > 0 => self.max_concurrent_requests = value,
                _ => warn!(
                    variable = MAX_CONCURRENT_ENV,
                    value = %raw,
                    "Ignoring invalid concurrency override"
                ),
            }
        }
        self
    }

    /// Sets the concurrency bound.
    #[must_use]
    pub fn with_max_concurrent_requests(mut self, max: usize) -> Self {
        self.max_concurrent_requests = max;
        self
    }

    /// Sets the minimum dispatch spacing.
    #[must_use]
    pub fn with_min_interval_ms(mut self, ms: u64) -> Self {
        self.min_interval_ms = ms;
        self
    }

    /// Sets the slot polling interval.
    #[must_use]
    pub fn with_poll_interval_ms(mut self, ms: u64) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    /// Sets the human-like buckets.
    #[must_use]
    pub fn with_human_like(mut self, buckets: Vec<DelayBucket>) -> Self {
        self.human_like = buckets;
        self
    }

    /// Minimum dispatch spacing as a duration.
    #[must_use]
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    /// Polling interval as a duration.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Rejects settings the scheduler cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent_requests == 0 {
            return Err(ConfigError::Invalid(
                "scheduler.max_concurrent_requests must be at least 1".to_string(),
            ));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "scheduler.poll_interval_ms must be at least 1".to_string(),
            ));
        }
        if self.long_rest_every == 0 || self.medium_rest_every == 0 {
            return Err(ConfigError::Invalid(
                "scheduler rest periods must be at least 1".to_string(),
            ));
        }
        self.long_rest.validate("scheduler.long_rest")?;
        self.medium_rest.validate("scheduler.medium_rest")?;
        validate_buckets(&self.human_like)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = SchedulerConfig::default();
        assert_eq!(config.max_concurrent_requests, 2);
        assert_eq!(config.min_interval(), Duration::from_secs(1));
        assert_eq!(config.poll_interval(), Duration::from_millis(100));
        assert_eq!(config.long_rest, DelayRange::new(15_000, 30_000));
        assert_eq!(config.medium_rest, DelayRange::new(8_000, 15_000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_override() {
        let config = SchedulerConfig::default().with_overrides_from(|key| {
            (key == MAX_CONCURRENT_ENV).then(|| "4".to_string())
        });
        assert_eq!(config.max_concurrent_requests, 4);
    }

    #[test]
    fn test_bad_env_override_ignored() {
        for raw in ["0", "many", "-1", ""] {
            let config = SchedulerConfig::default().with_overrides_from(|_| Some(raw.to_string()));
            assert_eq!(config.max_concurrent_requests, 2, "{raw:?}");
        }
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(SchedulerConfig::default()
            .with_max_concurrent_requests(0)
            .validate()
            .is_err());
        assert!(SchedulerConfig::default()
            .with_poll_interval_ms(0)
            .validate()
            .is_err());

        let mut config = SchedulerConfig::default();
        config.medium_rest = DelayRange::new(9, 1);
        assert!(config.validate().is_err());

        let config = SchedulerConfig::default().with_human_like(vec![DelayBucket::new(0.9, 1, 2)]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json() {
        let config: SchedulerConfig =
            serde_json::from_str(r#"{"max_concurrent_requests": 3, "long_rest": {"min_ms": 1, "max_ms": 2}}"#)
                .unwrap();
        assert_eq!(config.max_concurrent_requests, 3);
        assert_eq!(config.long_rest, DelayRange::new(1, 2));
        assert_eq!(config.human_like.len(), 4);
    }
}
