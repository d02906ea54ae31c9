//! Top-level configuration.
//!
//! Every section deserializes with per-field defaults, so a JSON document
//! only needs the values it changes.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::classify::Taxonomy;
use crate::errors::ConfigError;
use crate::scheduler::SchedulerConfig;

/// Limits applied by the selector cascade and the title normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Maximum candidates returned by one pass.
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
    /// Minimum characters in an accepted title.
    #[serde(default = "default_min_title_chars")]
    pub min_title_chars: usize,
}

fn default_max_candidates() -> usize {
    25
}

fn default_min_title_chars() -> usize {
    2
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_candidates: default_max_candidates(),
            min_title_chars: default_min_title_chars(),
        }
    }
}

impl ExtractionConfig {
    /// Sets the candidate cap.
    #[must_use]
    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.max_candidates = max_candidates;
        self
    }

    /// Sets the minimum title length.
    #[must_use]
    pub fn with_min_title_chars(mut self, min_title_chars: usize) -> Self {
        self.min_title_chars = min_title_chars;
        self
    }

    /// Checks the limits.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_title_chars == 0 {
            return Err(ConfigError::Invalid(
                "extraction.min_title_chars must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// All configuration for the core.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendscopeConfig {
    /// Slot and delay settings.
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    /// Cascade and normalizer limits.
    #[serde(default)]
    pub extraction: ExtractionConfig,
    /// Classifier keyword lists.
    #[serde(default)]
    pub taxonomy: Taxonomy,
}

impl TrendscopeConfig {
    /// Defaults plus environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.scheduler = config.scheduler.with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parses JSON, applies environment overrides and validates.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_str(json)?;
        config.scheduler = config.scheduler.with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading configuration");
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scheduler.validate()?;
        self.extraction.validate()
    }

    /// Serializes to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
