//! Error types for the trendscope core.
//!
//! "No data found" is never an error here: an empty cascade, an empty pass or
//! an empty aggregate are ordinary results. The types below cover genuine
//! faults, each tagged with the component that produced it so callers can
//! choose between retrying and aborting.

use std::time::Duration;
use thiserror::Error;

/// The main error type for trendscope operations.
#[derive(Debug, Error)]
pub enum TrendscopeError {
    /// The document accessor failed outside of any strategy.
    #[error("{0}")]
    Accessor(#[from] AccessorError),

    /// A cascade strategy could not query the document.
    #[error("Extraction failed in {strategy}: {source}")]
    Extraction {
        /// Tag of the strategy that failed (e.g. `selector_3`).
        strategy: String,
        /// The underlying accessor error.
        #[source]
        source: AccessorError,
    },

    /// A scheduling primitive refused the request.
    #[error("{0}")]
    Scheduler(#[from] SchedulerError),

    /// Configuration could not be loaded or validated.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// The document source (navigation layer) failed to produce a document.
    #[error("Document source error: {0}")]
    Source(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl TrendscopeError {
    /// Names the component that failed.
    #[must_use]
    pub fn component(&self) -> &'static str {
        match self {
            Self::Accessor(_) => "document",
            Self::Extraction { .. } => "cascade",
            Self::Scheduler(_) => "scheduler",
            Self::Config(_) => "config",
            Self::Source(_) => "source",
            Self::Serialization(_) => "serialization",
        }
    }

    /// Whether the error came from a cancelled or timed-out slot wait.
    #[must_use]
    pub fn is_cancellation(&self) -> bool {
        matches!(
            self,
            Self::Scheduler(SchedulerError::Cancelled(_) | SchedulerError::Timeout(_))
        )
    }
}

impl From<serde_json::Error> for TrendscopeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Errors raised by a [`DocumentAccessor`](crate::document::DocumentAccessor).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessorError {
    /// The backend could not compile a selector pattern.
    #[error("Invalid selector pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The pattern as rendered for the backend.
        pattern: String,
        /// Backend-specific reason.
        reason: String,
    },

    /// A node handle does not belong to this document.
    #[error("Unknown node: {0}")]
    UnknownNode(usize),

    /// Any other backend failure.
    #[error("Document backend error: {0}")]
    Backend(String),
}

/// Errors raised by the concurrency slot manager.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchedulerError {
    /// The slot wait was cancelled through a cancellation token.
    #[error("Slot wait cancelled: {0}")]
    Cancelled(String),

    /// The slot wait exceeded its deadline.
    #[error("Slot wait timed out after {0:?}")]
    Timeout(Duration),

    /// `reset()` was called while slot tokens were still held.
    #[error("Cannot reset scheduler with {active} active slot(s)")]
    SlotsOutstanding {
        /// Number of slots still held.
        active: usize,
    },
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A value failed validation.
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// JSON could not be parsed.
    #[error("Configuration parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
