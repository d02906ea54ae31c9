//! # Trendscope
//!
//! Extraction, normalization and classification of trending-topic records
//! from rendered web pages, with a scheduler that paces page visits.
//!
//! Trendscope provides:
//!
//! - **Selector cascade**: ranked structural strategies over any document
//!   accessor, never relying on class names
//! - **Title normalization**: an ordered chain of cleanup rules plus
//!   acceptance checks
//! - **Classification**: keyword-taxonomy labels and relevance scores
//! - **Aggregation**: first-occurrence dedup across passes, position order
//! - **Scheduling**: bounded concurrency slots, rate limiting and
//!   human-like pauses
//!
//! Acquiring the rendered document (browser control, navigation, retries)
//! stays outside the crate behind [`pipeline::DocumentSource`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use trendscope::prelude::*;
//!
//! let scheduler = ConcurrencySlotManager::new(SchedulerConfig::from_env())?;
//! let pass = ExtractionPass::new(scheduler);
//! let cancel = CancellationToken::new();
//!
//! let result = run_passes(&pass, &sources, &cancel, 25).await?;
//! println!("{}", serde_json::to_string_pretty(&result)?);
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod aggregate;
pub mod cancellation;
pub mod classify;
pub mod config;
pub mod document;
pub mod errors;
pub mod extraction;
pub mod observability;
pub mod pipeline;
pub mod scheduler;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::aggregate::{aggregate, Aggregate, AggregateMetadata, Aggregator, TrendRecord};
    pub use crate::cancellation::CancellationToken;
    pub use crate::classify::{CategoryClassifier, CategoryLabel, Classification, Taxonomy};
    pub use crate::config::{ExtractionConfig, TrendscopeConfig};
    pub use crate::document::{DocumentAccessor, DomTree, SelectorPattern, Step};
    pub use crate::errors::{AccessorError, ConfigError, SchedulerError, TrendscopeError};
    pub use crate::extraction::{extract, RawCandidate, SelectorCascade, TextNormalizer};
    pub use crate::observability::{init_tracing, LogFormat, TracingEmitter};
    pub use crate::pipeline::{
        normalize_and_classify, run_passes, DocumentSource, ExtractionPass, NormalizedTrend,
    };
    pub use crate::scheduler::{
        ConcurrencySlotManager, DelayKind, DelayOutcome, SchedulerConfig, SchedulerStats, SlotToken,
    };

    #[cfg(feature = "html")]
    pub use crate::document::HtmlDocument;
}
