//! Extraction passes from document to classified trends.
//!
//! This module provides:
//! - The [`NormalizedTrend`] output record
//! - Candidate normalization and classification
//! - The [`DocumentSource`] seam to the navigation layer
//! - Scheduled [`ExtractionPass`] runs and multi-pass aggregation

mod integration_tests;
mod models;
mod pass;
mod process;
mod source;

pub use models::NormalizedTrend;
pub use pass::{run_passes, ExtractionPass};
pub use process::{normalize_and_classify, TrendProcessor};
pub use source::DocumentSource;

#[cfg(feature = "html")]
pub use source::StaticMarkupSource;
