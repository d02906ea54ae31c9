//! Extraction: selector cascade, auxiliary field parsing and title cleanup.
//!
//! This module provides:
//! - The ranked [`SelectorCascade`] and its default strategy table
//! - [`AuxiliaryFields`] parsing for search volume and recency
//! - The [`TextNormalizer`] cleanup pipeline and acceptance rules

mod auxiliary;
mod cascade;
mod normalizer;

pub use auxiliary::{parse_time_ago, parse_volume, AuxiliaryFields, NOT_AVAILABLE};
pub use cascade::{extract, RawCandidate, SelectorCascade, Strategy, DEFAULT_STRATEGIES};
pub use normalizer::{CleanupRule, RejectReason, TextNormalizer, Verdict};
