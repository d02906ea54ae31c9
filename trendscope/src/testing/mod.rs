//! Testing utilities for trendscope.
//!
//! This module provides:
//! - Document fixtures shaped like a trending-searches page
//! - A document wrapper that injects accessor failures
//! - A fixture document source and a recording span emitter
//! - A scripted random source for deterministic delays

mod fixtures;
mod mocks;

pub use fixtures::{trending_page, trending_table, TrendRow};
pub use mocks::{FailingDocument, FixtureSource, RecordingEmitter, ScriptedRandom};
