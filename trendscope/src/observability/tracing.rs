//! Pass attributes and the emitter seam for pass lifecycle events.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::TrendscopeError;

/// Attributes describing one extraction pass, filled in as the pass runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassSpanAttributes {
    /// Pass name (e.g. `realtime`, `daily`).
    pub pass_name: String,
    /// Unique id of this run of the pass.
    pub pass_id: Option<String>,
    /// Request count assigned by the scheduler.
    pub request_count: Option<u64>,
    /// Which pause the scheduler took.
    pub delay_kind: Option<String>,
    /// Raw candidates the cascade produced.
    pub candidates: Option<usize>,
    /// Classified trends the pass returned.
    pub trends: Option<usize>,
}

impl PassSpanAttributes {
    /// Creates attributes for a pass.
    #[must_use]
    pub fn new(pass_name: impl Into<String>) -> Self {
        Self {
            pass_name: pass_name.into(),
            ..Default::default()
        }
    }

    /// Sets the pass id.
    #[must_use]
    pub fn with_pass_id(mut self, id: impl Into<String>) -> Self {
        self.pass_id = Some(id.into());
        self
    }

    /// Records the scheduler outcome.
    #[must_use]
    pub fn with_delay(mut self, request_count: u64, kind: &str) -> Self {
        self.request_count = Some(request_count);
        self.delay_kind = Some(kind.to_string());
        self
    }

    /// Records the candidate count.
    #[must_use]
    pub fn with_candidates(mut self, candidates: usize) -> Self {
        self.candidates = Some(candidates);
        self
    }

    /// Records the number of trends returned.
    #[must_use]
    pub fn with_trends(mut self, trends: usize) -> Self {
        self.trends = Some(trends);
        self
    }
}

/// Receives pass lifecycle events.
pub trait TracingEmitter: Send + Sync {
    /// A pass started; only the name and id are known.
    fn pass_started(&self, attrs: &PassSpanAttributes);

    /// A pass returned trends.
    fn pass_finished(&self, attrs: &PassSpanAttributes, elapsed: Duration);

    /// A pass failed. `attrs` holds whatever was recorded before the failure.
    fn pass_failed(&self, attrs: &PassSpanAttributes, error: &TrendscopeError);
}

/// Emits pass events as structured `tracing` events.
#[derive(Debug, Clone, Default)]
pub struct LoggingTracingEmitter;

impl TracingEmitter for LoggingTracingEmitter {
    fn pass_started(&self, attrs: &PassSpanAttributes) {
        tracing::debug!(
            pass = %attrs.pass_name,
            pass_id = attrs.pass_id.as_deref().unwrap_or_default(),
            "Pass started"
        );
    }

    fn pass_finished(&self, attrs: &PassSpanAttributes, elapsed: Duration) {
        tracing::info!(
            pass = %attrs.pass_name,
            pass_id = attrs.pass_id.as_deref().unwrap_or_default(),
            request_count = attrs.request_count,
            delay_kind = attrs.delay_kind.as_deref(),
            candidates = attrs.candidates,
            trends = attrs.trends,
            elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            "Pass finished"
        );
    }

    fn pass_failed(&self, attrs: &PassSpanAttributes, error: &TrendscopeError) {
        tracing::error!(
            pass = %attrs.pass_name,
            pass_id = attrs.pass_id.as_deref().unwrap_or_default(),
            request_count = attrs.request_count,
            component = error.component(),
            error = %error,
            "Pass failed"
        );
    }
}
