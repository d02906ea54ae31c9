//! Scheduled extraction passes.

use futures::future::join_all;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, warn};
use uuid::Uuid;

use super::models::NormalizedTrend;
use super::process::TrendProcessor;
use super::source::DocumentSource;
use crate::aggregate::{aggregate, Aggregate};
use crate::cancellation::CancellationToken;
use crate::config::TrendscopeConfig;
use crate::errors::{ConfigError, SchedulerError, TrendscopeError};
use crate::extraction::SelectorCascade;
use crate::observability::{LoggingTracingEmitter, PassSpanAttributes, TracingEmitter};
use crate::scheduler::ConcurrencySlotManager;

/// Runs one document source through slot gating, pacing, the cascade and
/// classification.
#[derive(Clone)]
pub struct ExtractionPass {
    scheduler: ConcurrencySlotManager,
    cascade: SelectorCascade,
    processor: TrendProcessor,
    emitter: Arc<dyn TracingEmitter>,
}

impl ExtractionPass {
    /// Creates a pass with the default cascade and classifier.
    #[must_use]
    pub fn new(scheduler: ConcurrencySlotManager) -> Self {
        Self {
            scheduler,
            cascade: SelectorCascade::default(),
            processor: TrendProcessor::default(),
            emitter: Arc::new(LoggingTracingEmitter),
        }
    }

    /// Builds the scheduler, cascade and classifier from configuration.
    pub fn from_config(config: &TrendscopeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let scheduler = ConcurrencySlotManager::new(config.scheduler.clone())?;
        Ok(Self::new(scheduler)
            .with_cascade(SelectorCascade::from_config(&config.extraction))
            .with_processor(TrendProcessor::from_config(config)))
    }

    /// Sets the cascade.
    #[must_use]
    pub fn with_cascade(mut self, cascade: SelectorCascade) -> Self {
        self.cascade = cascade;
        self
    }

    /// Sets the processor.
    #[must_use]
    pub fn with_processor(mut self, processor: TrendProcessor) -> Self {
        self.processor = processor;
        self
    }

    /// Sets the span emitter.
    #[must_use]
    pub fn with_emitter(mut self, emitter: Arc<dyn TracingEmitter>) -> Self {
        self.emitter = emitter;
        self
    }

    /// The scheduler shared by every run of this pass.
    #[must_use]
    pub fn scheduler(&self) -> &ConcurrencySlotManager {
        &self.scheduler
    }

    /// Acquires a slot, waits out the pacing delay, loads the document,
    /// extracts and classifies. The slot is released on every path.
    pub async fn run<S>(
        &self,
        source: &S,
        cancel: &CancellationToken,
    ) -> Result<Vec<NormalizedTrend>, TrendscopeError>
    where
        S: DocumentSource + ?Sized,
    {
        let attrs = PassSpanAttributes::new(source.name()).with_pass_id(Uuid::new_v4().to_string());
        self.emitter.pass_started(&attrs);
        let started = Instant::now();

        let (attrs, result) = self.run_inner(source, cancel, attrs).await;
        match &result {
            Ok(trends) => {
                let attrs = attrs.with_trends(trends.len());
                self.emitter.pass_finished(&attrs, started.elapsed());
            }
            Err(e) => self.emitter.pass_failed(&attrs, e),
        }
        result
    }

    async fn run_inner<S>(
        &self,
        source: &S,
        cancel: &CancellationToken,
        attrs: PassSpanAttributes,
    ) -> (PassSpanAttributes, Result<Vec<NormalizedTrend>, TrendscopeError>)
    where
        S: DocumentSource + ?Sized,
    {
        let slot = match self.scheduler.acquire_slot(cancel).await {
            Ok(slot) => slot,
            Err(e) => return (attrs, Err(e.into())),
        };

        let outcome = self.scheduler.smart_delay().await;
        let attrs = attrs.with_delay(outcome.request_count, outcome.kind.as_str());
        if cancel.is_cancelled() {
            let reason = cancel.reason().unwrap_or_else(|| "cancelled".to_string());
            return (attrs, Err(SchedulerError::Cancelled(reason).into()));
        }

        let document = match source.load().await {
            Ok(document) => document,
            Err(e) => return (attrs, Err(e)),
        };
        let candidates = match self.cascade.extract(&document) {
            Ok(candidates) => candidates,
            Err(e) => return (attrs, Err(e)),
        };
        drop(document);
        let attrs = attrs.with_candidates(candidates.len());

        let trends = self.processor.process(&candidates);
        debug!(pass = %attrs.pass_name, candidates = candidates.len(), trends = trends.len(), "Extraction pass processed");
        self.scheduler.release_slot(slot);
        (attrs, Ok(trends))
    }
}

impl std::fmt::Debug for ExtractionPass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractionPass")
            .field("scheduler", &self.scheduler)
            .field("cascade", &self.cascade)
            .finish_non_exhaustive()
    }
}

/// Runs `pass` over every source concurrently and aggregates the results
/// in source order.
///
/// A failing source is logged and contributes no trends. Cancellation or a
/// slot timeout aborts the whole call.
pub async fn run_passes<S>(
    pass: &ExtractionPass,
    sources: &[S],
    cancel: &CancellationToken,
    limit: usize,
) -> Result<Aggregate<NormalizedTrend>, TrendscopeError>
where
    S: DocumentSource,
{
    let results = join_all(sources.iter().map(|source| pass.run(source, cancel))).await;

    let mut lists = Vec::with_capacity(results.len());
    for (source, result) in sources.iter().zip(results) {
        match result {
            Ok(trends) => lists.push(trends),
            Err(e) if e.is_cancellation() => return Err(e),
            Err(e) => {
                warn!(
                    pass = source.name(),
                    component = e.component(),
                    error = %e,
                    "Pass failed; contributing no trends"
                );
                lists.push(Vec::new());
            }
        }
    }

    Ok(aggregate(lists, limit).with_scheduler_stats(pass.scheduler().stats()))
}
