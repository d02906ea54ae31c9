//! The concurrency slot manager.

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::{sleep, sleep_until, Instant};
use tracing::{debug, info};

use super::config::SchedulerConfig;
use super::delay::{DelayKind, DelayRange, DelayTable};
use super::random::{entropy_source, RandomSource};
use super::slot::SlotToken;
use super::state::SchedulerState;
use super::stats::{DelayOutcome, SchedulerStats};
use crate::cancellation::CancellationToken;
use crate::errors::{ConfigError, SchedulerError};

pub(super) struct Shared {
    config: SchedulerConfig,
    table: DelayTable,
    state: Mutex<SchedulerState>,
    random: Mutex<Box<dyn RandomSource + Send>>,
    released: Notify,
}

impl Shared {
    pub(super) fn release_one(&self) {
        let active = self.state.lock().release();
        debug!(active, max = self.config.max_concurrent_requests, "Released slot");
        self.released.notify_waiters();
    }
}

/// Bounds concurrent page visits and paces dispatches.
///
/// Clones share the same counters; independent instances are independent.
#[derive(Clone)]
pub struct ConcurrencySlotManager {
    shared: Arc<Shared>,
}

impl ConcurrencySlotManager {
    /// Creates a manager with an entropy-seeded random source.
    pub fn new(config: SchedulerConfig) -> Result<Self, ConfigError> {
        Self::with_random(config, entropy_source())
    }

    /// Creates a manager drawing delays from `random`.
    pub fn with_random(
        config: SchedulerConfig,
        random: Box<dyn RandomSource + Send>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let table = DelayTable::new(&config.human_like)?;
        Ok(Self {
            shared: Arc::new(Shared {
                config,
                table,
                state: Mutex::new(SchedulerState::default()),
                random: Mutex::new(random),
                released: Notify::new(),
            }),
        })
    }

    /// The configuration in effect.
    #[must_use]
    pub fn config(&self) -> &SchedulerConfig {
        &self.shared.config
    }

    /// Slots currently held.
    #[must_use]
    pub fn active_requests(&self) -> usize {
        self.shared.state.lock().active()
    }

    /// Takes a slot if one is free, without waiting.
    pub fn try_acquire(&self) -> Option<SlotToken> {
        let max = self.shared.config.max_concurrent_requests;
        let acquired = self.shared.state.lock().try_acquire(max);
        acquired.then(|| {
            debug!(active = self.active_requests(), max, "Acquired slot");
            SlotToken::new(Arc::clone(&self.shared))
        })
    }

    /// Waits for a free slot.
    ///
    /// The wait re-checks when a slot is released, when `cancel` fires, and
    /// at least every poll interval. Waiters are not served in order.
    /// Returns [`SchedulerError::Cancelled`] as soon as `cancel` fires.
    pub async fn acquire_slot(&self, cancel: &CancellationToken) -> Result<SlotToken, SchedulerError> {
        loop {
            if cancel.is_cancelled() {
                let reason = cancel.reason().unwrap_or_else(|| "cancelled".to_string());
                debug!(reason = %reason, "Slot wait cancelled");
                return Err(SchedulerError::Cancelled(reason));
            }

            // Register for release wake-ups before the check so a release
            // in between is not missed.
            let released = self.shared.released.notified();
            tokio::pin!(released);
            released.as_mut().enable();

            if let Some(token) = self.try_acquire() {
                return Ok(token);
            }
            tokio::select! {
                () = &mut released => {}
                () = cancel.cancelled() => {}
                () = sleep(self.shared.config.poll_interval()) => {}
            }
        }
    }

    /// [`acquire_slot`](Self::acquire_slot) bounded by `timeout`.
    pub async fn acquire_slot_with_timeout(&self, timeout: Duration) -> Result<SlotToken, SchedulerError> {
        let cancel = CancellationToken::new();
        tokio::time::timeout(timeout, self.acquire_slot(&cancel))
            .await
            .map_err(|_| SchedulerError::Timeout(timeout))?
    }

    /// Returns a slot.
    pub fn release_slot(&self, token: SlotToken) {
        token.release();
    }

    /// Waits until at least the minimum interval has passed since the
    /// previous dispatch, then counts this request. Returns the new count.
    ///
    /// Concurrent callers each reserve their own dispatch time, so their
    /// completions are spaced by the interval as well.
    pub async fn rate_limit_delay(&self) -> u64 {
        let now = Instant::now();
        let (dispatch_at, request_count) = self
            .shared
            .state
            .lock()
            .reserve_dispatch(now, self.shared.config.min_interval());
        let wait = dispatch_at.saturating_duration_since(now);
        if !wait.is_zero() {
            let delay_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX);
            debug!(request_count, delay_ms, "Rate limit wait");
            sleep_until(dispatch_at).await;
        }
        request_count
    }

    /// Sleeps a uniform duration in `[min_ms, max_ms]`.
    pub async fn random_delay(&self, min_ms: u64, max_ms: u64) -> Duration {
        let (low, high) = if min_ms <= max_ms { (min_ms, max_ms) } else { (max_ms, min_ms) };
        let ms = self.shared.random.lock().between(low, high);
        let delay = Duration::from_millis(ms);
        sleep(delay).await;
        delay
    }

    async fn delay_in(&self, range: DelayRange) -> Duration {
        self.random_delay(range.min_ms, range.max_ms).await
    }

    /// Sleeps a duration drawn from the weighted delay table.
    pub async fn human_like_delay(&self) -> Duration {
        let ms = {
            let mut random = self.shared.random.lock();
            self.shared.table.sample(random.as_mut())
        };
        debug!(delay_ms = ms, "Human-like delay");
        let delay = Duration::from_millis(ms);
        sleep(delay).await;
        delay
    }

    /// Rate limit, then a periodic long or medium rest, or else a
    /// human-like pause.
    pub async fn smart_delay(&self) -> DelayOutcome {
        let request_count = self.rate_limit_delay().await;
        let config = &self.shared.config;
        let kind = DelayKind::for_request(request_count, config.long_rest_every, config.medium_rest_every);
        let waited = match kind {
            DelayKind::LongRest => {
                info!(request_count, range = %config.long_rest, "Taking a long rest");
                self.delay_in(config.long_rest).await
            }
            DelayKind::MediumRest => {
                info!(request_count, range = %config.medium_rest, "Taking a medium rest");
                self.delay_in(config.medium_rest).await
            }
            DelayKind::HumanLike => self.human_like_delay().await,
        };
        DelayOutcome {
            request_count,
            kind,
            waited,
        }
    }

    /// A snapshot of the counters.
    #[must_use]
    pub fn stats(&self) -> SchedulerStats {
        let state = self.shared.state.lock();
        SchedulerStats {
            total_requests: state.request_count(),
            active_requests: state.active(),
            max_concurrent: self.shared.config.max_concurrent_requests,
            last_request_time: state.last_dispatch_wall(),
        }
    }

    /// Zeroes the counters. Refused while any slot is held.
    pub fn reset(&self) -> Result<(), SchedulerError> {
        let mut state = self.shared.state.lock();
        let active = state.active();
        if active > 0 {
            return Err(SchedulerError::SlotsOutstanding { active });
        }
        *state = SchedulerState::default();
        info!("Scheduler statistics reset");
        Ok(())
    }
}

impl fmt::Debug for ConcurrencySlotManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcurrencySlotManager")
            .field("config", &self.shared.config)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}
