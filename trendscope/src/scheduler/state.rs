//! Counters shared by every caller of one slot manager.

use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::time::Instant;

/// Request counters, dispatch timestamps and the active-slot count.
///
/// Every method is one read-modify-write; callers hold the manager's lock
/// for the duration of a call.
#[derive(Debug, Clone, Default)]
pub(crate) struct SchedulerState {
    request_count: u64,
    last_dispatch: Option<Instant>,
    last_dispatch_wall: Option<DateTime<Utc>>,
    active: usize,
}

impl SchedulerState {
    pub(crate) const fn request_count(&self) -> u64 {
        self.request_count
    }

    pub(crate) const fn active(&self) -> usize {
        self.active
    }

    pub(crate) const fn last_dispatch_wall(&self) -> Option<DateTime<Utc>> {
        self.last_dispatch_wall
    }

    /// Takes a slot if fewer than `max` are held.
    pub(crate) fn try_acquire(&mut self, max: usize) -> bool {
        if self.active < max {
            self.active += 1;
            true
        } else {
            false
        }
    }

    /// Gives a slot back, never going below zero. Returns the new count.
    pub(crate) fn release(&mut self) -> usize {
        self.active = self.active.saturating_sub(1);
        self.active
    }

    /// Reserves the next dispatch time at least `interval` after the
    /// previous one, counts the request and returns `(dispatch_at, count)`.
    pub(crate) fn reserve_dispatch(&mut self, now: Instant, interval: Duration) -> (Instant, u64) {
        let dispatch_at = match self.last_dispatch {
            Some(last) => (last + interval).max(now),
            None => now,
        };
        let ahead = dispatch_at.saturating_duration_since(now);
        self.last_dispatch = Some(dispatch_at);
        self.last_dispatch_wall =
            Some(Utc::now() + chrono::Duration::from_std(ahead).unwrap_or_else(|_| chrono::Duration::zero()));
        self.request_count += 1;
        (dispatch_at, self.request_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_is_bounded() {
        let mut state = SchedulerState::default();
        assert!(state.try_acquire(2));
        assert!(state.try_acquire(2));
        assert!(!state.try_acquire(2));
        assert_eq!(state.active(), 2);
    }

    #[test]
    fn test_release_floors_at_zero() {
        let mut state = SchedulerState::default();
        assert!(state.try_acquire(1));
        assert_eq!(state.release(), 0);
        assert_eq!(state.release(), 0);
        assert_eq!(state.active(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reserve_spaces_dispatches() {
        let mut state = SchedulerState::default();
        let interval = Duration::from_millis(1000);
        let now = Instant::now();

        let (first, count) = state.reserve_dispatch(now, interval);
        assert_eq!(first, now);
        assert_eq!(count, 1);

        let (second, count) = state.reserve_dispatch(now, interval);
        assert_eq!(second - first, interval);
        assert_eq!(count, 2);

        // Long after the last dispatch there is nothing to wait for.
        let later = now + Duration::from_secs(60);
        let (third, _) = state.reserve_dispatch(later, interval);
        assert_eq!(third, later);
        assert!(state.last_dispatch_wall().is_some());
    }
}
