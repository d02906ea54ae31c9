//! Concurrency gating and polite pacing of page visits.
//!
//! A [`ConcurrencySlotManager`] is an ordinary value: each instance owns its
//! own counters, and clones share them. It bounds how many extraction passes
//! hold a [`SlotToken`] at once and spaces dispatches with a rate limit,
//! periodic rests and weighted human-like pauses.
//!
//! All waits use `tokio::time`, so tests can run them on a paused clock.

mod config;
mod delay;
mod manager;
mod random;
mod slot;
mod state;
mod stats;

pub use config::{SchedulerConfig, MAX_CONCURRENT_ENV};
pub use delay::{validate_buckets, DelayBucket, DelayKind, DelayRange, DelayTable, HUMAN_LIKE_BUCKETS};
pub use manager::ConcurrencySlotManager;
pub use random::{entropy_source, seeded_source, RandomSource};
pub use slot::SlotToken;
pub use stats::{DelayOutcome, SchedulerStats};
