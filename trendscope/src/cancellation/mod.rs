//! Cooperative cancellation for suspended scheduling calls.
//!
//! A [`CancellationToken`] is raced against the slot wait so a
//! caller-imposed deadline or shutdown preempts a pass that is still queued
//! for a concurrency slot.

mod token;

pub use token::CancellationToken;
