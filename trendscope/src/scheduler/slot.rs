//! Slot ownership.

use std::fmt;
use std::sync::Arc;

use super::manager::Shared;

/// Proof that the holder occupies one concurrency slot.
///
/// The slot is returned when the token is passed to
/// [`release_slot`](super::ConcurrencySlotManager::release_slot) or dropped.
#[must_use = "dropping a slot token releases the slot immediately"]
pub struct SlotToken {
    shared: Arc<Shared>,
    held: bool,
}

impl SlotToken {
    pub(super) fn new(shared: Arc<Shared>) -> Self {
        Self { shared, held: true }
    }

    pub(super) fn release(mut self) {
        self.give_back();
    }

    fn give_back(&mut self) {
        if self.held {
            self.held = false;
            self.shared.release_one();
        }
    }
}

impl Drop for SlotToken {
    fn drop(&mut self) {
        self.give_back();
    }
}

impl fmt::Debug for SlotToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotToken").field("held", &self.held).finish()
    }
}
