//! Live-byte ledger with blocking backpressure.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Condvar, Mutex};

#[derive(Debug, Default)]
struct Ledger {
    live: usize,
    peak: usize,
}

/// Tracks bytes read but not yet hashed and written.
///
/// The producer charges a pack's bytes when it is queued; workers release
/// each block's bytes only after its digest has been written. The producer
/// sleeps on a condition variable while the live count is above the
/// ceiling and is woken as soon as it drops back to or below it.
///
/// The ceiling is soft: a check happens before each read, so the live count
/// can exceed the ceiling by at most one pack.
#[derive(Debug)]
pub struct MemoryBudget {
    ceiling: usize,
    ledger: Mutex<Ledger>,
    drained: Condvar,
    /// Only set while holding `ledger`, so waiters cannot miss it.
    cancelled: AtomicBool,
}

impl MemoryBudget {
    /// Creates a budget that holds the producer above `ceiling` bytes.
    pub fn new(ceiling: usize) -> Self {
        Self {
            ceiling,
            ledger: Mutex::new(Ledger::default()),
            drained: Condvar::new(),
            cancelled: AtomicBool::new(false),
        }
    }

    /// Blocks until the live count is at or below the ceiling.
    ///
    /// Returns `false` if the run was cancelled instead.
    pub fn wait_for_room(&self) -> bool {
        let mut ledger = self.ledger.lock();
        while ledger.live > self.ceiling && !self.is_cancelled() {
            self.drained.wait(&mut ledger);
        }
        !self.is_cancelled()
    }

    /// Adds `bytes` to the live count.
    pub fn charge(&self, bytes: usize) {
        let mut ledger = self.ledger.lock();
        ledger.live += bytes;
        ledger.peak = ledger.peak.max(ledger.live);
    }

    /// Removes `bytes` from the live count, waking the producer if it is
    /// back under the ceiling.
    pub fn release(&self, bytes: usize) {
        let mut ledger = self.ledger.lock();
        ledger.live = ledger.live.saturating_sub(bytes);
        if ledger.live <= self.ceiling {
            self.drained.notify_all();
        }
    }

    /// Cancels the run and wakes every waiter.
    pub fn cancel(&self) {
        let _ledger = self.ledger.lock();
        self.cancelled.store(true, Ordering::SeqCst);
        self.drained.notify_all();
    }

    /// Returns true once [`MemoryBudget::cancel`] has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Returns the bytes currently in flight.
    pub fn live(&self) -> usize {
        self.ledger.lock().live
    }

    /// Returns the highest live count observed.
    pub fn peak(&self) -> usize {
        self.ledger.lock().peak
    }

    /// Returns the configured ceiling.
    pub fn ceiling(&self) -> usize {
        self.ceiling
    }
}
