//! First-error cell shared by the producer and the workers.

use parking_lot::Mutex;
use tracing::warn;

use crate::error::HashError;
use crate::queue::MemoryBudget;

/// Holds the first failure of a run and cancels everyone else.
#[derive(Debug, Default)]
pub(crate) struct Fault {
    first: Mutex<Option<HashError>>,
}

impl Fault {
    /// Records `err` if it is the first failure and cancels the run.
    pub(crate) fn record(&self, err: HashError, budget: &MemoryBudget) {
        {
            let mut first = self.first.lock();
            if first.is_none() {
                warn!(error = %err, "aborting run");
                *first = Some(err);
            }
        }
        budget.cancel();
    }

    /// Takes the recorded failure, if any.
    pub(crate) fn take(&self) -> Option<HashError> {
        self.first.lock().take()
    }
}

/// Cancels the run if the owning thread unwinds.
pub(crate) struct CancelOnPanic<'a>(pub(crate) &'a MemoryBudget);

impl Drop for CancelOnPanic<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.0.cancel();
        }
    }
}
