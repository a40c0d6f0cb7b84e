//! Memory-accounted work queue between the producer and the workers.
//!
//! - [`MemoryBudget`] - live-byte ledger and backpressure
//! - [`PackQueue`] - FIFO of packs plus one shutdown message per worker

mod budget;

pub use budget::MemoryBudget;

use crossbeam::channel::{self, Receiver, Sender};

use crate::block::Pack;

/// An item on the queue.
#[derive(Debug)]
pub(crate) enum Message {
    /// Work for one worker.
    Pack(Pack),
    /// Tells exactly one worker to stop.
    Shutdown,
}

/// Unbounded FIFO of packs whose size is bounded by a [`MemoryBudget`].
///
/// The queue holds both channel ends, so it never disconnects while a run
/// is alive; termination is always explicit through [`Message::Shutdown`].
#[derive(Debug)]
pub struct PackQueue {
    tx: Sender<Message>,
    rx: Receiver<Message>,
    budget: MemoryBudget,
}

impl PackQueue {
    /// Creates an empty queue with a memory ceiling of `memory_limit` bytes.
    pub fn new(memory_limit: usize) -> Self {
        let (tx, rx) = channel::unbounded();
        Self {
            tx,
            rx,
            budget: MemoryBudget::new(memory_limit),
        }
    }

    /// Returns the budget accounting for queued and in-process packs.
    pub fn budget(&self) -> &MemoryBudget {
        &self.budget
    }

    /// Queues a pack and charges its bytes.
    pub fn push(&self, pack: Pack) {
        self.budget.charge(pack.byte_len());
        // Both ends live in `self`, so the channel cannot be disconnected.
        let _ = self.tx.send(Message::Pack(pack));
    }

    /// Queues `workers` shutdown messages, one per worker.
    pub fn shutdown(&self, workers: usize) {
        for _ in 0..workers {
            let _ = self.tx.send(Message::Shutdown);
        }
    }

    /// Blocks until the next message. `None` means stop.
    pub fn pull(&self) -> Option<Pack> {
        match self.rx.recv() {
            Ok(Message::Pack(pack)) => Some(pack),
            Ok(Message::Shutdown) | Err(_) => None,
        }
    }

    /// Returns the number of queued messages.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Returns true if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::{BlockHasher, NoneHasher};
    use bytes::Bytes;
    use std::sync::Arc;

    fn pack(blocks: usize, first_position: u64) -> Pack {
        let hasher: Arc<dyn BlockHasher> = Arc::new(NoneHasher::new(4));
        Pack::new(Bytes::from(vec![0u8; blocks * 4]), hasher, first_position)
    }

    #[test]
    fn test_fifo_and_accounting() {
        let queue = PackQueue::new(1024);
        queue.push(pack(2, 0));
        queue.push(pack(3, 32));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.budget().live(), 20);

        let first = queue.pull().unwrap();
        assert_eq!(first.blocks()[0].position, 0);
        // Pulling does not release memory; writing does.
        assert_eq!(queue.budget().live(), 20);

        let second = queue.pull().unwrap();
        assert_eq!(second.blocks()[0].position, 32);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_one_shutdown_per_worker() {
        let queue = PackQueue::new(1024);
        queue.push(pack(1, 0));
        queue.shutdown(3);

        let mut stopped = 0;
        let mut packs = 0;
        std::thread::scope(|s| {
            let queue = &queue;
            let handles: Vec<_> = (0..3)
                .map(|_| {
                    s.spawn(move || {
                        let mut seen = 0;
                        while queue.pull().is_some() {
                            seen += 1;
                        }
                        seen
                    })
                })
                .collect();
            for handle in handles {
                packs += handle.join().unwrap();
                stopped += 1;
            }
        });

        assert_eq!(stopped, 3);
        assert_eq!(packs, 1);
        assert!(queue.is_empty());
    }
}
