//! Worker loop: hash blocks and write digests in place.

use std::io::{Seek, Write};
use std::time::Instant;

use tracing::debug;

use super::fault::Fault;
use super::output::SharedOutput;
use crate::queue::PackQueue;

/// Totals reported by one worker.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Worked {
    pub(crate) packs: u64,
    pub(crate) blocks: u64,
    pub(crate) bytes_written: u64,
}

pub(crate) struct Worker<'a, W> {
    pub(crate) index: usize,
    pub(crate) queue: &'a PackQueue,
    pub(crate) output: &'a SharedOutput<W>,
    pub(crate) fault: &'a Fault,
}

impl<W: Write + Seek> Worker<'_, W> {
    /// Processes packs until a shutdown message or a cancelled run.
    pub(crate) fn run(self) -> Worked {
        let budget = self.queue.budget();
        let mut worked = Worked::default();
        let mut digest = Vec::new();

        while let Some(pack) = self.queue.pull() {
            if budget.is_cancelled() {
                break;
            }
            let started = Instant::now();
            let hasher = pack.hasher();

            for block in pack.blocks() {
                let output_size = hasher.output_size();
                if digest.len() != output_size {
                    digest.resize(output_size, 0);
                }

                hasher.compute(&mut digest, pack.block_data(block));
                if let Err(err) = self.output.write_at(block.position, &digest) {
                    self.fault.record(err, budget);
                    return worked;
                }
                budget.release(block.len);

                worked.blocks += 1;
                worked.bytes_written += output_size as u64;

                if budget.is_cancelled() {
                    return worked;
                }
            }

            worked.packs += 1;
            debug!(
                worker = self.index,
                positions = ?pack.positions(),
                elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
                queued = self.queue.len(),
                "pack processed"
            );
        }

        worked
    }
}
