//! Sequential reader that turns the input into packs.

use std::io::Read;
use std::sync::Arc;

use bytes::BytesMut;
use tracing::trace;

use crate::block::Pack;
use crate::error::{HashError, Result};
use crate::hasher::BlockHasher;
use crate::queue::PackQueue;
use crate::schedule;

/// Totals reported by the producer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Produced {
    pub(crate) packs: u64,
    pub(crate) blocks: u64,
    pub(crate) bytes_read: u64,
}

/// Reads `input_len` bytes in groups of `group` blocks and queues them.
pub(crate) struct Producer<'a, R> {
    reader: R,
    input_len: u64,
    group: usize,
    hasher: Arc<dyn BlockHasher>,
    queue: &'a PackQueue,
}

impl<'a, R: Read> Producer<'a, R> {
    pub(crate) fn new(
        reader: R,
        input_len: u64,
        group: usize,
        hasher: Arc<dyn BlockHasher>,
        queue: &'a PackQueue,
    ) -> Self {
        Self {
            reader,
            input_len,
            group: group.max(1),
            hasher,
            queue,
        }
    }

    /// Reads the whole input.
    ///
    /// Stops early without error if the run is cancelled; the canceller
    /// owns the error.
    pub(crate) fn run(mut self) -> Result<Produced> {
        let block_size = self.hasher.input_size();
        let output_size = self.hasher.output_size() as u64;
        let block_count = schedule::block_count(self.input_len, block_size);

        let mut produced = Produced::default();
        let mut position = 0u64;

        while produced.blocks < block_count {
            if !self.queue.budget().wait_for_room() {
                break;
            }

            let count = (block_count - produced.blocks).min(self.group as u64) as usize;
            let offset = produced.bytes_read;
            let wanted = ((block_size * count) as u64).min(self.input_len - offset) as usize;

            // Zeroed, so a short final block is padded on the right.
            let mut buf = BytesMut::zeroed(block_size * count);
            self.reader
                .read_exact(&mut buf[..wanted])
                .map_err(|source| HashError::Read { offset, source })?;

            let pack = Pack::new(buf.freeze(), Arc::clone(&self.hasher), position);
            trace!(blocks = count, offset, position, "queued pack");
            self.queue.push(pack);

            produced.packs += 1;
            produced.blocks += count as u64;
            produced.bytes_read += wanted as u64;
            position += count as u64 * output_size;
        }

        Ok(produced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::FoldChecksum;
    use std::io::Cursor;

    fn drain(queue: &PackQueue) -> Vec<Pack> {
        let mut packs = Vec::new();
        while !queue.is_empty() {
            packs.extend(queue.pull());
        }
        packs
    }

    #[test]
    fn test_groups_blocks_into_packs() {
        let data: Vec<u8> = (0..40u8).collect();
        let queue = PackQueue::new(usize::MAX);
        let hasher = Arc::new(FoldChecksum::new(4));

        let produced = Producer::new(Cursor::new(&data), 40, 3, hasher, &queue)
            .run()
            .unwrap();

        assert_eq!(produced.packs, 4);
        assert_eq!(produced.blocks, 10);
        assert_eq!(produced.bytes_read, 40);

        let packs = drain(&queue);
        let sizes: Vec<usize> = packs.iter().map(|p| p.len()).collect();
        assert_eq!(sizes, vec![3, 3, 3, 1]);
        assert_eq!(packs[1].blocks()[0].position, 12);
        assert_eq!(packs[3].block_data(&packs[3].blocks()[0]), &data[36..40]);
    }

    #[test]
    fn test_final_block_zero_padded() {
        let data = vec![0xEEu8; 10];
        let queue = PackQueue::new(usize::MAX);
        let hasher = Arc::new(FoldChecksum::new(4));

        let produced = Producer::new(Cursor::new(&data), 10, 8, hasher, &queue)
            .run()
            .unwrap();
        assert_eq!(produced.blocks, 3);

        let packs = drain(&queue);
        assert_eq!(packs.len(), 1);
        let last = packs[0].blocks()[2];
        assert_eq!(packs[0].block_data(&last), &[0xEEu8, 0xEE, 0, 0]);
        assert_eq!(queue.budget().live(), 12);
    }

    #[test]
    fn test_empty_input() {
        let queue = PackQueue::new(0);
        let hasher = Arc::new(FoldChecksum::new(4));
        let produced = Producer::new(Cursor::new(Vec::new()), 0, 8, hasher, &queue)
            .run()
            .unwrap();
        assert_eq!(produced, Produced::default());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_truncated_input_is_an_error() {
        // Declared 16 bytes, only 6 available: the short read lands in a
        // full block, not in the final one.
        let queue = PackQueue::new(usize::MAX);
        let hasher = Arc::new(FoldChecksum::new(4));
        let err = Producer::new(Cursor::new(vec![1u8; 6]), 16, 8, hasher, &queue)
            .run()
            .unwrap_err();
        assert!(matches!(err, HashError::Read { offset: 0, .. }));
    }

    #[test]
    fn test_cancelled_run_stops_reading() {
        let queue = PackQueue::new(usize::MAX);
        queue.budget().cancel();
        let hasher = Arc::new(FoldChecksum::new(4));
        let produced = Producer::new(Cursor::new(vec![0u8; 64]), 64, 2, hasher, &queue)
            .run()
            .unwrap();
        assert_eq!(produced.packs, 0);
    }
}
