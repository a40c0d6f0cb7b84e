//! The Pack type - a batch of blocks read by one I/O operation.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use bytes::Bytes;

use crate::hasher::BlockHasher;

/// A view of one input block.
///
/// Blocks do not own data; they address a range of their pack's buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    /// Start of the block within the pack buffer.
    pub start: usize,

    /// Length of the block in bytes (the hasher's input size).
    pub len: usize,

    /// Destination offset of this block's digest in the output.
    pub position: u64,
}

impl Block {
    /// Returns the range of the block within its pack buffer.
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.len
    }
}

/// A batch of contiguous blocks sharing one owned buffer.
///
/// The pack is the unit of transfer between the producer and the workers.
/// Its buffer lives exactly as long as the pack, so dropping the pack after
/// its last block is written releases the memory.
///
/// # Example
///
/// ```
/// use blockhash::{Algorithm, Pack};
/// use bytes::Bytes;
///
/// let hasher = Algorithm::None.build(4)?;
/// let pack = Pack::new(Bytes::from_static(b"aaaabbbb"), hasher, 32);
///
/// assert_eq!(pack.len(), 2);
/// assert_eq!(pack.blocks()[1].position, 48);
/// assert_eq!(pack.block_data(&pack.blocks()[1]), b"bbbb");
/// # Ok::<(), blockhash::HashError>(())
/// ```
pub struct Pack {
    data: Bytes,
    blocks: Vec<Block>,
    hasher: Arc<dyn BlockHasher>,
}

impl Pack {
    /// Slices `data` into blocks of the hasher's input size.
    ///
    /// `data.len()` must be a multiple of `hasher.input_size()`. The first
    /// block's digest goes to `first_position`; each following block advances
    /// by `hasher.output_size()`.
    pub fn new(data: Bytes, hasher: Arc<dyn BlockHasher>, first_position: u64) -> Self {
        let block_size = hasher.input_size();
        let output_size = hasher.output_size() as u64;
        debug_assert!(block_size > 0 && data.len() % block_size == 0);

        let blocks = (0..data.len() / block_size)
            .map(|j| Block {
                start: j * block_size,
                len: block_size,
                position: first_position + j as u64 * output_size,
            })
            .collect();

        Self {
            data,
            blocks,
            hasher,
        }
    }

    /// Returns the blocks in file order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Returns the input bytes of `block`.
    pub fn block_data(&self, block: &Block) -> &[u8] {
        &self.data[block.range()]
    }

    /// Returns the hasher the blocks are meant for.
    pub fn hasher(&self) -> &Arc<dyn BlockHasher> {
        &self.hasher
    }

    /// Returns the number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns true if the pack holds no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Returns the number of buffer bytes accounted against the memory limit.
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    /// Returns the output range covered by this pack's digests.
    pub fn positions(&self) -> Range<u64> {
        match (self.blocks.first(), self.blocks.last()) {
            (Some(first), Some(last)) => {
                first.position..last.position + self.hasher.output_size() as u64
            }
            _ => 0..0,
        }
    }
}

impl fmt::Debug for Pack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pack")
            .field("blocks", &self.blocks.len())
            .field("bytes", &self.data.len())
            .field("positions", &self.positions())
            .field("hasher", &self.hasher.name())
            .finish()
    }
}
