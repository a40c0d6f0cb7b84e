//! CRC-32 block digests.

use super::BlockHasher;

/// CRC-32 (IEEE) of each block, stored big-endian.
#[derive(Debug, Clone, Copy)]
pub struct Crc32Hasher {
    block_size: usize,
}

impl Crc32Hasher {
    /// Creates a CRC-32 hasher for blocks of `block_size` bytes.
    pub const fn new(block_size: usize) -> Self {
        Self { block_size }
    }
}

impl BlockHasher for Crc32Hasher {
    fn name(&self) -> &'static str {
        "crc32"
    }

    fn input_size(&self) -> usize {
        self.block_size
    }

    fn output_size(&self) -> usize {
        4
    }

    fn compute(&self, out: &mut [u8], input: &[u8]) {
        out.copy_from_slice(&crc32fast::hash(input).to_be_bytes());
    }
}
