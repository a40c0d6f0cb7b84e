//! SHA-256 block digests.

use sha2::{Digest, Sha256};

use super::BlockHasher;

/// SHA-256 of each block.
#[derive(Debug, Clone, Copy)]
pub struct Sha256Hasher {
    block_size: usize,
}

impl Sha256Hasher {
    /// Creates a SHA-256 hasher for blocks of `block_size` bytes.
    pub const fn new(block_size: usize) -> Self {
        Self { block_size }
    }
}

impl BlockHasher for Sha256Hasher {
    fn name(&self) -> &'static str {
        "sha256"
    }

    fn input_size(&self) -> usize {
        self.block_size
    }

    fn output_size(&self) -> usize {
        32
    }

    fn compute(&self, out: &mut [u8], input: &[u8]) {
        out.copy_from_slice(&Sha256::digest(input));
    }
}
