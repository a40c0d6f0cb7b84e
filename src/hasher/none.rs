//! Constant digest for measuring pipeline overhead.

use super::BlockHasher;

const PATTERN: &[u8; 16] = b"NONENONENONENONE";

/// A hasher that ignores its input and always yields `NONENONENONENONE`.
#[derive(Debug, Clone, Copy)]
pub struct NoneHasher {
    block_size: usize,
}

impl NoneHasher {
    /// Creates a constant hasher for blocks of `block_size` bytes.
    pub const fn new(block_size: usize) -> Self {
        Self { block_size }
    }
}

impl BlockHasher for NoneHasher {
    fn name(&self) -> &'static str {
        "none"
    }

    fn input_size(&self) -> usize {
        self.block_size
    }

    fn output_size(&self) -> usize {
        PATTERN.len()
    }

    fn compute(&self, out: &mut [u8], _input: &[u8]) {
        out.copy_from_slice(PATTERN);
    }
}
