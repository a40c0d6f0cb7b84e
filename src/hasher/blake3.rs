//! BLAKE3 block digests.

use super::BlockHasher;

const OUT_LEN: usize = blake3::OUT_LEN;

/// A hasher that computes a BLAKE3 hash per block.
#[derive(Debug, Clone, Copy)]
pub struct Blake3Hasher {
    block_size: usize,
}

impl Blake3Hasher {
    /// Creates a new hasher for blocks of `block_size` bytes.
    pub const fn new(block_size: usize) -> Self {
        Self { block_size }
    }
}

impl BlockHasher for Blake3Hasher {
    fn name(&self) -> &'static str {
        "blake3"
    }

    fn input_size(&self) -> usize {
        self.block_size
    }

    fn output_size(&self) -> usize {
        OUT_LEN
    }

    fn compute(&self, out: &mut [u8], input: &[u8]) {
        let mut state = blake3::Hasher::new();
        state.update(input);
        state.finalize_xof().fill(out);
    }
}
