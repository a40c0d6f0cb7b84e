//! Folded byte checksum.

use super::BlockHasher;

const WIDTH: usize = 4;

/// A cheap 4-byte checksum.
///
/// Each input byte, offset by its index modulo 256, is XORed into output
/// lane `index % 4`. It detects most single-byte corruption and costs one
/// add and one XOR per byte.
#[derive(Debug, Clone, Copy)]
pub struct FoldChecksum {
    block_size: usize,
}

impl FoldChecksum {
    /// Creates a checksum for blocks of `block_size` bytes.
    pub const fn new(block_size: usize) -> Self {
        Self { block_size }
    }
}

impl BlockHasher for FoldChecksum {
    fn name(&self) -> &'static str {
        "checksum"
    }

    fn input_size(&self) -> usize {
        self.block_size
    }

    fn output_size(&self) -> usize {
        WIDTH
    }

    fn compute(&self, out: &mut [u8], input: &[u8]) {
        let mut lanes = [0u8; WIDTH];
        for (i, &byte) in input.iter().enumerate() {
            lanes[i % WIDTH] ^= byte.wrapping_add((i % 256) as u8);
        }
        out.copy_from_slice(&lanes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_block() {
        // Zero input leaves only the index contribution.
        let hasher = FoldChecksum::new(4);
        let mut out = [0u8; 4];
        hasher.compute(&mut out, &[0, 0, 0, 0]);
        assert_eq!(out, [0, 1, 2, 3]);
    }

    #[test]
    fn test_lanes_fold() {
        let hasher = FoldChecksum::new(8);
        let mut out = [0u8; 4];
        hasher.compute(&mut out, &[1, 0, 0, 0, 1, 0, 0, 0]);
        // lane 0: (1 + 0) ^ (1 + 4) = 1 ^ 5
        assert_eq!(out[0], 1 ^ 5);
        assert_eq!(out[1], 1 ^ 5);
        assert_eq!(out[2], 2 ^ 6);
        assert_eq!(out[3], 3 ^ 7);
    }

    #[test]
    fn test_detects_change() {
        let hasher = FoldChecksum::new(16);
        let a = [7u8; 16];
        let mut b = a;
        b[9] = 8;

        let mut out_a = [0u8; 4];
        let mut out_b = [0u8; 4];
        hasher.compute(&mut out_a, &a);
        hasher.compute(&mut out_b, &b);
        assert_ne!(out_a, out_b);
    }
}
