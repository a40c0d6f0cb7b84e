//! MD5 block digests.

use md5::{Digest, Md5};

use super::BlockHasher;

/// MD5 of each block, 16 bytes.
///
/// Not collision resistant; kept for compatibility with existing digest
/// files.
#[derive(Debug, Clone, Copy)]
pub struct Md5Hasher {
    block_size: usize,
}

impl Md5Hasher {
    /// Creates an MD5 hasher for blocks of `block_size` bytes.
    pub const fn new(block_size: usize) -> Self {
        Self { block_size }
    }
}

impl BlockHasher for Md5Hasher {
    fn name(&self) -> &'static str {
        "md5"
    }

    fn input_size(&self) -> usize {
        self.block_size
    }

    fn output_size(&self) -> usize {
        16
    }

    fn compute(&self, out: &mut [u8], input: &[u8]) {
        out.copy_from_slice(&Md5::digest(input));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_values() {
        let mut out = [0u8; 16];

        Md5Hasher::new(3).compute(&mut out, b"abc");
        assert_eq!(
            out,
            [
                0x90, 0x01, 0x50, 0x98, 0x3c, 0xd2, 0x4f, 0xb0, 0xd6, 0x96, 0x3f, 0x7d, 0x28, 0xe1,
                0x7f, 0x72
            ]
        );

        Md5Hasher::new(0).compute(&mut out, b"");
        assert_eq!(
            out,
            [
                0xd4, 0x1d, 0x8c, 0xd9, 0x8f, 0x00, 0xb2, 0x04, 0xe9, 0x80, 0x09, 0x98, 0xec, 0xf8,
                0x42, 0x7e
            ]
        );
    }
}
