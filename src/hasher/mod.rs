//! Block hashing capability and its concrete variants.
//!
//! The engine only knows [`BlockHasher`]: a fixed input size, a fixed output
//! size and a pure `compute`. Concrete algorithms are picked by name through
//! [`Algorithm`]:
//!
//! - [`NoneHasher`] - constant 16-byte digest, measures pipeline overhead
//! - [`FoldChecksum`] - 4-byte lightweight checksum
//! - [`Crc32Hasher`] - CRC-32 (requires `hash-crc32` feature)
//! - [`Md5Hasher`] - MD5 (requires `hash-md5` feature)
//! - [`Sha256Hasher`] - SHA-256 (requires `hash-sha256` feature)
//! - [`Blake3Hasher`] - BLAKE3 (requires `hash-blake3` feature)
//!
//! # Example
//!
//! ```
//! use blockhash::{Algorithm, BlockHasher};
//!
//! let hasher = "none".parse::<Algorithm>()?.build(4096)?;
//! let mut out = vec![0u8; hasher.output_size()];
//! hasher.compute(&mut out, &vec![0u8; 4096]);
//! assert_eq!(&out, b"NONENONENONENONE");
//! # Ok::<(), blockhash::HashError>(())
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{HashError, Result};

mod checksum;
mod none;

#[cfg(feature = "hash-blake3")]
mod blake3;
#[cfg(feature = "hash-crc32")]
mod crc32;
#[cfg(feature = "hash-md5")]
mod md5;
#[cfg(feature = "hash-sha256")]
mod sha256;

pub use checksum::FoldChecksum;
pub use none::NoneHasher;

#[cfg(feature = "hash-blake3")]
pub use self::blake3::Blake3Hasher;
#[cfg(feature = "hash-crc32")]
pub use self::crc32::Crc32Hasher;
#[cfg(feature = "hash-md5")]
pub use self::md5::Md5Hasher;
#[cfg(feature = "hash-sha256")]
pub use self::sha256::Sha256Hasher;

/// A digest function over fixed-size blocks.
///
/// Implementations are shared between worker threads behind an `Arc`, so
/// `compute` takes `&self` and must not keep mutable state. Everything a
/// hasher needs per call lives on the stack of `compute`.
pub trait BlockHasher: Send + Sync + fmt::Debug {
    /// Short algorithm name, used in logs.
    fn name(&self) -> &'static str;

    /// Number of input bytes consumed per block.
    fn input_size(&self) -> usize;

    /// Number of digest bytes produced per block.
    fn output_size(&self) -> usize;

    /// Computes the digest of `input` into `out`.
    ///
    /// Callers pass `out.len() == output_size()` and
    /// `input.len() == input_size()`. `out` is fully overwritten.
    fn compute(&self, out: &mut [u8], input: &[u8]);
}

/// Closed set of hashing algorithms selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Constant digest, see [`NoneHasher`].
    None,
    /// Folded checksum, see [`FoldChecksum`].
    Checksum,
    /// CRC-32, see [`Crc32Hasher`].
    #[cfg(feature = "hash-crc32")]
    Crc32,
    /// MD5, see [`Md5Hasher`].
    #[cfg(feature = "hash-md5")]
    Md5,
    /// SHA-256, see [`Sha256Hasher`].
    #[cfg(feature = "hash-sha256")]
    Sha256,
    /// BLAKE3, see [`Blake3Hasher`].
    #[cfg(feature = "hash-blake3")]
    Blake3,
}

impl Algorithm {
    /// Every algorithm compiled into this build.
    pub const ALL: &'static [Algorithm] = &[
        Algorithm::None,
        Algorithm::Checksum,
        #[cfg(feature = "hash-crc32")]
        Algorithm::Crc32,
        #[cfg(feature = "hash-md5")]
        Algorithm::Md5,
        #[cfg(feature = "hash-sha256")]
        Algorithm::Sha256,
        #[cfg(feature = "hash-blake3")]
        Algorithm::Blake3,
    ];

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::None => "none",
            Algorithm::Checksum => "checksum",
            #[cfg(feature = "hash-crc32")]
            Algorithm::Crc32 => "crc32",
            #[cfg(feature = "hash-md5")]
            Algorithm::Md5 => "md5",
            #[cfg(feature = "hash-sha256")]
            Algorithm::Sha256 => "sha256",
            #[cfg(feature = "hash-blake3")]
            Algorithm::Blake3 => "blake3",
        }
    }

    /// Instantiates the hasher for blocks of `block_size` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::InvalidConfig`] if `block_size` is zero.
    pub fn build(self, block_size: usize) -> Result<Arc<dyn BlockHasher>> {
        if block_size == 0 {
            return Err(HashError::config("block size must be non-zero"));
        }

        let hasher: Arc<dyn BlockHasher> = match self {
            Algorithm::None => Arc::new(NoneHasher::new(block_size)),
            Algorithm::Checksum => Arc::new(FoldChecksum::new(block_size)),
            #[cfg(feature = "hash-crc32")]
            Algorithm::Crc32 => Arc::new(Crc32Hasher::new(block_size)),
            #[cfg(feature = "hash-md5")]
            Algorithm::Md5 => Arc::new(Md5Hasher::new(block_size)),
            #[cfg(feature = "hash-sha256")]
            Algorithm::Sha256 => Arc::new(Sha256Hasher::new(block_size)),
            #[cfg(feature = "hash-blake3")]
            Algorithm::Blake3 => Arc::new(Blake3Hasher::new(block_size)),
        };
        Ok(hasher)
    }
}

impl FromStr for Algorithm {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Algorithm::None),
            "checksum" | "fold" => Ok(Algorithm::Checksum),
            #[cfg(feature = "hash-crc32")]
            "crc32" => Ok(Algorithm::Crc32),
            #[cfg(feature = "hash-md5")]
            "md5" => Ok(Algorithm::Md5),
            #[cfg(feature = "hash-sha256")]
            "sha256" | "sha-256" => Ok(Algorithm::Sha256),
            #[cfg(feature = "hash-blake3")]
            "blake3" => Ok(Algorithm::Blake3),
            _ => Err(HashError::UnknownAlgorithm { name: s.to_string() }),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
