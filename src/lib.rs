//! blockhash
//!
//! Parallel fixed-block file hashing for Rust.
//!
//! `blockhash` splits a file into fixed-size blocks, hashes every block on a
//! pool of worker threads and writes each digest to its own offset in an
//! output file. The output is a flat sequence of fixed-size records, one per
//! block, in block order:
//!
//! ```text
//! output length = ceil(input length / block size) * digest size
//! ```
//!
//! The final partial block is zero-padded before hashing. The output does
//! not depend on the number of threads.
//!
//! The engine:
//! - reads the input sequentially, in groups of blocks sized for the cache
//! - bounds the bytes in flight by a configurable memory ceiling
//! - hashes through the [`BlockHasher`] capability, so algorithms plug in
//! - serializes positioned writes into one shared output stream
//!
//! # Example
//!
//! ```no_run
//! use blockhash::{hash_file, Algorithm, EngineConfig, HashError};
//!
//! fn main() -> Result<(), HashError> {
//!     let hasher = "sha256".parse::<Algorithm>()?.build(1024 * 1024)?;
//!     let report = hash_file("disk.img", "disk.sums", hasher, EngineConfig::default())?;
//!     println!("{} blocks in {:?}", report.blocks, report.elapsed);
//!     Ok(())
//! }
//! ```
//!
//! # In memory
//!
//! ```
//! use std::io::Cursor;
//! use blockhash::{Algorithm, EngineConfig, Pipeline};
//!
//! let pipeline = Pipeline::new(Algorithm::Checksum.build(4)?, EngineConfig::default())?;
//! let (out, _) = pipeline.run(&b"0123456789"[..], 10, Cursor::new(Vec::new()), 2)?;
//! assert_eq!(out.into_inner().len(), 3 * 4);
//! # Ok::<(), blockhash::HashError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod block;
mod config;
mod engine;
mod error;
mod hasher;
mod queue;
mod schedule;

pub use block::{Block, Pack};
pub use config::{
    DEFAULT_BLOCK_SIZE, DEFAULT_CACHE_LINE, DEFAULT_GROUP_BYTES, DEFAULT_MEMORY_LIMIT, EngineConfig,
};
pub use engine::{FileHasher, Pipeline, RunReport, SharedOutput, hash_file};
pub use error::{HashError, Result};
pub use hasher::{Algorithm, BlockHasher, FoldChecksum, NoneHasher};
pub use queue::{MemoryBudget, PackQueue};
pub use schedule::{available_threads, block_count, min_optimal_block_count, resolve_thread_count};

#[cfg(feature = "hash-blake3")]
pub use hasher::Blake3Hasher;
#[cfg(feature = "hash-crc32")]
pub use hasher::Crc32Hasher;
#[cfg(feature = "hash-md5")]
pub use hasher::Md5Hasher;
#[cfg(feature = "hash-sha256")]
pub use hasher::Sha256Hasher;
