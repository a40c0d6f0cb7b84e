//! Error types for blockhash.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while configuring or running a hashing job.
#[derive(Error, Debug)]
pub enum HashError {
    /// Invalid or missing configuration (no hasher, zero sizes, engine not open).
    #[error("invalid config: {message}")]
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },

    /// A hashing algorithm name that no variant answers to.
    #[error("unsupported hasher name: {name}")]
    UnknownAlgorithm {
        /// The name as given by the caller.
        name: String,
    },

    /// The input or output file could not be opened.
    #[error("cannot open {}: {source}", path.display())]
    Open {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Reading the input failed, or ended before the expected length.
    #[error("read failed at input offset {offset}: {source}")]
    Read {
        /// Input byte offset of the failed read.
        offset: u64,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Writing a digest to the output failed.
    #[error("write failed at output position {position}: {source}")]
    Write {
        /// Output byte offset of the failed write.
        position: u64,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Any other I/O error (metadata, flush, sync).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A worker thread panicked mid-run.
    #[error("worker {index} panicked")]
    WorkerPanicked {
        /// Index the worker was spawned with.
        index: usize,
    },
}

impl HashError {
    pub(crate) fn config(message: &'static str) -> Self {
        HashError::InvalidConfig { message }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HashError>;
