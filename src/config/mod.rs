//! Configuration for a hashing run.
//!
//! - [`EngineConfig`] - memory ceiling, worker count and grouping knobs
//!
//! The block size is not part of the engine configuration: it belongs to the
//! [`BlockHasher`](crate::BlockHasher), which reports it as `input_size()`.
//!
//! # Example
//!
//! ```
//! use blockhash::EngineConfig;
//!
//! let config = EngineConfig::default()
//!     .with_memory_limit(64 * 1024 * 1024)
//!     .with_threads(4);
//!
//! config.validate()?;
//! # Ok::<(), blockhash::HashError>(())
//! ```

use crate::error::{HashError, Result};

/// Default block size used by front ends (1 MiB).
pub const DEFAULT_BLOCK_SIZE: usize = 1024 * 1024;

/// Default ceiling on bytes read but not yet hashed and written (200 MiB).
pub const DEFAULT_MEMORY_LIMIT: usize = 200 * 1024 * 1024;

/// Default cache line size used by the grouping heuristic.
pub const DEFAULT_CACHE_LINE: usize = 256;

/// Default minimum bytes read per I/O operation (64 MiB).
pub const DEFAULT_GROUP_BYTES: usize = 64 * 1024 * 1024;

/// Configuration for the hashing engine.
///
/// - `memory_limit` - backpressure ceiling in bytes. The producer stops
///   reading while more than this many bytes are in flight. Any value is
///   accepted; zero means one pack at a time.
/// - `threads` - requested worker count, 0 for one per hardware thread
/// - `cache_line` - alignment unit for the grouping heuristic
/// - `group_bytes` - target bytes per read for small blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EngineConfig {
    memory_limit: usize,
    threads: usize,
    cache_line: usize,
    group_bytes: usize,
}

impl EngineConfig {
    /// Creates a configuration with the given memory limit and thread count.
    pub fn new(memory_limit: usize, threads: usize) -> Self {
        Self {
            memory_limit,
            threads,
            ..Self::default()
        }
    }

    /// Sets the memory limit in bytes.
    pub fn with_memory_limit(mut self, bytes: usize) -> Self {
        self.memory_limit = bytes;
        self
    }

    /// Sets the requested worker count (0 = auto).
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Sets the cache line size.
    ///
    /// Note: This does not validate the configuration. Use
    /// [`EngineConfig::validate`] to check it.
    pub fn with_cache_line(mut self, bytes: usize) -> Self {
        self.cache_line = bytes;
        self
    }

    /// Sets the minimum bytes per read.
    ///
    /// Note: This does not validate the configuration. Use
    /// [`EngineConfig::validate`] to check it.
    pub fn with_group_bytes(mut self, bytes: usize) -> Self {
        self.group_bytes = bytes;
        self
    }

    /// Returns the memory limit in bytes.
    pub fn memory_limit(&self) -> usize {
        self.memory_limit
    }

    /// Returns the requested worker count.
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Returns the cache line size.
    pub fn cache_line(&self) -> usize {
        self.cache_line
    }

    /// Returns the minimum bytes per read.
    pub fn group_bytes(&self) -> usize {
        self.group_bytes
    }

    /// Validates the current configuration.
    pub fn validate(&self) -> Result<()> {
        if self.cache_line == 0 {
            return Err(HashError::config("cache_line must be non-zero"));
        }
        if self.group_bytes == 0 {
            return Err(HashError::config("group_bytes must be non-zero"));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            memory_limit: DEFAULT_MEMORY_LIMIT,
            threads: 0,
            cache_line: DEFAULT_CACHE_LINE,
            group_bytes: DEFAULT_GROUP_BYTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.memory_limit(), DEFAULT_MEMORY_LIMIT);
        assert_eq!(config.threads(), 0);
        assert_eq!(config.cache_line(), DEFAULT_CACHE_LINE);
        assert_eq!(config.group_bytes(), DEFAULT_GROUP_BYTES);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = EngineConfig::new(1024, 3)
            .with_cache_line(64)
            .with_group_bytes(4096);

        assert_eq!(config.memory_limit(), 1024);
        assert_eq!(config.threads(), 3);
        assert_eq!(config.cache_line(), 64);
        assert_eq!(config.group_bytes(), 4096);
    }

    #[test]
    fn test_zero_memory_limit_is_valid() {
        assert!(EngineConfig::default().with_memory_limit(0).validate().is_ok());
    }

    #[test]
    fn test_invalid_config_zero_cache_line() {
        let result = EngineConfig::default().with_cache_line(0).validate();
        assert!(matches!(result, Err(HashError::InvalidConfig { .. })));
    }

    #[test]
    fn test_invalid_config_zero_group() {
        assert!(EngineConfig::default().with_group_bytes(0).validate().is_err());
    }
}
