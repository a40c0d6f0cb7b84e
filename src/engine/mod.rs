//! The hashing engine: one producer, a pool of workers, one output.
//!
//! - [`Pipeline`] - runs the producer/worker pipeline over any reader and
//!   seekable writer
//! - [`FileHasher`] - file-based façade with the configure/open/run flow
//! - [`RunReport`] - totals of a finished run
//!
//! # Data flow
//!
//! ```text
//! input ──► producer ──► PackQueue ──► worker 0..N ──► SharedOutput ──► output
//!            (reads)     (budgeted)    (hash+write)     (seek+write lock)
//! ```
//!
//! Digests are written out of order, but every block has its own output
//! position, so the final bytes do not depend on scheduling.

mod fault;
mod file;
mod output;
mod producer;
mod worker;

pub use file::{FileHasher, hash_file};
pub use output::SharedOutput;

use std::io::{Read, Seek, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::info;

use crate::config::EngineConfig;
use crate::error::{HashError, Result};
use crate::hasher::BlockHasher;
use crate::queue::PackQueue;
use crate::schedule;

use fault::{CancelOnPanic, Fault};
use producer::Producer;
use worker::Worker;

/// Totals of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Blocks hashed (and digests written).
    pub blocks: u64,
    /// Packs read from the input.
    pub packs: u64,
    /// Input bytes read.
    pub bytes_read: u64,
    /// Digest bytes written.
    pub bytes_written: u64,
    /// Workers used.
    pub threads: usize,
    /// Highest number of bytes in flight at once.
    pub peak_live_bytes: usize,
    /// Seeks issued on the output.
    pub seeks: u64,
    /// Wall-clock time of the run.
    pub elapsed: Duration,
}

/// Sends one shutdown per worker when dropped, including on unwind.
struct Closer<'a> {
    queue: &'a PackQueue,
    workers: usize,
}

impl Drop for Closer<'_> {
    fn drop(&mut self) {
        self.queue.shutdown(self.workers);
    }
}

/// A configured hashing pipeline.
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use blockhash::{Algorithm, EngineConfig, Pipeline};
///
/// let hasher = Algorithm::None.build(1024)?;
/// let pipeline = Pipeline::new(hasher, EngineConfig::default())?;
///
/// let input = vec![7u8; 10 * 1024];
/// let (out, report) = pipeline.run(&input[..], 10 * 1024, Cursor::new(Vec::new()), 2)?;
///
/// assert_eq!(report.blocks, 10);
/// assert_eq!(out.into_inner().len(), 160);
/// # Ok::<(), blockhash::HashError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline {
    hasher: Arc<dyn BlockHasher>,
    config: EngineConfig,
}

impl Pipeline {
    /// Creates a pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::InvalidConfig`] if the hasher reports a zero
    /// input or output size, or if `config` is invalid.
    pub fn new(hasher: Arc<dyn BlockHasher>, config: EngineConfig) -> Result<Self> {
        check_hasher(hasher.as_ref())?;
        config.validate()?;
        Ok(Self { hasher, config })
    }

    /// Returns the hasher.
    pub fn hasher(&self) -> &Arc<dyn BlockHasher> {
        &self.hasher
    }

    /// Returns the configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Blocks read per I/O operation.
    pub fn group_blocks(&self) -> usize {
        schedule::min_optimal_block_count(
            self.hasher.input_size(),
            self.config.cache_line(),
            self.config.group_bytes(),
        )
    }

    /// Resolves a worker count for an input of `input_len` bytes.
    pub fn resolve_thread_count(&self, requested: usize, input_len: u64) -> usize {
        schedule::resolve_thread_count(
            requested,
            input_len,
            self.hasher.input_size(),
            self.group_blocks(),
        )
    }

    /// Hashes `input_len` bytes from `reader` into `writer` using `threads`
    /// workers, and returns the flushed writer.
    ///
    /// Blocks until every digest is written or the first failure; on
    /// failure every worker is stopped and joined before the error returns.
    pub fn run<R, W>(
        &self,
        reader: R,
        input_len: u64,
        writer: W,
        threads: usize,
    ) -> Result<(W, RunReport)>
    where
        R: Read,
        W: Write + Seek + Send,
    {
        let started = Instant::now();
        let threads = threads.max(1);
        let group = self.group_blocks();
        let block_count = schedule::block_count(input_len, self.hasher.input_size());

        info!(
            hasher = self.hasher.name(),
            input_len,
            block_size = self.hasher.input_size(),
            blocks = block_count,
            group,
            threads,
            memory_limit = self.config.memory_limit(),
            "hashing started"
        );

        let queue = PackQueue::new(self.config.memory_limit());
        let output = SharedOutput::new(writer);
        let fault = Fault::default();

        let (produced, worked) = std::thread::scope(|s| {
            let handles: Vec<_> = (0..threads)
                .map(|index| {
                    let queue = &queue;
                    let worker = Worker {
                        index,
                        queue,
                        output: &output,
                        fault: &fault,
                    };
                    s.spawn(move || {
                        let _guard = CancelOnPanic(queue.budget());
                        let span = tracing::debug_span!("worker", index);
                        let _enter = span.enter();
                        worker.run()
                    })
                })
                .collect();

            let produced = {
                let _closer = Closer {
                    queue: &queue,
                    workers: threads,
                };
                let producer = Producer::new(
                    reader,
                    input_len,
                    group,
                    Arc::clone(&self.hasher),
                    &queue,
                );
                producer.run().unwrap_or_else(|err| {
                    fault.record(err, queue.budget());
                    Default::default()
                })
            };

            let worked: Vec<_> = handles
                .into_iter()
                .enumerate()
                .filter_map(|(index, handle)| match handle.join() {
                    Ok(worked) => Some(worked),
                    Err(_) => {
                        fault.record(HashError::WorkerPanicked { index }, queue.budget());
                        None
                    }
                })
                .collect();

            (produced, worked)
        });

        if let Some(err) = fault.take() {
            return Err(err);
        }

        let seeks = output.seeks();
        let writer = output.into_inner()?;

        let report = RunReport {
            blocks: worked.iter().map(|w| w.blocks).sum(),
            packs: produced.packs,
            bytes_read: produced.bytes_read,
            bytes_written: worked.iter().map(|w| w.bytes_written).sum(),
            threads,
            peak_live_bytes: queue.budget().peak(),
            seeks,
            elapsed: started.elapsed(),
        };
        debug_assert_eq!(report.blocks, produced.blocks);

        info!(
            blocks = report.blocks,
            bytes_written = report.bytes_written,
            peak_live_bytes = report.peak_live_bytes,
            elapsed_ms = report.elapsed.as_secs_f64() * 1000.0,
            "hashing finished"
        );
        Ok((writer, report))
    }
}

fn check_hasher(hasher: &dyn BlockHasher) -> Result<()> {
    if hasher.input_size() == 0 {
        return Err(HashError::config("hasher input size must be non-zero"));
    }
    if hasher.output_size() == 0 {
        return Err(HashError::config("hasher output size must be non-zero"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::{Algorithm, FoldChecksum};
    use std::io::{self, Cursor, SeekFrom};

    fn expected_digests(hasher: &dyn BlockHasher, data: &[u8]) -> Vec<u8> {
        let block_size = hasher.input_size();
        let mut out = Vec::new();
        let mut digest = vec![0u8; hasher.output_size()];
        for block in data.chunks(block_size) {
            let mut padded = block.to_vec();
            padded.resize(block_size, 0);
            hasher.compute(&mut digest, &padded);
            out.extend_from_slice(&digest);
        }
        out
    }

    fn small_config() -> EngineConfig {
        EngineConfig::default()
            .with_group_bytes(64)
            .with_cache_line(1)
    }

    #[test]
    fn test_matches_direct_computation() {
        let data: Vec<u8> = (0..1000u32).map(|i| (i * 7 + 13) as u8).collect();
        let hasher: Arc<dyn BlockHasher> = Arc::new(FoldChecksum::new(16));
        let pipeline = Pipeline::new(Arc::clone(&hasher), small_config()).unwrap();

        let (out, report) = pipeline
            .run(&data[..], data.len() as u64, Cursor::new(Vec::new()), 4)
            .unwrap();

        assert_eq!(report.blocks, 63);
        assert_eq!(report.bytes_read, 1000);
        assert_eq!(report.bytes_written, 63 * 4);
        assert_eq!(out.into_inner(), expected_digests(hasher.as_ref(), &data));
    }

    #[test]
    fn test_thread_count_does_not_change_output() {
        let data: Vec<u8> = (0..4099u32).map(|i| (i ^ (i >> 3)) as u8).collect();
        for &algorithm in Algorithm::ALL {
            let hasher = algorithm.build(32).unwrap();
            let pipeline = Pipeline::new(hasher, small_config()).unwrap();

            let (one, _) = pipeline
                .run(&data[..], data.len() as u64, Cursor::new(Vec::new()), 1)
                .unwrap();
            let (many, _) = pipeline
                .run(&data[..], data.len() as u64, Cursor::new(Vec::new()), 8)
                .unwrap();
            assert_eq!(one.into_inner(), many.into_inner(), "{}", algorithm);
        }
    }

    #[test]
    fn test_single_worker_writes_sequentially() {
        let data = vec![1u8; 512];
        let hasher = Algorithm::None.build(8).unwrap();
        let pipeline = Pipeline::new(hasher, small_config()).unwrap();
        let (_, report) = pipeline
            .run(&data[..], 512, Cursor::new(Vec::new()), 1)
            .unwrap();
        assert_eq!(report.seeks, 1);
        assert_eq!(report.packs, 8);
    }

    #[test]
    fn test_memory_ceiling_overshoot_is_one_pack() {
        let data = vec![3u8; 64 * 1024];
        let hasher = Algorithm::Checksum.build(256).unwrap();
        let config = small_config()
            .with_group_bytes(1024)
            .with_memory_limit(2048);
        let pipeline = Pipeline::new(hasher, config).unwrap();
        let pack_bytes = pipeline.group_blocks() * 256;

        let (_, report) = pipeline
            .run(&data[..], data.len() as u64, Cursor::new(Vec::new()), 2)
            .unwrap();
        assert!(report.peak_live_bytes <= 2048 + pack_bytes);
    }

    #[test]
    fn test_empty_input() {
        let hasher = Algorithm::None.build(8).unwrap();
        let pipeline = Pipeline::new(hasher, EngineConfig::default()).unwrap();
        let (out, report) = pipeline
            .run(io::empty(), 0, Cursor::new(Vec::new()), 3)
            .unwrap();
        assert_eq!(report.blocks, 0);
        assert!(out.into_inner().is_empty());
    }

    #[test]
    fn test_zero_threads_means_one() {
        let hasher = Algorithm::None.build(4).unwrap();
        let pipeline = Pipeline::new(hasher, EngineConfig::default()).unwrap();
        let (_, report) = pipeline
            .run(&[0u8; 8][..], 8, Cursor::new(Vec::new()), 0)
            .unwrap();
        assert_eq!(report.threads, 1);
        assert_eq!(report.blocks, 2);
    }

    #[test]
    fn test_rejects_zero_sized_hasher() {
        let hasher: Arc<dyn BlockHasher> = Arc::new(FoldChecksum::new(0));
        let err = Pipeline::new(hasher, EngineConfig::default()).unwrap_err();
        assert!(matches!(err, HashError::InvalidConfig { .. }));
    }

    #[test]
    fn test_read_error_is_reported() {
        let hasher = Algorithm::None.build(4).unwrap();
        let pipeline = Pipeline::new(hasher, small_config()).unwrap();
        // Claims more input than the reader has.
        let err = pipeline
            .run(&[0u8; 10][..], 4096, Cursor::new(Vec::new()), 2)
            .unwrap_err();
        assert!(matches!(err, HashError::Read { .. }));
    }

    /// Fails every write at or past `limit`.
    #[derive(Debug)]
    struct ShortDisk {
        inner: Cursor<Vec<u8>>,
        limit: u64,
    }

    impl Write for ShortDisk {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.inner.position() >= self.limit {
                return Err(io::Error::other("no space left"));
            }
            self.inner.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Seek for ShortDisk {
        fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
            self.inner.seek(pos)
        }
    }

    #[test]
    fn test_write_error_stops_all_workers() {
        let data = vec![9u8; 64 * 1024];
        let hasher = Algorithm::None.build(64).unwrap();
        let config = small_config().with_group_bytes(256).with_memory_limit(1024);
        let pipeline = Pipeline::new(hasher, config).unwrap();
        let disk = ShortDisk {
            inner: Cursor::new(Vec::new()),
            limit: 320,
        };

        let err = pipeline
            .run(&data[..], data.len() as u64, disk, 4)
            .unwrap_err();
        assert!(matches!(err, HashError::Write { .. }));
    }

    #[derive(Debug)]
    struct Exploding;

    impl BlockHasher for Exploding {
        fn name(&self) -> &'static str {
            "exploding"
        }

        fn input_size(&self) -> usize {
            4
        }

        fn output_size(&self) -> usize {
            4
        }

        fn compute(&self, _out: &mut [u8], input: &[u8]) {
            if input[0] == 0xFF {
                panic!("bad block");
            }
        }
    }

    #[test]
    fn test_worker_panic_is_reported() {
        let mut data = vec![0u8; 4096];
        data[2048] = 0xFF;
        let pipeline = Pipeline::new(Arc::new(Exploding), small_config().with_memory_limit(64))
            .unwrap();

        let err = pipeline
            .run(&data[..], data.len() as u64, Cursor::new(Vec::new()), 2)
            .unwrap_err();
        assert!(matches!(err, HashError::WorkerPanicked { .. }));
    }
}
