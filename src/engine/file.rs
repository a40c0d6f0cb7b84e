//! File-based façade over [`Pipeline`].

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use super::{Pipeline, RunReport, check_hasher};
use crate::config::EngineConfig;
use crate::error::{HashError, Result};
use crate::hasher::BlockHasher;
use crate::schedule;

#[derive(Debug)]
struct OpenFiles {
    input: File,
    output: File,
    input_len: u64,
    input_path: PathBuf,
    output_path: PathBuf,
}

/// Hashes one file into another.
///
/// The flow is configure, open, resolve threads, run:
///
/// ```no_run
/// use blockhash::{Algorithm, EngineConfig, FileHasher};
///
/// let mut engine = FileHasher::new(EngineConfig::default());
/// engine.configure_hasher(Some(Algorithm::Checksum.build(1024 * 1024)?))?;
/// engine.configure_memory_limit(200 * 1024 * 1024);
/// engine.open("data.bin", "data.sums")?;
/// println!("threads: {}", engine.resolve_thread_count(0)?);
/// let report = engine.run()?;
/// println!("{} blocks", report.blocks);
/// # Ok::<(), blockhash::HashError>(())
/// ```
#[derive(Debug, Default)]
pub struct FileHasher {
    config: EngineConfig,
    hasher: Option<Arc<dyn BlockHasher>>,
    files: Option<OpenFiles>,
    threads: Option<usize>,
}

impl FileHasher {
    /// Creates an engine with no hasher and no open files.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Sets the hasher.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::InvalidConfig`] for `None` or a hasher with a
    /// zero input or output size. No I/O happens here.
    pub fn configure_hasher(&mut self, hasher: Option<Arc<dyn BlockHasher>>) -> Result<()> {
        let hasher = hasher.ok_or_else(|| HashError::config("hasher is missing"))?;
        check_hasher(hasher.as_ref())?;
        self.hasher = Some(hasher);
        self.threads = None;
        Ok(())
    }

    /// Sets the backpressure ceiling in bytes.
    pub fn configure_memory_limit(&mut self, bytes: usize) {
        self.config = self.config.with_memory_limit(bytes);
    }

    /// Opens `input` for reading and creates (or truncates) `output`.
    ///
    /// Files from an earlier `open` are closed first, so on failure nothing
    /// stays open.
    pub fn open(&mut self, input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<()> {
        self.files = None;
        self.threads = None;

        let input_path = input.as_ref().to_path_buf();
        let output_path = output.as_ref().to_path_buf();

        let open_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source| HashError::Open { path, source }
        };

        let input = File::open(&input_path).map_err(open_err(&input_path))?;
        let input_len = input.metadata().map_err(open_err(&input_path))?.len();
        let output = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&output_path)
            .map_err(open_err(&output_path))?;

        self.files = Some(OpenFiles {
            input,
            output,
            input_len,
            input_path,
            output_path,
        });
        self.threads = None;
        Ok(())
    }

    /// Resolves and stores the worker count for the open input.
    ///
    /// `requested == 0` means one worker per hardware thread. The result is
    /// never zero and never more than the number of read groups in the file.
    pub fn resolve_thread_count(&mut self, requested: usize) -> Result<usize> {
        let pipeline = self.pipeline()?;
        let files = self.files.as_ref().ok_or_else(|| HashError::config("no input is open"))?;
        let threads = pipeline.resolve_thread_count(requested, files.input_len);
        info!(requested, threads, input_len = files.input_len, "resolved thread count");
        self.threads = Some(threads);
        Ok(threads)
    }

    /// Runs the job to completion and closes both files.
    ///
    /// Uses the resolved worker count, or resolves the configured one if
    /// [`FileHasher::resolve_thread_count`] was never called.
    pub fn run(&mut self) -> Result<RunReport> {
        let pipeline = self.pipeline()?;
        let threads = match self.threads {
            Some(threads) => threads,
            None => self.resolve_thread_count(self.config.threads())?,
        };
        let files = self.files.take().ok_or_else(|| HashError::config("no input is open"))?;
        self.threads = None;

        info!(
            input = %files.input_path.display(),
            output = %files.output_path.display(),
            threads,
            "hashing file"
        );

        let (output, report) = pipeline.run(files.input, files.input_len, files.output, threads)?;

        let block_count = schedule::block_count(files.input_len, pipeline.hasher().input_size());
        output.set_len(block_count * pipeline.hasher().output_size() as u64)?;
        output.sync_all()?;
        Ok(report)
    }

    /// Returns the configured hasher.
    pub fn hasher(&self) -> Option<&Arc<dyn BlockHasher>> {
        self.hasher.as_ref()
    }

    /// Returns the size of the open input, if any.
    pub fn input_len(&self) -> Option<u64> {
        self.files.as_ref().map(|files| files.input_len)
    }

    /// Returns true while files are open.
    pub fn is_open(&self) -> bool {
        self.files.is_some()
    }

    fn pipeline(&self) -> Result<Pipeline> {
        let hasher = self
            .hasher
            .clone()
            .ok_or_else(|| HashError::config("hasher is missing"))?;
        Pipeline::new(hasher, self.config)
    }
}

/// Hashes `input` into `output` in one call.
pub fn hash_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    hasher: Arc<dyn BlockHasher>,
    config: EngineConfig,
) -> Result<RunReport> {
    let mut engine = FileHasher::new(config);
    engine.configure_hasher(Some(hasher))?;
    engine.open(input, output)?;
    engine.run()
}
