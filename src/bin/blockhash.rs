//! blockhash command line
//!
//! Hashes every fixed-size block of a file and writes the digests, in block
//! order, to an output file.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use blockhash::{Algorithm, DEFAULT_BLOCK_SIZE, DEFAULT_MEMORY_LIMIT, EngineConfig, FileHasher};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "blockhash", version)]
#[command(about = "Hash a file block by block into a flat digest file")]
struct Args {
    /// File to hash
    input: PathBuf,

    /// Digest file to create
    output: PathBuf,

    /// Block size in bytes
    #[arg(default_value_t = DEFAULT_BLOCK_SIZE)]
    block_size: usize,

    /// Hasher: none, checksum, crc32, md5, sha256, blake3
    #[arg(default_value = "none")]
    hasher: String,

    /// Worker threads, 0 for one per hardware thread
    #[arg(default_value_t = 0)]
    threads: usize,

    /// Memory ceiling in KiB
    #[arg(default_value_t = DEFAULT_MEMORY_LIMIT / 1024)]
    max_memory_kib: usize,
}

fn run(args: Args) -> blockhash::Result<()> {
    let hasher = args.hasher.parse::<Algorithm>()?.build(args.block_size)?;

    let started = Instant::now();
    let mut engine = FileHasher::new(EngineConfig::default());
    engine.open(&args.input, &args.output)?;
    engine.configure_memory_limit(args.max_memory_kib.saturating_mul(1024));
    engine.configure_hasher(Some(hasher))?;
    println!(
        "thread will be used: {}",
        engine.resolve_thread_count(args.threads)?
    );
    engine.run()?;

    println!(
        "Finished in {}ms",
        started.elapsed().as_secs_f64() * 1000.0
    );
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Runtime error: {}", err);
            ExitCode::FAILURE
        }
    }
}
