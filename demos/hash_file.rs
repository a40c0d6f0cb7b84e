//! File hashing example.
//!
//! Run with:
//!     cargo run --example hash_file -- /path/to/file [hasher]

use std::env;
use std::fs;

use blockhash::{Algorithm, EngineConfig, FileHasher};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "Cargo.toml".to_string());
    let algorithm: Algorithm = env::args().nth(2).as_deref().unwrap_or("blake3").parse()?;
    let output = format!("{}.{}", path, algorithm);

    println!("Hashing file: {} ({})\n", path, algorithm);

    // Small blocks so even a short file yields a few digests
    let block_size = 4 * 1024;
    let hasher = algorithm.build(block_size)?;
    let digest_size = hasher.output_size();

    let mut engine = FileHasher::new(EngineConfig::default());
    engine.configure_hasher(Some(hasher))?;
    engine.open(&path, &output)?;
    println!("Threads: {}", engine.resolve_thread_count(0)?);
    let report = engine.run()?;

    let digests = fs::read(&output)?;
    for (i, digest) in digests.chunks(digest_size).enumerate().take(8) {
        let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
        println!("Block {:>6}: offset={:>10}, digest={}", i, i * block_size, hex);
    }

    println!(
        "\nTotal: {} blocks, {} bytes read, {} digest bytes in {:?}",
        report.blocks, report.bytes_read, report.bytes_written, report.elapsed
    );
    println!("Digests written to {}", output);

    Ok(())
}
