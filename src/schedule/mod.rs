//! Scheduling arithmetic: block counts, grouping and thread resolution.
//!
//! None of this affects the bytes written; it only decides how much input is
//! read per I/O operation and how many workers get spawned.

/// Number of blocks needed to cover `file_size` bytes.
///
/// The final block may be partial; it is zero-padded before hashing.
pub fn block_count(file_size: u64, block_size: usize) -> u64 {
    if block_size == 0 {
        return 0;
    }
    file_size.div_ceil(block_size as u64)
}

/// Greatest common divisor. `gcd(0, n) == n`.
fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Minimum number of blocks worth reading together.
///
/// The larger of two terms:
/// - `group_bytes / block_size`, so small blocks are read in large batches
/// - `cache_line / gcd(block_size % cache_line, cache_line)`, the smallest
///   count whose total size is a whole number of cache lines
///
/// Never returns zero.
pub fn min_optimal_block_count(block_size: usize, cache_line: usize, group_bytes: usize) -> usize {
    if block_size == 0 || cache_line == 0 {
        return 1;
    }
    let by_bytes = group_bytes / block_size;
    let by_alignment = cache_line / gcd(block_size % cache_line, cache_line);
    by_bytes.max(by_alignment).max(1)
}

/// Number of hardware threads, at least 1.
pub fn available_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Resolves the worker count for a run.
///
/// `requested == 0` means one worker per hardware thread. The result is
/// capped by the number of whole pack groups in the file, so no worker sits
/// idle for the entire run, and is never below 1.
pub fn resolve_thread_count(
    requested: usize,
    file_size: u64,
    block_size: usize,
    min_optimal_block_count: usize,
) -> usize {
    let wanted = if requested == 0 {
        available_threads()
    } else {
        requested
    };

    if block_size == 0 {
        return 1;
    }
    let groups = file_size / block_size as u64 / min_optimal_block_count.max(1) as u64;
    let groups = usize::try_from(groups).unwrap_or(usize::MAX);

    wanted.min(groups).max(1)
}
