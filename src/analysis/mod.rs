//! Most-frequent-byte analysis.
//!
//! - **Sequential**: one histogram pass over the buffer
//! - **Parallel**: per-segment histograms folded and merged with rayon
//!
//! Both produce identical results: the lowest byte value with the
//! highest count.

pub mod histogram;
pub mod parallel;
pub mod traits;

pub use histogram::{BYTE_VALUES, ByteHistogram, SequentialAnalyzer};
pub use parallel::ParallelAnalyzer;
pub use traits::Analyzer;

use crate::core::FrequencyResult;

/// Buffer size at which jobs switch to the parallel analyzer (64 MiB).
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64 * 1024 * 1024;

/// Returns the most frequent byte in `bytes` and its count.
///
/// # Examples
///
/// ```
/// use bytefreq::analysis::analyze;
///
/// let result = analyze(&[5, 5, 3, 3]);
/// assert_eq!((result.value, result.count, result.buffer_size), (3, 2, 4));
/// ```
#[must_use]
pub fn analyze(bytes: &[u8]) -> FrequencyResult {
    SequentialAnalyzer::new().analyze(bytes)
}

/// Like [`analyze`], using rayon when `bytes` is at least
/// `min_parallel_size` long.
#[must_use]
pub fn analyze_parallel(bytes: &[u8], min_parallel_size: usize) -> FrequencyResult {
    ParallelAnalyzer::new()
        .min_parallel_size(min_parallel_size)
        .analyze(bytes)
}
