//! Parallel histogram analyzer.
//!
//! Splits the buffer into fixed-size segments, builds one histogram per
//! rayon worker and merges them. The merged histogram is identical to the
//! sequential one, so results never differ between the two paths.

use crate::analysis::histogram::ByteHistogram;
use crate::analysis::traits::Analyzer;
use crate::core::FrequencyResult;
use rayon::prelude::*;

/// Default segment size handed to each rayon task (1 MiB).
pub const DEFAULT_SEGMENT_SIZE: usize = 1024 * 1024;

/// Parallel analyzer backed by rayon.
///
/// # Examples
///
/// ```
/// use bytefreq::analysis::{Analyzer, ParallelAnalyzer};
///
/// let analyzer = ParallelAnalyzer::new().min_parallel_size(4).segment_size(2);
/// let result = analyzer.analyze(&[0, 0, 1, 1, 1, 2]);
/// assert_eq!((result.value, result.count), (1, 3));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ParallelAnalyzer {
    /// Minimum buffer size to enable parallel processing.
    min_parallel_size: usize,
    /// Bytes per rayon task.
    segment_size: usize,
}

impl ParallelAnalyzer {
    /// Creates a parallel analyzer with default thresholds.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            min_parallel_size: super::DEFAULT_PARALLEL_THRESHOLD,
            segment_size: DEFAULT_SEGMENT_SIZE,
        }
    }

    /// Sets the minimum buffer size for parallel processing.
    ///
    /// Smaller buffers are analyzed sequentially.
    #[must_use]
    pub const fn min_parallel_size(mut self, size: usize) -> Self {
        self.min_parallel_size = size;
        self
    }

    /// Sets the segment size; clamped to at least one byte.
    #[must_use]
    pub fn segment_size(mut self, size: usize) -> Self {
        self.segment_size = size.max(1);
        self
    }

    fn histogram(&self, bytes: &[u8]) -> ByteHistogram {
        bytes
            .par_chunks(self.segment_size)
            .fold(ByteHistogram::new, |mut histogram, segment| {
                histogram.record(segment);
                histogram
            })
            .reduce(ByteHistogram::new, |a, b| a.merge(&b))
    }
}

impl Default for ParallelAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for ParallelAnalyzer {
    fn analyze(&self, bytes: &[u8]) -> FrequencyResult {
        if bytes.len() < self.min_parallel_size {
            return ByteHistogram::from_bytes(bytes).into_result(bytes.len());
        }
        self.histogram(bytes).into_result(bytes.len())
    }

    fn name(&self) -> &'static str {
        "parallel"
    }
}
