//! Byte histograms and the sequential analyzer.

use crate::analysis::traits::Analyzer;
use crate::core::FrequencyResult;

/// Number of distinct byte values.
pub const BYTE_VALUES: usize = 256;

/// Occurrence counts for each of the 256 byte values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteHistogram {
    counts: [u64; BYTE_VALUES],
}

impl ByteHistogram {
    /// Creates an all-zero histogram.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            counts: [0; BYTE_VALUES],
        }
    }

    /// Builds a histogram from a single pass over `bytes`.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut histogram = Self::new();
        histogram.record(bytes);
        histogram
    }

    /// Adds every byte of `bytes` to the counts.
    pub fn record(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.counts[usize::from(b)] += 1;
        }
    }

    /// Adds the counts of `other` into `self`.
    #[must_use]
    pub fn merge(mut self, other: &Self) -> Self {
        for (mine, theirs) in self.counts.iter_mut().zip(other.counts.iter()) {
            *mine += theirs;
        }
        self
    }

    /// Returns the count for `value`.
    #[must_use]
    pub const fn count(&self, value: u8) -> u64 {
        self.counts[value as usize]
    }

    /// Returns the most frequent byte and its count.
    ///
    /// Scans in ascending order and only replaces the winner on a strictly
    /// greater count, so the lowest byte value wins ties. An empty
    /// histogram yields `(0, 0)`.
    #[must_use]
    pub fn most_frequent(&self) -> (u8, u64) {
        let mut winner = 0u8;
        let mut max = 0u64;
        for (value, &count) in (0..=u8::MAX).zip(self.counts.iter()) {
            if count > max {
                max = count;
                winner = value;
            }
        }
        (winner, max)
    }

    /// Converts the histogram into a result for a buffer of `buffer_size`.
    #[must_use]
    pub fn into_result(self, buffer_size: usize) -> FrequencyResult {
        let (value, count) = self.most_frequent();
        FrequencyResult::new(value, count, buffer_size)
    }
}

impl Default for ByteHistogram {
    fn default() -> Self {
        Self::new()
    }
}

/// Single-threaded analyzer: one histogram pass, then an ascending scan.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialAnalyzer;

impl SequentialAnalyzer {
    /// Creates a new sequential analyzer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Analyzer for SequentialAnalyzer {
    fn analyze(&self, bytes: &[u8]) -> FrequencyResult {
        ByteHistogram::from_bytes(bytes).into_result(bytes.len())
    }

    fn name(&self) -> &'static str {
        "sequential"
    }
}
