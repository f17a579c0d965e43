//! Most-frequent-byte results.

use serde::{Deserialize, Serialize};

/// The most frequent byte in a buffer and how often it occurred.
///
/// `count` is the maximum single-byte frequency in the source buffer and
/// `value` is the lowest byte value reaching it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrequencyResult {
    /// Winning byte value.
    pub value: u8,
    /// Occurrences of `value`.
    pub count: u64,
    /// Length of the analyzed buffer in bytes.
    pub buffer_size: usize,
}

impl FrequencyResult {
    /// Result for an empty buffer.
    pub const EMPTY: Self = Self {
        value: 0,
        count: 0,
        buffer_size: 0,
    };

    /// Creates a new result.
    #[must_use]
    pub const fn new(value: u8, count: u64, buffer_size: usize) -> Self {
        Self {
            value,
            count,
            buffer_size,
        }
    }
}
