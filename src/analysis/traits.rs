//! Analyzer trait definition.

use crate::core::FrequencyResult;

/// Computes the most frequent byte of a buffer.
///
/// Implementations must be pure: the same bytes always produce the same
/// result, and ties resolve to the lowest byte value.
pub trait Analyzer: Send + Sync {
    /// Analyzes `bytes` and returns the winning byte and its count.
    fn analyze(&self, bytes: &[u8]) -> FrequencyResult;

    /// Returns the name of this analyzer.
    fn name(&self) -> &'static str;
}
