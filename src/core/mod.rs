//! Core domain models for bytefreq.
//!
//! This module contains the fundamental data structures: job-owned byte
//! buffers and the frequency results computed over them. These are pure
//! domain models with no I/O dependencies.

pub mod buffer;
pub mod frequency;

pub use buffer::Buffer;
pub use frequency::FrequencyResult;
