//! # bytefreq
//!
//! Interactive byte-frequency stress session.
//!
//! A foreground command loop launches background jobs on demand. Each job
//! allocates a large buffer, fills it with random bytes and reports the most
//! frequent byte, while the loop keeps accepting commands and can request
//! memory reclamation at any time. Job creation is deliberately unbounded.
//!
//! ## Features
//!
//! - **Analysis**: sequential and rayon-parallel byte histograms
//! - **Jobs**: fire-and-forget background threads with per-job RNGs
//! - **Reclamation**: registry pruning plus `malloc_trim` on glibc
//! - **Line-atomic output**: concurrent writers never tear a line

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
// Note: unsafe is needed for malloc_trim
#![warn(unsafe_code)]

pub mod analysis;
pub mod cli;
pub mod core;
pub mod error;
pub mod logging;
pub mod session;

// Re-export commonly used types at crate root
pub use error::{Error, Result};

// Re-export core domain types
pub use crate::core::{Buffer, FrequencyResult};

// Re-export analysis types
pub use analysis::{
    Analyzer, ByteHistogram, DEFAULT_PARALLEL_THRESHOLD, ParallelAnalyzer, SequentialAnalyzer,
    analyze, analyze_parallel,
};

// Re-export session types
pub use session::{
    Command, JobRegistry, JobState, LoopState, OutputSink, Session, SessionConfig,
    SessionSummary,
};

// Re-export CLI types
pub use cli::{Cli, OutputFormat};
