//! Error types for bytefreq operations.
//!
//! This module provides the error hierarchy using `thiserror` for the
//! session loop, background jobs, I/O on the input and output streams,
//! and startup configuration.

use thiserror::Error;

/// Result type alias for bytefreq operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Background job errors (allocation, thread spawn).
    #[error("job error: {0}")]
    Job(#[from] JobError),

    /// Command loop errors.
    #[error("command error: {0}")]
    Command(#[from] CommandError),

    /// I/O errors on the input stream or output sink.
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// Configuration errors.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },
}

/// Errors confined to a single job.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JobError {
    /// The buffer allocation could not be satisfied.
    #[error("out of memory: could not allocate {requested} bytes")]
    OutOfMemory {
        /// Requested buffer size in bytes.
        requested: usize,
    },

    /// The background thread for the job could not be started.
    #[error("failed to spawn job thread: {reason}")]
    SpawnFailed {
        /// Reason reported by the OS.
        reason: String,
    },
}

/// Command loop errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unrecognized input line.
    #[error("unknown command: {0}")]
    UnknownCommand(String),
}

/// I/O errors on the session streams.
#[derive(Error, Debug)]
pub enum IoError {
    /// Reading the next input line failed.
    #[error("failed to read input: {reason}")]
    ReadFailed {
        /// Reason for failure.
        reason: String,
    },

    /// Writing to the output sink failed.
    #[error("failed to write output: {reason}")]
    WriteFailed {
        /// Reason for failure.
        reason: String,
    },
}
