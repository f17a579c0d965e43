//! Interactive session layer.
//!
//! The [`Session`] runs the foreground command loop and launches background
//! jobs through a [`JobLauncher`]. All output goes through a shared
//! [`OutputSink`].

pub mod command;
pub mod config;
pub mod controller;
pub mod job;
pub mod reclaim;
pub mod sink;

pub use command::Command;
pub use config::{DEFAULT_BUFFER_SIZE, SessionConfig, parse_size};
pub use controller::{Greeting, LoopState, Session, SessionSummary};
pub use job::{Job, JobId, JobLauncher, JobRegistry, JobState, Launch, RngSource};
pub use reclaim::{HeapTrim, ReclaimReport, reclaim};
pub use sink::{MemoryOutput, OutputSink};
