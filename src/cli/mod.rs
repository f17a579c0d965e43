//! CLI layer for bytefreq.
//!
//! Provides the command-line interface using clap and the message
//! templates for everything the session prints.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::{execute, execute_with};
pub use output::OutputFormat;
pub use parser::Cli;
