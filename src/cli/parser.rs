//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use crate::cli::output::OutputFormat;
use crate::session::config::{DEFAULT_IDENTITY, SessionConfig, parse_size};
use clap::Parser;

/// bytefreq: interactive byte-frequency stress session.
///
/// Starts a job at launch, then reads commands from stdin: an empty line
/// starts another job, `GC` requests memory reclamation and `Q` quits.
#[derive(Parser, Debug)]
#[command(name = "bytefreq")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Name shown in the prompt.
    #[arg(short, long, env = "USER", default_value = DEFAULT_IDENTITY)]
    pub identity: String,

    /// Bytes allocated per job (e.g. 4096, 64KiB, 512MiB, 1GiB).
    #[arg(
        short,
        long,
        env = "BYTEFREQ_BUFFER_SIZE",
        default_value = "1GiB",
        value_parser = parse_size_arg
    )]
    pub buffer_size: usize,

    /// Buffer size at which analysis runs in parallel.
    #[arg(long, default_value = "64MiB", value_parser = parse_size_arg)]
    pub parallel_threshold: usize,

    /// Base seed for reproducible job buffers.
    #[arg(long, env = "BYTEFREQ_SEED")]
    pub seed: Option<u64>,

    /// Job report format (text, json).
    #[arg(long, default_value = "text")]
    pub format: String,

    /// Enable verbose logging on stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Builds the session configuration from the parsed arguments.
    #[must_use]
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            identity: self.identity.clone(),
            buffer_size: self.buffer_size,
            parallel_threshold: self.parallel_threshold,
            seed: self.seed,
            format: OutputFormat::parse(&self.format),
        }
    }
}

fn parse_size_arg(s: &str) -> Result<usize, String> {
    parse_size(s).map_err(|e| e.to_string())
}
