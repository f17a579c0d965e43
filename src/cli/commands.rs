//! CLI entry point.
//!
//! Wires the parsed arguments to a [`Session`] over stdin and stdout.

use crate::cli::parser::Cli;
use crate::error::Result;
use crate::session::{OutputSink, Session, SessionSummary};
use std::io::{self, BufRead};

/// Runs an interactive session on stdin and stdout.
///
/// # Errors
///
/// Returns an error if reading stdin or writing stdout fails.
pub fn execute(cli: &Cli) -> Result<SessionSummary> {
    execute_with(cli, io::stdin().lock(), OutputSink::stdout())
}

/// Runs an interactive session over the given streams.
///
/// # Errors
///
/// Returns an error if reading `input` or writing `output` fails.
pub fn execute_with<R: BufRead>(
    cli: &Cli,
    input: R,
    output: OutputSink,
) -> Result<SessionSummary> {
    Session::new(cli.session_config(), output).run(input)
}
