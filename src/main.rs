//! Binary entry point for bytefreq.

#![allow(clippy::print_stderr)]

use bytefreq::cli::{Cli, execute};
use clap::Parser;
use std::process::ExitCode;
use tracing::info;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = bytefreq::logging::init(cli.verbose) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    match execute(&cli) {
        Ok(summary) => {
            info!(
                jobs_started = summary.jobs_started,
                jobs_failed = summary.jobs_failed,
                commands = summary.commands,
                unknown_commands = summary.unknown_commands,
                "exiting"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
