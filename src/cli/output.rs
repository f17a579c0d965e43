//! Output formatting for the interactive session.
//!
//! Every user-facing line the session writes is produced here. Job reports
//! support text and JSON formats; prompts and responses are always text.

use crate::core::FrequencyResult;
use crate::error::{CommandError, JobError};
use crate::session::job::JobId;
use crate::session::reclaim::{HeapTrim, ReclaimReport};
use serde::Serialize;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl OutputFormat {
    /// Parses format from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Response to the start-job command.
pub const START_ANOTHER: &str = "Starting another calculation.";

/// Response to the quit command and to end of input.
pub const FAREWELL: &str = "Good-bye!";

/// Formats the prompt written before each command is read.
#[must_use]
pub fn format_greeting(identity: &str, thread: &str) -> String {
    format!("Hello, {identity} on thread {thread}> ")
}

/// Formats the banner written before a job allocates its buffer.
#[must_use]
pub fn format_allocating(id: JobId, size: usize) -> String {
    format!(
        "Job {id}: allocating {} and populating it with random data. Please wait...",
        format_size(size)
    )
}

/// Formats the banner written once a job's buffer is filled.
#[must_use]
pub fn format_populated(id: JobId) -> String {
    format!("Job {id}: buffer populated. Searching for the most frequent byte...")
}

#[derive(Serialize)]
struct JobReport<'a> {
    job_id: JobId,
    #[serde(flatten)]
    result: &'a FrequencyResult,
}

/// Formats a job's completion report.
#[must_use]
pub fn format_report(id: JobId, result: &FrequencyResult, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format!(
            "Job {id}: the byte {:<3} occurred {:<7} times in a buffer of size {}.",
            result.value, result.count, result.buffer_size
        ),
        OutputFormat::Json => format_json(&JobReport { job_id: id, result }),
    }
}

/// Formats the notice for a job that failed before analysis.
#[must_use]
pub fn format_job_failed(id: JobId, error: &JobError) -> String {
    format!("Job {id} failed: {error}")
}

/// Formats the confirmation for a reclamation request.
#[must_use]
pub fn format_reclaim(report: &ReclaimReport) -> String {
    let heap = match report.heap {
        HeapTrim::Released => "free heap pages returned to the OS",
        HeapTrim::NothingToRelease => "no free heap pages to return",
        HeapTrim::Unsupported => "heap trimming not supported on this platform",
    };
    let plural = if report.pruned_jobs == 1 { "" } else { "s" };
    format!(
        "Memory reclamation ran successfully: released {} finished job record{plural}; {heap}.",
        report.pruned_jobs
    )
}

/// Formats the response to an unrecognized command.
#[must_use]
pub fn format_unknown_command(error: &CommandError) -> String {
    format!("Sorry, {error}")
}

fn format_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
}

#[allow(clippy::cast_precision_loss)]
fn format_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KiB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MiB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GiB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
