//! Interactive session controller.
//!
//! Reads one command per line, starts jobs without waiting on them,
//! handles reclamation requests and stops on `Q` or end of input.

use crate::analysis::{Analyzer, ParallelAnalyzer};
use crate::cli::output::{
    FAREWELL, START_ANOTHER, format_greeting, format_job_failed, format_reclaim,
    format_unknown_command,
};
use crate::error::{IoError, Result};
use crate::session::command::{Command, strip_line_ending};
use crate::session::config::SessionConfig;
use crate::session::job::{JobId, JobLauncher, JobRegistry, JobState, Launch, RngSource};
use crate::session::reclaim::{ReclaimReport, reclaim};
use crate::session::sink::OutputSink;
use std::io::{BufRead, ErrorKind};
use std::sync::Arc;
use std::thread;
use tracing::{debug, error, info, warn};

/// Command-loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Waiting for the next input line.
    AwaitingCommand,
    /// The loop has ended.
    Terminated,
}

/// Counters collected over a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Jobs started, including failed ones.
    pub jobs_started: usize,
    /// Jobs that failed before their background phase.
    pub jobs_failed: usize,
    /// Input lines dispatched.
    pub commands: usize,
    /// Input lines that were not recognized.
    pub unknown_commands: usize,
}

/// The prompt template bound to the session identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Greeting {
    identity: String,
}

impl Greeting {
    /// Binds the template to `identity`.
    #[must_use]
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
        }
    }

    /// Renders the prompt for the calling thread.
    #[must_use]
    pub fn render(&self) -> String {
        format_greeting(&self.identity, &current_thread_label())
    }
}

/// Name of the calling thread, or its `ThreadId` debug form if unnamed.
fn current_thread_label() -> String {
    let current = thread::current();
    current
        .name()
        .map_or_else(|| format!("{:?}", current.id()), str::to_string)
}

/// Foreground session owning the command loop.
pub struct Session {
    config: SessionConfig,
    greeting: Greeting,
    output: OutputSink,
    jobs: JobRegistry,
    launcher: JobLauncher,
    summary: SessionSummary,
}

impl Session {
    /// Creates a session that analyzes with [`ParallelAnalyzer`].
    pub fn new(config: SessionConfig, output: OutputSink) -> Self {
        let analyzer = ParallelAnalyzer::new().min_parallel_size(config.parallel_threshold);
        Self::with_analyzer(config, output, Arc::new(analyzer))
    }

    /// Creates a session with an explicit analyzer.
    pub fn with_analyzer(
        config: SessionConfig,
        output: OutputSink,
        analyzer: Arc<dyn Analyzer>,
    ) -> Self {
        let jobs = JobRegistry::new();
        let launcher = JobLauncher::new(
            jobs.clone(),
            output.clone(),
            analyzer,
            RngSource::new(config.seed),
            config.format,
        );
        Self {
            greeting: Greeting::new(config.identity.clone()),
            config,
            output,
            jobs,
            launcher,
            summary: SessionSummary::default(),
        }
    }

    /// Returns the job registry.
    #[must_use]
    pub const fn jobs(&self) -> &JobRegistry {
        &self.jobs
    }

    /// Returns the counters collected so far.
    #[must_use]
    pub const fn summary(&self) -> SessionSummary {
        self.summary
    }

    /// Runs the session until `Q` or end of input.
    ///
    /// The first job starts before the first prompt. Outstanding jobs are
    /// not waited for when the loop ends.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails.
    pub fn run<R: BufRead>(&mut self, mut input: R) -> Result<SessionSummary> {
        info!(
            identity = %self.config.identity,
            size = self.config.buffer_size,
            "session starting"
        );
        self.start_job()?;

        let mut line = String::new();
        let mut state = LoopState::AwaitingCommand;
        while state == LoopState::AwaitingCommand {
            self.output.prompt(&self.greeting.render())?;
            state = match read_command(&mut input, &mut line)? {
                Some(text) => self.dispatch(text)?,
                None => self.quit()?,
            };
        }

        info!(
            jobs_started = self.summary.jobs_started,
            jobs_running = self.jobs.count(JobState::Running),
            "session terminated"
        );
        Ok(self.summary)
    }

    /// Handles one input line and returns the next loop state.
    ///
    /// # Errors
    ///
    /// Returns an error if writing output fails.
    pub fn dispatch(&mut self, line: &str) -> Result<LoopState> {
        self.summary.commands += 1;
        match Command::parse(line) {
            Ok(Command::Collect) => {
                let report = self.reclaim();
                self.output.line(&format_reclaim(&report))?;
                Ok(LoopState::AwaitingCommand)
            }
            Ok(Command::StartJob) => {
                self.output.line(START_ANOTHER)?;
                self.start_job()?;
                Ok(LoopState::AwaitingCommand)
            }
            Ok(Command::Quit) => self.quit(),
            Err(err) => {
                self.summary.unknown_commands += 1;
                debug!(line = strip_line_ending(line), "unknown command");
                self.output.line(&format_unknown_command(&err))?;
                Ok(LoopState::AwaitingCommand)
            }
        }
    }

    /// Starts a job of the configured size.
    ///
    /// Returns `None` when the job failed; the failure has already been
    /// reported and the session is unaffected.
    ///
    /// # Errors
    ///
    /// Returns an error if writing output fails.
    pub fn start_job(&mut self) -> Result<Option<JobId>> {
        self.summary.jobs_started += 1;
        match self.launcher.launch(self.config.buffer_size)? {
            Launch::Spawned(id) => Ok(Some(id)),
            Launch::Failed { id, error: err } => {
                self.summary.jobs_failed += 1;
                error!(job_id = id, error = %err, "job could not start");
                self.output.line(&format_job_failed(id, &err))?;
                Ok(None)
            }
        }
    }

    /// Requests reclamation now.
    pub fn reclaim(&self) -> ReclaimReport {
        reclaim(&self.jobs)
    }

    fn quit(&self) -> Result<LoopState> {
        self.output.line(FAREWELL)?;
        Ok(LoopState::Terminated)
    }
}

/// Reads the next line, returning `None` at end of input or on a line that
/// is not valid UTF-8.
fn read_command<'a, R: BufRead>(input: &mut R, line: &'a mut String) -> Result<Option<&'a str>> {
    line.clear();
    match input.read_line(line) {
        Ok(0) => {
            debug!("end of input");
            Ok(None)
        }
        Ok(_) => Ok(Some(line.as_str())),
        Err(e) if e.kind() == ErrorKind::InvalidData => {
            warn!(error = %e, "malformed input line, ending session");
            Ok(None)
        }
        Err(e) => Err(IoError::ReadFailed {
            reason: e.to_string(),
        }
        .into()),
    }
}
