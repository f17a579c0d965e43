//! Background jobs.
//!
//! A job allocates and fills its buffer on the caller's thread, then hands
//! the buffer to a detached thread that analyzes it and writes the report.
//! Nothing ever joins, awaits or cancels a job; the registry only keeps
//! bookkeeping records.

use crate::analysis::Analyzer;
use crate::cli::output::{OutputFormat, format_allocating, format_populated, format_report};
use crate::core::{Buffer, FrequencyResult};
use crate::error::{JobError, Result};
use crate::session::sink::OutputSink;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use tracing::{debug, info, warn};

/// Job identifier, unique within a session and assigned in start order.
pub type JobId = u64;

/// Lifecycle state of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    /// Buffer allocated; analysis in progress.
    Running,
    /// Report written.
    Completed,
    /// Buffer allocation or thread spawn failed.
    Failed,
}

impl JobState {
    /// Returns true for `Completed` and `Failed`.
    #[must_use]
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Bookkeeping record for one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Job identifier.
    pub id: JobId,
    /// Current state.
    pub state: JobState,
    /// Requested buffer size in bytes.
    pub size: usize,
    /// Result, once completed.
    pub result: Option<FrequencyResult>,
}

/// Thread-safe set of known jobs.
///
/// Clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct JobRegistry {
    next_id: Arc<AtomicU64>,
    jobs: Arc<Mutex<BTreeMap<JobId, Job>>>,
}

impl JobRegistry {
    /// Creates an empty registry; the first job gets id 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new running job and returns its id.
    pub fn register(&self, size: usize) -> JobId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.lock().insert(
            id,
            Job {
                id,
                state: JobState::Running,
                size,
                result: None,
            },
        );
        id
    }

    /// Marks a job completed with its result.
    pub fn complete(&self, id: JobId, result: FrequencyResult) {
        if let Some(job) = self.lock().get_mut(&id) {
            job.state = JobState::Completed;
            job.result = Some(result);
        }
    }

    /// Marks a job failed.
    pub fn fail(&self, id: JobId) {
        if let Some(job) = self.lock().get_mut(&id) {
            job.state = JobState::Failed;
        }
    }

    /// Returns a copy of a job record.
    #[must_use]
    pub fn get(&self, id: JobId) -> Option<Job> {
        self.lock().get(&id).cloned()
    }

    /// Counts records in `state`.
    #[must_use]
    pub fn count(&self, state: JobState) -> usize {
        self.lock().values().filter(|job| job.state == state).count()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if no records are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drops all completed and failed records, returning how many.
    pub fn prune_finished(&self) -> usize {
        let mut jobs = self.lock();
        let before = jobs.len();
        jobs.retain(|_, job| !job.state.is_finished());
        before - jobs.len()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<JobId, Job>> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Source of independent per-job random generators.
///
/// With a base seed, job `n` draws from `StdRng::seed_from_u64(seed + n)`;
/// without one, each job seeds from OS entropy. Jobs never share a
/// generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct RngSource {
    seed: Option<u64>,
}

impl RngSource {
    /// Creates a source; `None` means entropy seeding.
    #[must_use]
    pub const fn new(seed: Option<u64>) -> Self {
        Self { seed }
    }

    /// Returns a fresh generator for job `id`.
    #[must_use]
    pub fn rng_for(&self, id: JobId) -> StdRng {
        self.seed.map_or_else(StdRng::from_entropy, |seed| {
            StdRng::seed_from_u64(seed.wrapping_add(id))
        })
    }
}

/// Outcome of starting a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Launch {
    /// The job is running in the background.
    Spawned(JobId),
    /// The job failed before its background phase started.
    Failed {
        /// The failed job.
        id: JobId,
        /// Why it failed.
        error: JobError,
    },
}

/// Starts jobs with shared dependencies.
#[derive(Clone)]
pub struct JobLauncher {
    registry: JobRegistry,
    output: OutputSink,
    analyzer: Arc<dyn Analyzer>,
    rng: RngSource,
    format: OutputFormat,
}

impl JobLauncher {
    /// Creates a launcher.
    pub fn new(
        registry: JobRegistry,
        output: OutputSink,
        analyzer: Arc<dyn Analyzer>,
        rng: RngSource,
        format: OutputFormat,
    ) -> Self {
        Self {
            registry,
            output,
            analyzer,
            rng,
            format,
        }
    }

    /// Starts a job over a `size`-byte buffer.
    ///
    /// Allocation and fill run on the calling thread; analysis and the
    /// report run on a detached thread named `job-<id>`. Allocation and
    /// spawn failures are confined to this job and returned as
    /// [`Launch::Failed`].
    ///
    /// # Errors
    ///
    /// Returns an error only if writing a banner to the output fails; the
    /// job is marked failed first.
    pub fn launch(&self, size: usize) -> Result<Launch> {
        let id = self.registry.register(size);
        info!(job_id = id, size, "job started");
        self.banner(id, &format_allocating(id, size))?;

        let mut rng = self.rng.rng_for(id);
        let buffer = match Buffer::random(size, &mut rng) {
            Ok(buffer) => buffer,
            Err(error) => return Ok(self.failed(id, error)),
        };
        debug!(job_id = id, size, "buffer populated");
        self.banner(id, &format_populated(id))?;

        let registry = self.registry.clone();
        let output = self.output.clone();
        let analyzer = Arc::clone(&self.analyzer);
        let format = self.format;
        let spawned = thread::Builder::new()
            .name(format!("job-{id}"))
            .spawn(move || {
                let result = analyzer.analyze(buffer.as_bytes());
                drop(buffer);
                if let Err(e) = output.line(&format_report(id, &result, format)) {
                    warn!(job_id = id, error = %e, "failed to write job report");
                }
                registry.complete(id, result);
                info!(
                    job_id = id,
                    value = result.value,
                    count = result.count,
                    "job completed"
                );
            });

        match spawned {
            Ok(_detached) => Ok(Launch::Spawned(id)),
            Err(e) => Ok(self.failed(
                id,
                JobError::SpawnFailed {
                    reason: e.to_string(),
                },
            )),
        }
    }

    fn banner(&self, id: JobId, text: &str) -> Result<()> {
        self.output.line(text).inspect_err(|e| {
            self.registry.fail(id);
            warn!(job_id = id, error = %e, "failed to write job banner");
        })
    }

    fn failed(&self, id: JobId, error: JobError) -> Launch {
        self.registry.fail(id);
        warn!(job_id = id, error = %error, "job failed");
        Launch::Failed { id, error }
    }
}
