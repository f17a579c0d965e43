//! Shared, line-atomic output sink.
//!
//! The command loop and every background job write through clones of the
//! same [`OutputSink`]. Each write happens while holding the sink's mutex and
//! is flushed before the lock is released, so lines from concurrent writers
//! never interleave.

use crate::error::{IoError, Result};
use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Cloneable handle to the session's output stream.
#[derive(Clone)]
pub struct OutputSink {
    writer: SharedWriter,
}

impl OutputSink {
    /// Wraps `writer` in a shared sink.
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// Creates a sink writing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Creates a sink backed by memory, returning a handle to read it back.
    #[must_use]
    pub fn memory() -> (Self, MemoryOutput) {
        let memory = MemoryOutput::default();
        (Self::new(memory.clone()), memory)
    }

    /// Writes `text` followed by a newline as one atomic write.
    pub fn line(&self, text: &str) -> Result<()> {
        let mut writer = self.lock();
        writeln!(writer, "{text}")
            .and_then(|()| writer.flush())
            .map_err(write_failed)
    }

    /// Writes `text` without a trailing newline and flushes it.
    pub fn prompt(&self, text: &str) -> Result<()> {
        let mut writer = self.lock();
        writer
            .write_all(text.as_bytes())
            .and_then(|()| writer.flush())
            .map_err(write_failed)
    }

    fn lock(&self) -> MutexGuard<'_, Box<dyn Write + Send>> {
        // A writer that panicked mid-line cannot leave partial state we care about.
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for OutputSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputSink").finish_non_exhaustive()
    }
}

fn write_failed(err: io::Error) -> crate::error::Error {
    IoError::WriteFailed {
        reason: err.to_string(),
    }
    .into()
}

/// In-memory writer whose contents can be inspected while the session runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryOutput {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl MemoryOutput {
    /// Returns everything written so far.
    #[must_use]
    pub fn contents(&self) -> String {
        let bytes = self.bytes.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Returns the number of non-overlapping occurrences of `needle`.
    #[must_use]
    pub fn count(&self, needle: &str) -> usize {
        self.contents().matches(needle).count()
    }
}

impl Write for MemoryOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
