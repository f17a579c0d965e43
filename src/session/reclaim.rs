//! Explicit memory reclamation.
//!
//! Job buffers are freed as soon as their job drops them, so there is no
//! collector to run. A reclamation request instead releases what the
//! process still holds on to: finished job records in the registry, and
//! free pages glibc keeps cached in the heap (`malloc_trim`). On targets
//! without `malloc_trim` the heap step does nothing and says so.

use crate::session::job::JobRegistry;
use tracing::info;

/// Outcome of the heap-trimming step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapTrim {
    /// Free pages were returned to the OS.
    Released,
    /// The allocator had nothing to return.
    NothingToRelease,
    /// The platform allocator has no trim operation.
    Unsupported,
}

/// What a reclamation request released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReclaimReport {
    /// Finished job records removed from the registry.
    pub pruned_jobs: usize,
    /// Result of trimming the heap.
    pub heap: HeapTrim,
}

/// Synchronously releases retained memory.
pub fn reclaim(registry: &JobRegistry) -> ReclaimReport {
    let pruned_jobs = registry.prune_finished();
    let heap = trim_heap();
    info!(pruned_jobs, heap = ?heap, "memory reclamation finished");
    ReclaimReport { pruned_jobs, heap }
}

#[cfg(all(target_os = "linux", target_env = "gnu"))]
#[allow(unsafe_code)]
fn trim_heap() -> HeapTrim {
    // SAFETY: malloc_trim only releases free memory held by the allocator and
    // is thread-safe; no live allocation is touched.
    let released = unsafe { libc::malloc_trim(0) };
    if released == 0 {
        HeapTrim::NothingToRelease
    } else {
        HeapTrim::Released
    }
}

#[cfg(not(all(target_os = "linux", target_env = "gnu")))]
const fn trim_heap() -> HeapTrim {
    HeapTrim::Unsupported
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FrequencyResult;

    #[test]
    fn test_reclaim_prunes_finished_jobs() {
        let registry = JobRegistry::new();
        let done = registry.register(8);
        let failed = registry.register(8);
        let running = registry.register(8);
        registry.complete(done, FrequencyResult::new(0, 8, 8));
        registry.fail(failed);

        let report = reclaim(&registry);
        assert_eq!(report.pruned_jobs, 2);
        assert!(registry.get(running).is_some());
        assert!(registry.get(done).is_none());

        let report = reclaim(&registry);
        assert_eq!(report.pruned_jobs, 0);
    }

    #[test]
    fn test_trim_heap_does_not_crash() {
        let heap = trim_heap();
        if cfg!(all(target_os = "linux", target_env = "gnu")) {
            assert_ne!(heap, HeapTrim::Unsupported);
        } else {
            assert_eq!(heap, HeapTrim::Unsupported);
        }
    }
}
