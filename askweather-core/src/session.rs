use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

/// Identifies one query submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubmissionId(u64);

/// Tracks which submission is authoritative.
///
/// Starting a submission makes every earlier one stale, so results that
/// arrive late for an older query are dropped instead of replacing newer ones.
#[derive(Debug, Default)]
pub struct SubmissionTracker {
    current: AtomicU64,
}

impl SubmissionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> SubmissionId {
        SubmissionId(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, id: SubmissionId) -> bool {
        self.current.load(Ordering::SeqCst) == id.0
    }

    /// Passes `results` through only if `id` is still the latest submission.
    pub fn accept<T>(&self, id: SubmissionId, results: T) -> Option<T> {
        if self.is_current(id) {
            Some(results)
        } else {
            debug!(submission = id.0, "dropping results of stale submission");
            None
        }
    }
}
