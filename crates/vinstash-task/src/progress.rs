//! Shared progress tracking for the import worker.
//!
//! The worker writes and the controller reads through the same
//! [`ImportProgress`] handle. Locks are held only for the duration of a
//! single update or read, so the controller never waits on a fetch.

use crate::{ImportJob, TaskState};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// The coordinator's single task slot.
#[derive(Debug, Clone)]
pub enum TaskSlot {
    /// No job. Keeps the progress of the last consumed job.
    Idle {
        /// Last reported progress.
        progress: u8,
    },
    /// A worker is processing the job.
    Running(ImportJob),
    /// The job finished and its results have not been consumed.
    Complete(ImportJob),
}

impl Default for TaskSlot {
    fn default() -> Self {
        Self::Idle { progress: 0 }
    }
}

impl TaskSlot {
    /// Returns the lifecycle state.
    #[must_use]
    pub const fn state(&self) -> TaskState {
        match self {
            Self::Idle { .. } => TaskState::Idle,
            Self::Running(_) => TaskState::Running,
            Self::Complete(_) => TaskState::Complete,
        }
    }

    /// Returns the job in the slot, if any.
    #[must_use]
    pub const fn job(&self) -> Option<&ImportJob> {
        match self {
            Self::Idle { .. } => None,
            Self::Running(job) | Self::Complete(job) => Some(job),
        }
    }

    /// Truncated progress percentage.
    #[must_use]
    pub fn progress(&self) -> u8 {
        match self {
            Self::Idle { progress } => *progress,
            Self::Running(job) | Self::Complete(job) => job.percent(),
        }
    }
}

/// Thread-safe handle to a [`TaskSlot`].
#[derive(Debug, Clone, Default)]
pub struct ImportProgress {
    slot: Arc<Mutex<TaskSlot>>,
}

impl ImportProgress {
    /// Creates an idle tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the slot.
    ///
    /// Every update leaves the slot consistent, so poisoning is ignored.
    pub(crate) fn lock(&self) -> MutexGuard<'_, TaskSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claims the slot for `job` if it is idle.
    ///
    /// Returns false, leaving the slot untouched, otherwise.
    pub fn try_begin(&self, mut job: ImportJob) -> bool {
        let mut slot = self.lock();
        if !matches!(*slot, TaskSlot::Idle { .. }) {
            return false;
        }
        job.mark_started();
        *slot = TaskSlot::Running(job);
        true
    }

    /// Advances progress by one checkpoint of the VIN at `index`.
    pub fn record_checkpoint(&self, index: usize) {
        if let TaskSlot::Running(job) = &mut *self.lock() {
            job.record_checkpoint(index);
        }
    }

    /// Records the result line for the VIN at `index`.
    pub fn finish_item(&self, index: usize, message: &str) {
        if let TaskSlot::Running(job) = &mut *self.lock() {
            job.finish_item(index, message);
        }
    }

    /// Moves a running job to complete.
    pub fn complete(&self) {
        let mut slot = self.lock();
        *slot = match std::mem::take(&mut *slot) {
            TaskSlot::Running(mut job) => {
                job.mark_completed();
                TaskSlot::Complete(job)
            }
            other => other,
        };
    }

    /// Takes the results of a complete job and frees the slot.
    pub fn consume(&self) -> Option<Vec<String>> {
        let mut slot = self.lock();
        let TaskSlot::Complete(job) = &*slot else {
            return None;
        };
        let progress = job.percent();
        match std::mem::replace(&mut *slot, TaskSlot::Idle { progress }) {
            TaskSlot::Complete(job) => Some(job.results),
            _ => None,
        }
    }

    /// Returns the lifecycle state.
    pub fn state(&self) -> TaskState {
        self.lock().state()
    }

    /// Truncated progress percentage.
    pub fn progress(&self) -> u8 {
        self.lock().progress()
    }

    /// Returns a copy of the current job.
    pub fn snapshot(&self) -> Option<ImportJob> {
        self.lock().job().cloned()
    }
}
