//! Import job definitions and types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an import job.
pub type JobId = Uuid;

/// Result recorded when a VIN fails for a reason the fetcher did not describe.
pub const GENERIC_ERROR: &str = "Generic error";

/// Lifecycle state of the coordinator's task slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    /// No job, or the last job's results were consumed.
    #[default]
    Idle,
    /// A worker is processing VINs.
    Running,
    /// Every VIN was processed and the results await collection.
    Complete,
}

impl TaskState {
    /// Returns the state as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Complete => "complete",
        }
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An import of an ordered list of VINs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportJob {
    /// Unique identifier for this job.
    pub id: JobId,
    /// Timestamp when the job was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp when the worker picked the job up.
    pub started_at: Option<DateTime<Utc>>,
    /// Timestamp when the last VIN was processed.
    pub completed_at: Option<DateTime<Utc>>,
    /// VINs in processing order.
    pub vins: Vec<String>,
    /// One `"<vin>: <message>"` line per processed VIN, in order.
    pub results: Vec<String>,
    /// Checkpoints each VIN is expected to yield.
    pub checkpoints_per_item: u32,
    /// Overall progress in percent.
    pub progress: f64,
}

impl ImportJob {
    /// Creates a job for the given VINs.
    #[must_use]
    pub fn new(vins: Vec<String>, checkpoints_per_item: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            vins,
            results: Vec::new(),
            checkpoints_per_item,
            progress: 0.0,
        }
    }

    /// Number of VINs in the job.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vins.len()
    }

    /// Returns true if the job has no VINs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vins.is_empty()
    }

    /// Progress gained from one checkpoint.
    #[must_use]
    pub fn checkpoint_step(&self) -> f64 {
        let steps = self.vins.len() as f64 * f64::from(self.checkpoints_per_item);
        if steps == 0.0 { 0.0 } else { 100.0 / steps }
    }

    /// Progress once the VIN at `index` is finished.
    #[must_use]
    pub fn item_ceiling(&self, index: usize) -> f64 {
        if self.vins.is_empty() {
            return 100.0;
        }
        ((index + 1) as f64 * 100.0 / self.vins.len() as f64).min(100.0)
    }

    /// Advances progress by one checkpoint of the VIN at `index`.
    ///
    /// Never moves past that VIN's ceiling, so the later snap cannot go back.
    pub fn record_checkpoint(&mut self, index: usize) {
        let ceiling = self.item_ceiling(index);
        self.progress = (self.progress + self.checkpoint_step()).min(ceiling);
    }

    /// Records the result for the VIN at `index` and snaps progress to its ceiling.
    pub fn finish_item(&mut self, index: usize, message: &str) {
        let vin = self.vins.get(index).map_or("", String::as_str);
        self.results.push(format!("{vin}: {message}"));
        self.progress = self.item_ceiling(index);
    }

    /// Truncated progress percentage.
    #[must_use]
    pub fn percent(&self) -> u8 {
        self.progress.clamp(0.0, 100.0) as u8
    }

    /// Marks the job as started.
    pub fn mark_started(&mut self) {
        self.started_at = Some(Utc::now());
    }

    /// Marks the job as completed.
    pub fn mark_completed(&mut self) {
        self.progress = 100.0;
        self.completed_at = Some(Utc::now());
    }

    /// Returns true once every VIN has a result.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.completed_at.is_some() && self.results.len() == self.vins.len()
    }
}
