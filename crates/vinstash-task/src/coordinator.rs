//! The import coordinator and its background worker.

use crate::{GENERIC_ERROR, ImportJob, ImportProgress, Result, TaskState};
use futures::{FutureExt, StreamExt};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use vinstash_fetch::{FetchEvent, FetchFailure, VehicleFetcher};
use vinstash_store::VehicleStore;
use vinstash_types::RawRow;

/// Runs at most one background import at a time.
///
/// `start` returns immediately; the worker runs on the tokio runtime the
/// coordinator was created on. Every other method reads shared state under a
/// short lock and never waits for the worker, except [`wait`](Self::wait).
pub struct ImportCoordinator {
    store: Arc<VehicleStore>,
    fetcher: Arc<dyn VehicleFetcher>,
    runtime: Handle,
    progress: ImportProgress,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl fmt::Debug for ImportCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportCoordinator")
            .field("store", &self.store)
            .field("progress", &self.progress)
            .finish_non_exhaustive()
    }
}

impl ImportCoordinator {
    /// Creates a coordinator on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if called outside a tokio runtime.
    pub fn new(store: Arc<VehicleStore>, fetcher: Arc<dyn VehicleFetcher>) -> Result<Self> {
        Ok(Self::with_handle(store, fetcher, Handle::try_current()?))
    }

    /// Creates a coordinator that spawns its worker on `runtime`.
    #[must_use]
    pub fn with_handle(
        store: Arc<VehicleStore>,
        fetcher: Arc<dyn VehicleFetcher>,
        runtime: Handle,
    ) -> Self {
        Self {
            store,
            fetcher,
            runtime,
            progress: ImportProgress::new(),
            worker: Mutex::new(None),
        }
    }

    /// Returns the store imports are written to.
    #[must_use]
    pub const fn store(&self) -> &Arc<VehicleStore> {
        &self.store
    }

    /// Starts importing `vins` in the background.
    ///
    /// Does nothing if the list is empty, an import is running, or the last
    /// import's results have not been consumed. Returns whether a worker was
    /// launched.
    pub fn start<I, S>(&self, vins: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let vins: Vec<String> = vins.into_iter().map(Into::into).collect();
        if vins.is_empty() {
            debug!("import requested with no VINs, ignored");
            return false;
        }

        let job = ImportJob::new(vins.clone(), self.fetcher.checkpoints_per_item());
        let job_id = job.id;
        if !self.progress.try_begin(job) {
            debug!(state = %self.progress.state(), "import already active, request ignored");
            return false;
        }

        info!(%job_id, count = vins.len(), "starting import");
        let worker = self.runtime.spawn(run_import(
            Arc::clone(&self.store),
            Arc::clone(&self.fetcher),
            self.progress.clone(),
            vins,
        ));
        *self.worker.lock().unwrap_or_else(PoisonError::into_inner) = Some(worker);
        true
    }

    /// Current progress, truncated to a whole percent.
    #[must_use]
    pub fn progress(&self) -> u8 {
        self.progress.progress()
    }

    /// Returns true while the worker is processing VINs.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state() == TaskState::Running
    }

    /// Returns the task slot's lifecycle state.
    #[must_use]
    pub fn state(&self) -> TaskState {
        self.progress.state()
    }

    /// Returns the result lines of a finished import, once.
    ///
    /// Returns `None` while running or idle. Consuming frees the slot for
    /// the next [`start`](Self::start).
    pub fn consume_results(&self) -> Option<Vec<String>> {
        self.progress.consume()
    }

    /// Returns a copy of the current job, if any.
    #[must_use]
    pub fn snapshot(&self) -> Option<ImportJob> {
        self.progress.snapshot()
    }

    /// Waits for the current worker to finish.
    ///
    /// Returns immediately if no worker was started since the last wait.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker task panicked.
    pub async fn wait(&self) -> Result<()> {
        let worker = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(worker) = worker {
            worker.await?;
        }
        Ok(())
    }
}

async fn run_import(
    store: Arc<VehicleStore>,
    fetcher: Arc<dyn VehicleFetcher>,
    progress: ImportProgress,
    vins: Vec<String>,
) {
    let total = vins.len();

    for (index, vin) in vins.iter().enumerate() {
        debug!(vin, index, total, "processing vehicle");
        let message = import_one(&store, fetcher.as_ref(), &progress, index, vin).await;
        progress.finish_item(index, &message);
    }

    progress.complete();
    info!(total, "import finished");
}

/// Drives one lookup to its end and returns the result message.
async fn import_one(
    store: &Arc<VehicleStore>,
    fetcher: &dyn VehicleFetcher,
    progress: &ImportProgress,
    index: usize,
    vin: &str,
) -> String {
    let Ok(mut events) = panic::catch_unwind(AssertUnwindSafe(|| fetcher.fetch(vin))) else {
        warn!(vin, "fetcher panicked");
        return GENERIC_ERROR.to_owned();
    };

    loop {
        let Ok(event) = AssertUnwindSafe(events.next()).catch_unwind().await else {
            warn!(vin, "fetcher panicked");
            return GENERIC_ERROR.to_owned();
        };

        match event {
            Some(Ok(FetchEvent::Checkpoint)) => progress.record_checkpoint(index),
            Some(Ok(FetchEvent::Rows(rows))) => return import_rows(store, vin, rows).await,
            Some(Err(FetchFailure::Fetch(error))) => {
                warn!(vin, %error, "fetch failed");
                return error.message().to_owned();
            }
            Some(Err(failure)) => {
                warn!(vin, %failure, "fetch failed");
                return GENERIC_ERROR.to_owned();
            }
            None => {
                warn!(vin, "fetch ended without rows");
                return GENERIC_ERROR.to_owned();
            }
        }
    }
}

async fn import_rows(store: &Arc<VehicleStore>, vin: &str, rows: Vec<RawRow>) -> String {
    let store = Arc::clone(store);

    match tokio::task::spawn_blocking(move || store.import_vehicle(&rows)).await {
        Ok(Ok(outcome)) => {
            debug!(vin, %outcome, "import attempted");
            outcome.to_string()
        }
        Ok(Err(error)) => {
            warn!(vin, %error, "store rejected vehicle");
            error.to_string()
        }
        Err(error) => {
            warn!(vin, %error, "import task failed");
            GENERIC_ERROR.to_owned()
        }
    }
}
