//! Import command implementation.
//!
//! Starts a background import against a fixture directory and renders its
//! progress until the results are in.

use crate::commands::open_store;
use crate::display::import_progress_bar;
use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use vinstash_lib::{FetcherConfig, FixtureFetcher, VinStash};

/// Interval between progress polls.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Import the given VINs, fetching rows from `fixtures`.
pub(crate) async fn import(
    db: Option<&Path>,
    vins: Vec<String>,
    fixtures: PathBuf,
    checkpoints: u32,
    step_delay_ms: u64,
    quiet: bool,
) -> Result<()> {
    if !fixtures.is_dir() {
        bail!("Fixture directory not found: {}", fixtures.display());
    }

    let store = Arc::new(open_store(db)?);
    let config = FetcherConfig {
        checkpoints,
        step_delay: Duration::from_millis(step_delay_ms),
    };
    let fetcher = Arc::new(FixtureFetcher::with_config(fixtures, config));
    let stash = VinStash::new(store, fetcher).context("Failed to create import coordinator")?;

    let total = vins.len();
    if !stash.start_import(vins) {
        bail!("An import is already in progress");
    }

    let progress = import_progress_bar(quiet, total)?;
    while stash.is_running() {
        progress.set_position(u64::from(stash.progress()));
        tokio::time::sleep(POLL_INTERVAL).await;
    }
    stash.wait().await.context("Import worker failed")?;
    progress.set_position(u64::from(stash.progress()));
    progress.finish_with_message(format!("processed {total} vehicles"));

    let results = stash
        .consume_results()
        .context("Import finished without results")?;
    for line in results {
        println!("{line}");
    }

    Ok(())
}
