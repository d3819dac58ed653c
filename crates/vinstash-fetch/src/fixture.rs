//! Fetcher serving rows from JSON files.
//!
//! Each VIN maps to `<dir>/<VIN>.json`, holding either the rows:
//!
//! ```json
//! [["VIN", "WBA123"], ["Code / Type", "E90"], ["8SR", "Premium Package"]]
//! ```
//!
//! or a recognized failure, optionally raised after some checkpoints:
//!
//! ```json
//! {"error": "blocked by verification", "after": 3}
//! ```

use crate::{
    DEFAULT_CHECKPOINTS, FetchError, FetchFailure, FetchStream, VehicleFetcher, paced_stream,
};
use futures::StreamExt;
use futures::stream;
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use vinstash_types::RawRow;

/// Configuration for the fixture fetcher.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Checkpoints yielded per VIN.
    pub checkpoints: u32,
    /// Delay before each checkpoint.
    pub step_delay: Duration,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            checkpoints: DEFAULT_CHECKPOINTS,
            step_delay: Duration::from_millis(250),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Fixture {
    Rows(Vec<RawRow>),
    Failure {
        error: String,
        #[serde(default)]
        after: Option<u32>,
    },
}

/// Serves vehicle rows from a directory of JSON files.
#[derive(Debug, Clone)]
pub struct FixtureFetcher {
    dir: PathBuf,
    config: FetcherConfig,
}

impl FixtureFetcher {
    /// Creates a fetcher reading from `dir` with default pacing.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_config(dir, FetcherConfig::default())
    }

    /// Creates a fetcher with custom pacing.
    #[must_use]
    pub fn with_config(dir: impl Into<PathBuf>, config: FetcherConfig) -> Self {
        Self {
            dir: dir.into(),
            config,
        }
    }

    /// Returns the fixture directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the fetcher configuration.
    #[must_use]
    pub const fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Returns the fixture path for a VIN, or `None` if the VIN cannot name a file.
    #[must_use]
    pub fn fixture_path(&self, vin: &str) -> Option<PathBuf> {
        let valid = !vin.is_empty() && vin.chars().all(|c| c.is_ascii_alphanumeric());
        valid.then(|| self.dir.join(format!("{vin}.json")))
    }
}

impl VehicleFetcher for FixtureFetcher {
    fn fetch(&self, vin: &str) -> FetchStream {
        let path = self.fixture_path(vin);
        let config = self.config.clone();

        stream::once(load_fixture(path))
            .flat_map(move |loaded| script(loaded, &config))
            .boxed()
    }

    fn checkpoints_per_item(&self) -> u32 {
        self.config.checkpoints
    }
}

async fn load_fixture(path: Option<PathBuf>) -> Result<Fixture, FetchFailure> {
    let Some(path) = path else {
        return Err(FetchError::not_found().into());
    };

    debug!(path = %path.display(), "loading fixture");

    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(FetchError::not_found().into()),
        Err(e) => return Err(FetchFailure::unstructured(e)),
    };

    serde_json::from_str(&content).map_err(FetchFailure::unstructured)
}

/// Turns a loaded fixture into the paced event stream.
fn script(loaded: Result<Fixture, FetchFailure>, config: &FetcherConfig) -> FetchStream {
    let full = config.checkpoints;
    let delay = config.step_delay;

    match loaded {
        Ok(Fixture::Rows(rows)) => paced_stream(full, delay, Ok(rows)),
        Ok(Fixture::Failure { error, after }) => {
            let steps = after.unwrap_or(full).min(full);
            paced_stream(steps, delay, Err(FetchError::new(error).into()))
        }
        // A missing VIN is only discovered after walking the whole lookup.
        Err(FetchFailure::Fetch(error)) => paced_stream(full, delay, Err(error.into())),
        Err(failure) => paced_stream(0, delay, Err(failure)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FetchEvent;
    use tempfile::TempDir;

    fn fast_config() -> FetcherConfig {
        FetcherConfig {
            checkpoints: 4,
            step_delay: Duration::ZERO,
        }
    }

    fn checkpoints(events: &[Result<FetchEvent, FetchFailure>]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, Ok(FetchEvent::Checkpoint)))
            .count()
    }

    #[test]
    fn test_fetcher_config_default() {
        let config = FetcherConfig::default();
        assert_eq!(config.checkpoints, DEFAULT_CHECKPOINTS);
        assert_eq!(config.step_delay, Duration::from_millis(250));
    }

    #[test]
    fn test_fixture_path_rejects_unsafe_vins() {
        let fetcher = FixtureFetcher::new("/fixtures");
        assert_eq!(
            fetcher.fixture_path("WBA123"),
            Some(PathBuf::from("/fixtures/WBA123.json"))
        );
        assert!(fetcher.fixture_path("").is_none());
        assert!(fetcher.fixture_path("../etc/passwd").is_none());
        assert!(fetcher.fixture_path("WBA 123").is_none());
    }

    #[tokio::test]
    async fn test_fetch_rows() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("WBA123.json"),
            r#"[["VIN", "WBA123"], ["8SR", "Premium Package"]]"#,
        )
        .unwrap();

        let fetcher = FixtureFetcher::with_config(temp_dir.path(), fast_config());
        assert_eq!(fetcher.checkpoints_per_item(), 4);

        let events: Vec<_> = fetcher.fetch("WBA123").collect().await;
        assert_eq!(checkpoints(&events), 4);
        assert!(matches!(
            events.last(),
            Some(Ok(FetchEvent::Rows(rows))) if rows.len() == 2 && rows[1].key == "8SR"
        ));
    }

    #[tokio::test]
    async fn test_fetch_missing_vin() {
        let temp_dir = TempDir::new().unwrap();
        let fetcher = FixtureFetcher::with_config(temp_dir.path(), fast_config());

        let events: Vec<_> = fetcher.fetch("WBA999").collect().await;
        assert_eq!(checkpoints(&events), 4);
        assert!(matches!(
            events.last(),
            Some(Err(FetchFailure::Fetch(e))) if e.message() == "VIN not found."
        ));
    }

    #[tokio::test]
    async fn test_fetch_scripted_failure() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("WBA777.json"),
            r#"{"error": "blocked by verification", "after": 2}"#,
        )
        .unwrap();

        let fetcher = FixtureFetcher::with_config(temp_dir.path(), fast_config());
        let events: Vec<_> = fetcher.fetch("WBA777").collect().await;

        assert_eq!(checkpoints(&events), 2);
        assert!(matches!(
            events.last(),
            Some(Err(FetchFailure::Fetch(e))) if e.message() == "blocked by verification"
        ));
    }

    #[tokio::test]
    async fn test_fetch_malformed_fixture_is_unstructured() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("WBA555.json"), "not json").unwrap();

        let fetcher = FixtureFetcher::with_config(temp_dir.path(), fast_config());
        let events: Vec<_> = fetcher.fetch("WBA555").collect().await;

        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], Err(FetchFailure::Unstructured(_))));
    }
}
