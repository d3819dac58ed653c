//! The controller-facing API.

use crate::Result;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use vinstash_fetch::VehicleFetcher;
use vinstash_store::{VehicleQuery, VehicleStore};
use vinstash_task::ImportCoordinator;
use vinstash_types::VehicleRecord;

/// A vehicle store paired with its import coordinator.
///
/// Queries go straight to the store and may run while an import is in
/// flight; each one is its own transaction.
#[derive(Debug)]
pub struct VinStash {
    imports: ImportCoordinator,
}

impl VinStash {
    /// Creates a controller on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if called outside a tokio runtime.
    pub fn new(store: Arc<VehicleStore>, fetcher: Arc<dyn VehicleFetcher>) -> Result<Self> {
        Ok(Self::with_coordinator(ImportCoordinator::new(store, fetcher)?))
    }

    /// Wraps an existing coordinator.
    #[must_use]
    pub const fn with_coordinator(imports: ImportCoordinator) -> Self {
        Self { imports }
    }

    /// Returns the underlying store.
    #[must_use]
    pub const fn store(&self) -> &Arc<VehicleStore> {
        self.imports.store()
    }

    /// Returns the import coordinator.
    #[must_use]
    pub const fn imports(&self) -> &ImportCoordinator {
        &self.imports
    }

    /// Starts a background import. See [`ImportCoordinator::start`].
    pub fn start_import<I, S>(&self, vins: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.imports.start(vins)
    }

    /// Current import progress in whole percent.
    #[must_use]
    pub fn progress(&self) -> u8 {
        self.imports.progress()
    }

    /// Returns true while an import is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.imports.is_running()
    }

    /// Returns the finished import's result lines, once.
    pub fn consume_results(&self) -> Option<Vec<String>> {
        self.imports.consume_results()
    }

    /// Waits for the running import to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker panicked.
    pub async fn wait(&self) -> Result<()> {
        Ok(self.imports.wait().await?)
    }

    /// Finds vehicles of `code_type` having every `include` code and none
    /// of the `exclude` codes.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored row is corrupt.
    pub fn search<S: AsRef<str>>(
        &self,
        code_type: &str,
        exclude: &[S],
        include: &[S],
    ) -> Result<Vec<VehicleRecord>> {
        let query = VehicleQuery::new(code_type)
            .exclude(exclude.iter().map(|code| code.as_ref().to_owned()))
            .include(include.iter().map(|code| code.as_ref().to_owned()));
        Ok(self.store().search_vehicles(&query)?)
    }

    /// Returns the option code to name mapping for `code_type`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn import_mapping(&self, code_type: &str) -> Result<BTreeMap<String, String>> {
        Ok(self.store().get_option_mapping(code_type)?)
    }

    /// Returns every stored code type.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_code_types(&self) -> Result<BTreeSet<String>> {
        Ok(self.store().list_code_types()?)
    }

    /// Deletes the given vehicles and returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails; nothing is removed in that case.
    pub fn delete<S: AsRef<str>>(&self, vins: &[S]) -> Result<usize> {
        Ok(self.store().delete_vehicles(vins)?)
    }
}
