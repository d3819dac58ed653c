//! The vehicle store.

use crate::draft::VehicleDraft;
use crate::{Result, StoreError, VehicleQuery, regexp};
use directories::ProjectDirs;
use rusqlite::types::ToSql;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;
use vinstash_options::{EncodedSet, decode};
use vinstash_types::{ImportOutcome, RawRow, VehicleRecord};

/// Current schema version, tracked in `PRAGMA user_version`.
pub const SCHEMA_VERSION: i64 = 1;

/// File name of the database inside the data directory.
pub const DATABASE_FILE: &str = "vehicles.db";

const SELECT_VEHICLES: &str =
    "SELECT vin, code_type, color, upholstery, production_date, options FROM vehicles";

/// Persistent store of vehicles and option display names.
///
/// The connection sits behind a mutex, so the store can be shared through
/// an `Arc` between a background importer and foreground queries. Every
/// operation holds the lock for its whole duration and writes run inside a
/// transaction, so readers never observe half of an import.
#[derive(Debug)]
pub struct VehicleStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl VehicleStore {
    /// Opens (or creates) the store at `path`.
    ///
    /// Creates the parent directory and the tables if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the database
    /// cannot be opened or migrated.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| StoreError::CreateDir {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let conn = Connection::open(path)?;
        Self::init(conn, Some(path.to_path_buf()))
    }

    /// Opens a private in-memory store.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn, None)
    }

    /// Returns the default database path.
    ///
    /// Uses the platform data directory (e.g. `~/.local/share/vinstash/` on
    /// Linux), falling back to `~/.vinstash/`.
    #[must_use]
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("", "", "vinstash")
            .map_or_else(dirs_fallback, |proj_dirs| proj_dirs.data_dir().to_path_buf())
            .join(DATABASE_FILE)
    }

    /// Opens the store at the default path.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be opened.
    pub fn with_default_path() -> Result<Self> {
        Self::open(Self::default_path())
    }

    fn init(conn: Connection, path: Option<PathBuf>) -> Result<Self> {
        regexp::register(&conn)?;
        migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path,
        })
    }

    /// Returns the database path, or `None` for an in-memory store.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Returns the schema version recorded in the database.
    ///
    /// # Errors
    ///
    /// Returns an error if the pragma cannot be read.
    pub fn schema_version(&self) -> Result<i64> {
        let conn = self.connection()?;
        schema_version(&conn)
    }

    /// Imports one vehicle from raw lookup rows.
    ///
    /// Rows labelled `VIN`, `Code / Type`, `Color`, `Upholstery` and
    /// `Production Date` fill the scalar fields. Every other row whose key
    /// looks like an option code contributes that code, with the row value
    /// as its display name.
    ///
    /// Option names and the vehicle are inserted only if absent, in one
    /// transaction. Re-importing a known VIN leaves the stored vehicle as is.
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails; nothing is persisted
    /// in that case.
    pub fn import_vehicle(&self, rows: &[RawRow]) -> Result<ImportOutcome> {
        if rows.is_empty() {
            return Ok(ImportOutcome::NoData);
        }

        let draft = VehicleDraft::from_rows(rows);
        let missing = draft.missing_fields();
        if !missing.is_empty() {
            debug!(vin = %draft.vin, ?missing, "insufficient data for import");
            return Ok(ImportOutcome::InsufficientData);
        }

        let options = draft.encoded_options();
        let mut conn = self.connection()?;
        let tx = conn.transaction()?;

        let mut new_names = 0;
        {
            let mut stmt =
                tx.prepare("INSERT OR IGNORE INTO options (id, code_type, name) VALUES (?1, ?2, ?3)")?;
            for (code, name) in &draft.option_names {
                new_names += stmt.execute(params![code, draft.code_type, name])?;
            }
        }

        let inserted = tx.execute(
            "INSERT OR IGNORE INTO vehicles (vin, code_type, color, upholstery, production_date, options)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                draft.vin,
                draft.code_type,
                draft.color,
                draft.upholstery,
                draft.production_date,
                options.as_str(),
            ],
        )?;

        tx.commit()?;

        if inserted == 0 {
            debug!(vin = %draft.vin, "vehicle already stored, skipped");
        }
        debug!(
            vin = %draft.vin,
            code_type = %draft.code_type,
            options = draft.option_names.len(),
            new_names,
            "imported vehicle"
        );

        Ok(ImportOutcome::Complete)
    }

    /// Returns vehicles matching the query, ordered by VIN.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored option set is corrupt.
    pub fn search_vehicles(&self, query: &VehicleQuery) -> Result<Vec<VehicleRecord>> {
        let mut sql = format!("{SELECT_VEHICLES} WHERE code_type = :code_type");
        let mut filters: Vec<(&str, String)> = Vec::new();

        for (name, predicate) in [
            (":exclude", query.exclusion()?),
            (":include", query.inclusion()?),
        ] {
            let Some(predicate) = predicate else {
                continue;
            };
            let negation = if predicate.is_negated() { "NOT " } else { "" };
            sql.push_str(&format!(" AND {negation}options REGEXP {name}"));
            filters.push((name, predicate.pattern().to_owned()));
        }

        let mut bindings: Vec<(&str, &dyn ToSql)> = Vec::new();
        bindings.push((":code_type", &query.code_type as &dyn ToSql));
        bindings.extend(
            filters
                .iter()
                .map(|(name, pattern)| (*name, pattern as &dyn ToSql)),
        );

        sql.push_str(" ORDER BY vin");

        let conn = self.connection()?;
        let mut stmt = conn.prepare(&sql)?;
        let stored = stmt
            .query_map(bindings.as_slice(), StoredVehicle::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        stored.into_iter().map(StoredVehicle::into_record).collect()
    }

    /// Returns a single vehicle by VIN.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the option set is corrupt.
    pub fn get_vehicle(&self, vin: &str) -> Result<Option<VehicleRecord>> {
        let conn = self.connection()?;
        let stored = conn
            .query_row(
                &format!("{SELECT_VEHICLES} WHERE vin = ?1"),
                [vin],
                StoredVehicle::from_row,
            )
            .optional()?;

        stored.map(StoredVehicle::into_record).transpose()
    }

    /// Returns the number of stored vehicles.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_vehicles(&self) -> Result<usize> {
        let conn = self.connection()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM vehicles", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Deletes vehicles by VIN and returns how many rows were removed.
    ///
    /// Unknown VINs are ignored and an empty list touches nothing. Option
    /// names are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails; no rows are removed in that case.
    pub fn delete_vehicles<S: AsRef<str>>(&self, vins: &[S]) -> Result<usize> {
        if vins.is_empty() {
            return Ok(0);
        }

        let mut conn = self.connection()?;
        let tx = conn.transaction()?;

        let mut deleted = 0;
        {
            let mut stmt = tx.prepare("DELETE FROM vehicles WHERE vin = ?1")?;
            for vin in vins {
                deleted += stmt.execute([vin.as_ref()])?;
            }
        }

        tx.commit()?;
        debug!(requested = vins.len(), deleted, "deleted vehicles");

        Ok(deleted)
    }

    /// Returns the option code to display name mapping for a code type.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_option_mapping(&self, code_type: &str) -> Result<BTreeMap<String, String>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare("SELECT id, name FROM options WHERE code_type = ?1")?;
        let mapping = stmt
            .query_map([code_type], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<BTreeMap<String, String>>>()?;
        Ok(mapping)
    }

    /// Returns the distinct code types of stored vehicles.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_code_types(&self) -> Result<BTreeSet<String>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare("SELECT DISTINCT code_type FROM vehicles")?;
        let code_types = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<BTreeSet<String>>>()?;
        Ok(code_types)
    }
}

/// A vehicle row as read from SQL, before decoding its option set.
struct StoredVehicle {
    vin: String,
    code_type: String,
    color: String,
    upholstery: String,
    production_date: String,
    options: EncodedSet,
}

impl StoredVehicle {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            vin: row.get(0)?,
            code_type: row.get(1)?,
            color: row.get(2)?,
            upholstery: row.get(3)?,
            production_date: row.get(4)?,
            options: EncodedSet::from_raw(row.get(5)?),
        })
    }

    fn into_record(self) -> Result<VehicleRecord> {
        let options = decode(&self.options)?;
        Ok(VehicleRecord {
            vin: self.vin,
            code_type: self.code_type,
            color: self.color,
            upholstery: self.upholstery,
            production_date: self.production_date,
            options,
        })
    }
}

fn schema_version(conn: &Connection) -> Result<i64> {
    Ok(conn.query_row("PRAGMA user_version", [], |row| row.get(0))?)
}

fn migrate(conn: &Connection) -> Result<()> {
    let current = schema_version(conn)?;
    if current > SCHEMA_VERSION {
        return Err(StoreError::UnsupportedSchemaVersion {
            found: current,
            supported: SCHEMA_VERSION,
        });
    }

    if current < 1 {
        conn.execute_batch(include_str!("../migrations/0001_vehicle_schema.sql"))?;
        conn.execute_batch("PRAGMA user_version = 1")?;
        debug!("initialized vehicle schema");
    }

    Ok(())
}

/// Fallback for determining home directory.
fn dirs_fallback() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".vinstash")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use tempfile::TempDir;

    fn rows(pairs: &[(&str, &str)]) -> Vec<RawRow> {
        pairs.iter().map(|(k, v)| RawRow::new(*k, *v)).collect()
    }

    fn vehicle_rows(vin: &str, code_type: &str, options: &[(&str, &str)]) -> Vec<RawRow> {
        let mut result = rows(&[
            ("VIN", vin),
            ("Code / Type", code_type),
            ("Color", "Blue"),
            ("Upholstery", "Leather"),
            ("Production Date", "2006-01"),
        ]);
        result.extend(rows(options));
        result
    }

    fn scenario_rows() -> Vec<RawRow> {
        vehicle_rows("WBA123", "E90", &[("8SR", "Premium Package")])
    }

    #[test]
    fn test_open_creates_schema() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join(DATABASE_FILE);

        let store = VehicleStore::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(store.path(), Some(path.as_path()));
        assert_eq!(store.schema_version().unwrap(), SCHEMA_VERSION);
        assert_eq!(store.count_vehicles().unwrap(), 0);
    }

    #[test]
    fn test_reopen_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(DATABASE_FILE);

        {
            let store = VehicleStore::open(&path).unwrap();
            store.import_vehicle(&scenario_rows()).unwrap();
        }

        let store = VehicleStore::open(&path).unwrap();
        assert_eq!(store.schema_version().unwrap(), SCHEMA_VERSION);
        assert_eq!(store.count_vehicles().unwrap(), 1);
    }

    #[test]
    fn test_newer_schema_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(DATABASE_FILE);

        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch("PRAGMA user_version = 99").unwrap();
        }

        let result = VehicleStore::open(&path);
        assert!(matches!(
            result,
            Err(StoreError::UnsupportedSchemaVersion { found: 99, .. })
        ));
    }

    #[test]
    fn test_scenario_import_and_search() {
        let store = VehicleStore::open_in_memory().unwrap();

        let outcome = store.import_vehicle(&scenario_rows()).unwrap();
        assert_eq!(outcome, ImportOutcome::Complete);

        let found = store
            .search_vehicles(&VehicleQuery::new("E90").include(["8SR"]))
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].vin, "WBA123");
        assert_eq!(found[0].color, "Blue");
        assert_eq!(found[0].upholstery, "Leather");
        assert_eq!(found[0].production_date, "2006-01");
        assert!(found[0].has_option("8SR"));

        let none = store
            .search_vehicles(&VehicleQuery::new("E90").include(["9ZZ"]))
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_import_empty_rows_is_no_data() {
        let store = VehicleStore::open_in_memory().unwrap();
        assert_eq!(store.import_vehicle(&[]).unwrap(), ImportOutcome::NoData);
        assert_eq!(store.count_vehicles().unwrap(), 0);
    }

    #[test]
    fn test_insufficient_data_persists_nothing() {
        let store = VehicleStore::open_in_memory().unwrap();
        let complete = scenario_rows();

        // Drop each scalar label in turn, then the only option.
        for skip in 0..complete.len() {
            let partial: Vec<RawRow> = complete
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != skip)
                .map(|(_, row)| row.clone())
                .collect();

            let outcome = store.import_vehicle(&partial).unwrap();
            assert_eq!(outcome, ImportOutcome::InsufficientData, "missing row {skip}");
        }

        assert_eq!(store.count_vehicles().unwrap(), 0);
        assert!(store.get_option_mapping("E90").unwrap().is_empty());
    }

    #[test]
    fn test_empty_value_is_insufficient() {
        let store = VehicleStore::open_in_memory().unwrap();
        let mut rows = scenario_rows();
        rows[2].value.clear();

        let outcome = store.import_vehicle(&rows).unwrap();
        assert_eq!(outcome, ImportOutcome::InsufficientData);
        assert_eq!(store.count_vehicles().unwrap(), 0);
    }

    #[test]
    fn test_import_is_idempotent() {
        let store = VehicleStore::open_in_memory().unwrap();

        assert!(store.import_vehicle(&scenario_rows()).unwrap().is_complete());
        assert!(store.import_vehicle(&scenario_rows()).unwrap().is_complete());

        assert_eq!(store.count_vehicles().unwrap(), 1);
    }

    #[test]
    fn test_duplicate_vin_is_not_updated() {
        let store = VehicleStore::open_in_memory().unwrap();
        store.import_vehicle(&scenario_rows()).unwrap();

        let mut changed = scenario_rows();
        changed[2].value = "Red".to_string();
        assert!(store.import_vehicle(&changed).unwrap().is_complete());

        let stored = store.get_vehicle("WBA123").unwrap().unwrap();
        assert_eq!(stored.color, "Blue");
    }

    #[test]
    fn test_option_mapping_first_writer_wins() {
        let store = VehicleStore::open_in_memory().unwrap();

        store
            .import_vehicle(&vehicle_rows("WBA001", "E90", &[("ABC", "Sunroof")]))
            .unwrap();
        store
            .import_vehicle(&vehicle_rows("WBA002", "E90", &[("ABC", "Moonroof")]))
            .unwrap();

        let mapping = store.get_option_mapping("E90").unwrap();
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping["ABC"], "Sunroof");
    }

    #[test]
    fn test_option_mapping_is_per_code_type() {
        let store = VehicleStore::open_in_memory().unwrap();

        store
            .import_vehicle(&vehicle_rows("WBA001", "E90", &[("ABC", "Sunroof")]))
            .unwrap();
        store
            .import_vehicle(&vehicle_rows("WBA002", "E46", &[("ABC", "Moonroof")]))
            .unwrap();

        assert_eq!(store.get_option_mapping("E90").unwrap()["ABC"], "Sunroof");
        assert_eq!(store.get_option_mapping("E46").unwrap()["ABC"], "Moonroof");
        assert!(store.get_option_mapping("F30").unwrap().is_empty());
    }

    #[test]
    fn test_search_include_and_exclude() {
        let store = VehicleStore::open_in_memory().unwrap();
        store
            .import_vehicle(&vehicle_rows(
                "WBA001",
                "E90",
                &[("8SR", "Premium"), ("403", "Sunroof"), ("5AC", "Assist")],
            ))
            .unwrap();
        store
            .import_vehicle(&vehicle_rows(
                "WBA002",
                "E90",
                &[("8SR", "Premium"), ("5AC", "Assist")],
            ))
            .unwrap();
        store
            .import_vehicle(&vehicle_rows("WBA003", "E90", &[("2VB", "Tyre pressure")]))
            .unwrap();
        store
            .import_vehicle(&vehicle_rows("WBA004", "E46", &[("8SR", "Premium")]))
            .unwrap();

        let vins = |query: VehicleQuery| -> Vec<String> {
            store
                .search_vehicles(&query)
                .unwrap()
                .into_iter()
                .map(|v| v.vin)
                .collect()
        };

        assert_eq!(vins(VehicleQuery::new("E90")), ["WBA001", "WBA002", "WBA003"]);
        assert_eq!(
            vins(VehicleQuery::new("E90").include(["8SR", "5AC"])),
            ["WBA001", "WBA002"]
        );
        assert_eq!(
            vins(VehicleQuery::new("E90").include(["8SR"]).exclude(["403"])),
            ["WBA002"]
        );
        assert_eq!(
            vins(VehicleQuery::new("E90").exclude(["403", "2VB"])),
            ["WBA002"]
        );
        assert_eq!(vins(VehicleQuery::new("E46").include(["8SR"])), ["WBA004"]);
        assert!(vins(VehicleQuery::new("F30")).is_empty());
    }

    #[test]
    fn test_delete_empty_list_is_noop() {
        let store = VehicleStore::open_in_memory().unwrap();
        store.import_vehicle(&scenario_rows()).unwrap();

        let deleted = store.delete_vehicles::<&str>(&[]).unwrap();
        assert_eq!(deleted, 0);
        assert_eq!(store.count_vehicles().unwrap(), 1);
        assert!(store.get_vehicle("WBA123").unwrap().is_some());
    }

    #[test]
    fn test_delete_vehicles() {
        let store = VehicleStore::open_in_memory().unwrap();
        for vin in ["WBA001", "WBA002", "WBA003"] {
            store
                .import_vehicle(&vehicle_rows(vin, "E90", &[("8SR", "Premium")]))
                .unwrap();
        }

        let deleted = store.delete_vehicles(&["WBA001", "WBA003", "MISSING"]).unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(store.count_vehicles().unwrap(), 1);
        assert!(store.get_vehicle("WBA002").unwrap().is_some());

        // Option names survive vehicle deletion.
        assert_eq!(store.get_option_mapping("E90").unwrap().len(), 1);
    }

    #[test]
    fn test_list_code_types() {
        let store = VehicleStore::open_in_memory().unwrap();
        assert!(store.list_code_types().unwrap().is_empty());

        store
            .import_vehicle(&vehicle_rows("WBA001", "E90", &[("8SR", "Premium")]))
            .unwrap();
        store
            .import_vehicle(&vehicle_rows("WBA002", "E90", &[("8SR", "Premium")]))
            .unwrap();
        store
            .import_vehicle(&vehicle_rows("WBA003", "E46", &[("8SR", "Premium")]))
            .unwrap();

        let code_types: Vec<String> = store.list_code_types().unwrap().into_iter().collect();
        assert_eq!(code_types, ["E46", "E90"]);
    }

    #[test]
    fn test_corrupt_option_set_propagates() {
        let store = VehicleStore::open_in_memory().unwrap();
        store.import_vehicle(&scenario_rows()).unwrap();

        store
            .connection()
            .unwrap()
            .execute("UPDATE vehicles SET options = 'not json' WHERE vin = 'WBA123'", [])
            .unwrap();

        let result = store.search_vehicles(&VehicleQuery::new("E90"));
        assert!(matches!(result, Err(StoreError::Decode(_))));

        let result = store.get_vehicle("WBA123");
        assert!(matches!(result, Err(StoreError::Decode(_))));
    }

    #[test]
    fn test_concurrent_import_and_search() {
        let store = Arc::new(VehicleStore::open_in_memory().unwrap());

        let writer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..50 {
                    let vin = format!("WBA{i:03}");
                    let rows = vehicle_rows(&vin, "E90", &[("8SR", "Premium")]);
                    store.import_vehicle(&rows).unwrap();
                }
            })
        };

        for _ in 0..50 {
            // Every visible vehicle must be complete and have its option name.
            let found = store
                .search_vehicles(&VehicleQuery::new("E90").include(["8SR"]))
                .unwrap();
            for vehicle in &found {
                assert!(vehicle.is_complete());
            }
            if !found.is_empty() {
                assert!(store.get_option_mapping("E90").unwrap().contains_key("8SR"));
            }
        }

        writer.join().unwrap();
        assert_eq!(store.count_vehicles().unwrap(), 50);
    }
}
