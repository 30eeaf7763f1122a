//! SQLite-backed history store.
//!
//! Table layout, kept compatible with existing history files:
//!
//! ```sql
//! CREATE TABLE history_results (
//!     ID INTEGER PRIMARY KEY AUTOINCREMENT,
//!     EQUATION CHAR(50),
//!     RESULT CHAR(50)
//! );
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rusqlite::{Connection, Transaction, params};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, error};

use super::{HistoryRecord, HistoryStore};

const CREATE_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS history_results (
        ID INTEGER PRIMARY KEY AUTOINCREMENT,
        EQUATION CHAR(50),
        RESULT CHAR(50)
    )";

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("failed to create history directory {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("history connection lock poisoned")]
    Poisoned,
}

/// Where the database lives.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Location {
    File(PathBuf),
    Memory,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Memory => write!(f, ":memory:"),
        }
    }
}

/// History store backed by a single SQLite connection.
///
/// Every operation holds the connection lock for its whole duration and runs
/// inside one transaction. Both are released by scope: the transaction rolls
/// back if it is dropped without a commit.
pub struct SqliteHistory {
    conn: Mutex<Connection>,
    location: Location,
}

impl fmt::Debug for SqliteHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteHistory")
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

impl SqliteHistory {
    /// Open (or create) the database file at `path`, creating parent
    /// directories as needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, HistoryError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| HistoryError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(path)?;
        debug!("Opened history database at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
            location: Location::File(path.to_path_buf()),
        })
    }

    /// A private database that disappears when the store is dropped.
    pub fn open_in_memory() -> Result<Self, HistoryError> {
        Ok(Self {
            conn: Mutex::new(Connection::open_in_memory()?),
            location: Location::Memory,
        })
    }

    /// Path of the database file, if it has one.
    pub fn path(&self) -> Option<&Path> {
        match &self.location {
            Location::File(path) => Some(path),
            Location::Memory => None,
        }
    }

    pub fn try_create_table(&self) -> Result<(), HistoryError> {
        self.with_transaction(|tx| {
            tx.execute(CREATE_TABLE_SQL, [])?;
            Ok(())
        })
    }

    pub fn try_insert_record(&self, equation: &str, result: Decimal) -> Result<(), HistoryError> {
        let record = HistoryRecord::new(equation, result);
        self.with_transaction(|tx| {
            tx.execute(
                "INSERT INTO history_results (EQUATION, RESULT) VALUES (?1, ?2)",
                params![record.equation, record.result],
            )?;
            Ok(())
        })
    }

    pub fn try_get_last_records(&self, limit: usize) -> Result<Vec<HistoryRecord>, HistoryError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.with_transaction(|tx| {
            let mut stmt = tx.prepare(
                "SELECT EQUATION, RESULT FROM history_results ORDER BY ID DESC LIMIT ?1",
            )?;
            let records = stmt
                .query_map(params![limit], |row| {
                    Ok(HistoryRecord {
                        equation: row.get(0)?,
                        result: row.get(1)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(records)
        })
    }

    /// Delete every record, returning how many were removed.
    pub fn try_delete_all_records(&self) -> Result<usize, HistoryError> {
        self.with_transaction(|tx| tx.execute("DELETE FROM history_results", []))
    }

    fn with_transaction<T>(
        &self,
        f: impl FnOnce(&Transaction<'_>) -> rusqlite::Result<T>,
    ) -> Result<T, HistoryError> {
        let mut conn = self.conn.lock().map_err(|_| HistoryError::Poisoned)?;
        let tx = conn.transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }
}

impl HistoryStore for SqliteHistory {
    fn create_table(&self) {
        if let Err(e) = self.try_create_table() {
            error!("Failed to create history table in {}: {e}", self.location);
        }
    }

    fn insert_record(&self, equation: &str, result: Decimal) {
        if let Err(e) = self.try_insert_record(equation, result) {
            error!("Failed to record '{equation} = {result}': {e}");
        }
    }

    fn get_last_records(&self, limit: usize) -> Vec<HistoryRecord> {
        self.try_get_last_records(limit).unwrap_or_else(|e| {
            error!("Failed to read history from {}: {e}", self.location);
            Vec::new()
        })
    }

    fn delete_all_records(&self) {
        match self.try_delete_all_records() {
            Ok(removed) => debug!("Deleted {removed} history records"),
            Err(e) => error!("Failed to clear history in {}: {e}", self.location),
        }
    }
}
