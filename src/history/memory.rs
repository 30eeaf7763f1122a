//! In-process history store.

use std::sync::{Mutex, PoisonError};

use rust_decimal::Decimal;

use super::{HistoryRecord, HistoryStore};

/// Keeps records in memory for the lifetime of the process.
///
/// Behaves like [`super::SqliteHistory`] minus the file: used by tests and
/// by sessions started without a history file.
#[derive(Debug, Default)]
pub struct MemoryHistory {
    records: Mutex<Vec<HistoryRecord>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<HistoryRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl HistoryStore for MemoryHistory {
    fn create_table(&self) {}

    fn insert_record(&self, equation: &str, result: Decimal) {
        self.lock().push(HistoryRecord::new(equation, result));
    }

    fn get_last_records(&self, limit: usize) -> Vec<HistoryRecord> {
        self.lock().iter().rev().take(limit).cloned().collect()
    }

    fn delete_all_records(&self) {
        self.lock().clear();
    }
}
