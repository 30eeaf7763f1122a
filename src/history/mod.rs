//! Persistent log of completed computations.
//!
//! The calculator only talks to the [`HistoryStore`] trait. Storage failures
//! never reach the caller of a trait method: implementations log them and
//! carry on, so a broken database can't take down an evaluation.

mod memory;
mod record;
mod sqlite;

pub use memory::MemoryHistory;
pub use record::{HistoryRecord, MAX_FIELD_CHARS, truncate_field};
pub use sqlite::{HistoryError, SqliteHistory};

use rust_decimal::Decimal;

/// Storage boundary for history records.
pub trait HistoryStore {
    /// Prepare storage. Safe to call on every start.
    fn create_table(&self);

    /// Append one record for a finished evaluation.
    fn insert_record(&self, equation: &str, result: Decimal);

    /// Up to `limit` records, most recent first.
    fn get_last_records(&self, limit: usize) -> Vec<HistoryRecord>;

    /// Remove every record. Safe on an empty store.
    fn delete_all_records(&self);
}

impl<S: HistoryStore + ?Sized> HistoryStore for Box<S> {
    fn create_table(&self) {
        (**self).create_table();
    }

    fn insert_record(&self, equation: &str, result: Decimal) {
        (**self).insert_record(equation, result);
    }

    fn get_last_records(&self, limit: usize) -> Vec<HistoryRecord> {
        (**self).get_last_records(limit)
    }

    fn delete_all_records(&self) {
        (**self).delete_all_records();
    }
}
