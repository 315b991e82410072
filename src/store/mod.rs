//! Durable, append-only storage of submitted tax records.
//!
//! Lookups (`is_registered`, `next_id`) go through the [`RecordStore`] trait so
//! the flat-file scan in [`CsvRecordStore`] can be swapped for an indexed backend.

pub mod csv;

pub use self::csv::CsvRecordStore;

use crate::core::Record;
use std::io;
use std::path::PathBuf;

/// A raw row of the store, header included, exactly as read back
pub type Row = Vec<String>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("cannot access record store {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot read record store {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: ::csv::Error,
    },
    #[error("record store {} is locked by another writer", path.display())]
    Locked { path: PathBuf },
    #[error("user id {0} is already registered")]
    DuplicateId(String),
}

pub trait RecordStore {
    /// Whether the backing store has been created yet
    fn exists(&self) -> bool;

    /// Whether any stored record has exactly this id. A missing store has no ids.
    fn is_registered(&self, id: &str) -> Result<bool, StoreError>;

    /// The id the next new user should receive: one past the highest generated id
    fn next_id(&self) -> Result<String, StoreError>;

    /// Appends a single record, creating the store (with its header) if needed.
    ///
    /// Fails with [`StoreError::DuplicateId`] if the id is already present.
    fn append(&self, record: &Record) -> Result<(), StoreError>;

    /// Every row in file order, header first. Empty if the store does not exist.
    fn read_all(&self) -> Result<Vec<Row>, StoreError>;
}
