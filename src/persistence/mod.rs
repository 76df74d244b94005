use std::fmt;
use std::io;
use std::path::PathBuf;

use serde_json::Error as SerdeJsonError;

#[derive(Debug)]
pub enum PersistenceError {
    Io(io::Error),
    Serialization(SerdeJsonError),
    Csv(csv::Error),
    InvalidData(String),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Io(err) => write!(f, "io error: {err}"),
            PersistenceError::Serialization(err) => write!(f, "serialization error: {err}"),
            PersistenceError::Csv(err) => write!(f, "csv error: {err}"),
            PersistenceError::InvalidData(msg) => write!(f, "invalid data: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<io::Error> for PersistenceError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<SerdeJsonError> for PersistenceError {
    fn from(value: SerdeJsonError) -> Self {
        Self::Serialization(value)
    }
}

impl From<csv::Error> for PersistenceError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Outcome of a best-effort backup pass. One file failing never stops the
/// others; callers inspect `failed` to report, nothing is rolled back.
#[derive(Debug, Default)]
pub struct BackupReport {
    pub created: Vec<PathBuf>,
    pub failed: Vec<(String, PersistenceError)>,
}

impl BackupReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

pub mod export;
pub mod file;

pub use export::{
    export_subjects_to_csv, import_subjects_from_csv, load_snapshot_from_json,
    save_snapshot_to_json, PlannerSnapshot,
};
pub use file::FileAdapter;
