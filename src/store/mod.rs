//! Persistence for uploaded datasets and their summaries.
//!
//! A store keeps the raw upload bytes next to a JSON index of
//! [`DatasetRecord`]s and evicts old records per owner.

mod fs;
mod lock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};
use crate::summary::Summary;

pub use fs::{DEFAULT_RETENTION, FsDatasetStore, INDEX_VERSION, content_hash};
pub use lock::{DEFAULT_LOCK_TIMEOUT_MS, LockGuard, LockMode, atomic_write};

/// One stored upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRecord {
    pub id: u64,
    pub original_filename: String,
    /// Raw file location relative to the store root.
    pub raw_bytes_location: String,
    pub uploaded_at: DateTime<Utc>,
    #[serde(default)]
    pub owner: Option<String>,
    /// Lowercase hex SHA-256 of the raw bytes.
    pub content_hash: String,
    pub summary: Summary,
}

pub trait DatasetStore {
    /// Persist an upload and its summary, then apply the retention policy
    /// for `owner`.
    ///
    /// # Errors
    /// Returns an error if the raw file or the index cannot be written.
    fn insert(&self, filename: &str, owner: Option<&str>, raw: &[u8], summary: &Summary) -> Result<DatasetRecord>;

    /// # Errors
    /// Returns an error if the index cannot be read.
    fn get(&self, id: u64) -> Result<Option<DatasetRecord>>;

    /// Most recent records first. `None` lists every owner.
    ///
    /// # Errors
    /// Returns an error if the index cannot be read.
    fn recent(&self, owner: Option<&str>, limit: usize) -> Result<Vec<DatasetRecord>>;

    /// The raw upload bytes, checked against the recorded hash.
    ///
    /// # Errors
    /// Returns `ReportError::FileAccess` if the file is missing or altered.
    fn read_raw(&self, record: &DatasetRecord) -> Result<Vec<u8>>;

    /// Like [`get`](Self::get), but a missing id is an error.
    ///
    /// # Errors
    /// Returns `ReportError::DatasetNotFound` for unknown ids.
    fn require(&self, id: u64) -> Result<DatasetRecord> {
        self.get(id)?.ok_or(ReportError::DatasetNotFound(id))
    }
}
