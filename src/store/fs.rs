//! Directory-backed dataset store.
//!
//! Layout under the root:
//! - `index.json`: versioned list of records
//! - `raw/<id>.csv`: uploaded bytes
//! - `index.lock`: advisory lock serializing writers

use std::cmp::Reverse;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use super::lock::{DEFAULT_LOCK_TIMEOUT_MS, LockGuard, LockMode, atomic_write};
use super::{DatasetRecord, DatasetStore};
use crate::error::{ReportError, Result};
use crate::summary::Summary;

pub const INDEX_VERSION: u32 = 1;
/// Records kept per owner.
pub const DEFAULT_RETENTION: usize = 5;

const INDEX_FILENAME: &str = "index.json";
const LOCK_FILENAME: &str = "index.lock";
const RAW_DIR: &str = "raw";

#[derive(Debug, Serialize, Deserialize)]
struct Index {
    version: u32,
    next_id: u64,
    records: Vec<DatasetRecord>,
}

impl Default for Index {
    fn default() -> Self {
        Self {
            version: INDEX_VERSION,
            next_id: 1,
            records: Vec::new(),
        }
    }
}

/// Stores datasets in a directory. Safe to share between processes.
#[derive(Debug, Clone)]
pub struct FsDatasetStore {
    root: PathBuf,
    retention: usize,
    lock_timeout_ms: u64,
}

impl FsDatasetStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            retention: DEFAULT_RETENTION,
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
        }
    }

    /// Keep at most `retention` records per owner (at least one).
    #[must_use]
    pub fn with_retention(mut self, retention: usize) -> Self {
        self.retention = retention.max(1);
        self
    }

    #[must_use]
    pub const fn with_lock_timeout(mut self, timeout_ms: u64) -> Self {
        self.lock_timeout_ms = timeout_ms;
        self
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub const fn retention(&self) -> usize {
        self.retention
    }

    fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILENAME)
    }

    fn file_error(path: &Path) -> impl FnOnce(io::Error) -> ReportError + '_ {
        move |source| ReportError::FileAccess {
            path: path.to_path_buf(),
            source,
        }
    }

    fn lock(&self, mode: LockMode) -> Result<LockGuard> {
        fs::create_dir_all(&self.root).map_err(Self::file_error(&self.root))?;
        let path = self.root.join(LOCK_FILENAME);
        LockGuard::acquire(&path, mode, self.lock_timeout_ms).map_err(Self::file_error(&path))
    }

    fn load_index(&self) -> Result<Index> {
        let path = self.index_path();
        let content = match fs::read(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Index::default()),
            Err(e) => return Err(Self::file_error(&path)(e)),
        };
        let index: Index = serde_json::from_slice(&content)?;
        if index.version != INDEX_VERSION {
            return Err(ReportError::Config(format!(
                "unsupported store index version {} in {} (expected {INDEX_VERSION})",
                index.version,
                path.display()
            )));
        }
        Ok(index)
    }

    fn save_index(&self, index: &Index) -> Result<()> {
        let path = self.index_path();
        let json = serde_json::to_vec_pretty(index)?;
        atomic_write(&path, &json).map_err(Self::file_error(&path))
    }

    /// Drop all but the newest `retention` records of `owner`. Returns the
    /// evicted records.
    fn evict(&self, index: &mut Index, owner: Option<&str>) -> Vec<DatasetRecord> {
        let mut owned: Vec<&DatasetRecord> = index
            .records
            .iter()
            .filter(|r| r.owner.as_deref() == owner)
            .collect();
        owned.sort_by_key(|r| Reverse((r.uploaded_at, r.id)));
        let evicted: HashSet<u64> = owned.iter().skip(self.retention).map(|r| r.id).collect();
        if evicted.is_empty() {
            return Vec::new();
        }
        let (gone, kept): (Vec<_>, Vec<_>) = index.records.drain(..).partition(|r| evicted.contains(&r.id));
        index.records = kept;
        gone
    }

    fn remove_raw(&self, record: &DatasetRecord) {
        let path = self.root.join(&record.raw_bytes_location);
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "failed to delete evicted upload"),
        }
    }
}

/// Lowercase hex SHA-256.
#[must_use]
pub fn content_hash(bytes: &[u8]) -> String {
    Sha256::digest(bytes).iter().map(|b| format!("{b:02x}")).collect()
}

impl DatasetStore for FsDatasetStore {
    fn insert(&self, filename: &str, owner: Option<&str>, raw: &[u8], summary: &Summary) -> Result<DatasetRecord> {
        let _guard = self.lock(LockMode::Exclusive)?;
        let mut index = self.load_index()?;

        let id = index.next_id;
        let location = format!("{RAW_DIR}/{id}.csv");
        let raw_dir = self.root.join(RAW_DIR);
        fs::create_dir_all(&raw_dir).map_err(Self::file_error(&raw_dir))?;
        let raw_path = self.root.join(&location);
        atomic_write(&raw_path, raw).map_err(Self::file_error(&raw_path))?;

        let record = DatasetRecord {
            id,
            original_filename: filename.to_string(),
            raw_bytes_location: location,
            uploaded_at: Utc::now(),
            owner: owner.map(str::to_string),
            content_hash: content_hash(raw),
            summary: summary.clone(),
        };
        index.next_id = id + 1;
        index.records.push(record.clone());
        let evicted = self.evict(&mut index, owner);

        if let Err(e) = self.save_index(&index) {
            self.remove_raw(&record);
            return Err(e);
        }
        for old in &evicted {
            self.remove_raw(old);
        }
        info!(id, filename, evicted = evicted.len(), "stored dataset");
        Ok(record)
    }

    fn get(&self, id: u64) -> Result<Option<DatasetRecord>> {
        let _guard = self.lock(LockMode::Shared)?;
        let index = self.load_index()?;
        Ok(index.records.into_iter().find(|r| r.id == id))
    }

    fn recent(&self, owner: Option<&str>, limit: usize) -> Result<Vec<DatasetRecord>> {
        let _guard = self.lock(LockMode::Shared)?;
        let mut records: Vec<DatasetRecord> = self
            .load_index()?
            .records
            .into_iter()
            .filter(|r| owner.is_none() || r.owner.as_deref() == owner)
            .collect();
        records.sort_by_key(|r| Reverse((r.uploaded_at, r.id)));
        records.truncate(limit);
        debug!(count = records.len(), "listed datasets");
        Ok(records)
    }

    fn read_raw(&self, record: &DatasetRecord) -> Result<Vec<u8>> {
        let path = self.root.join(&record.raw_bytes_location);
        let bytes = fs::read(&path).map_err(Self::file_error(&path))?;
        if content_hash(&bytes) != record.content_hash {
            return Err(ReportError::FileAccess {
                path,
                source: io::Error::new(io::ErrorKind::InvalidData, "content hash mismatch"),
            });
        }
        Ok(bytes)
    }
}

#[cfg(test)]
#[path = "fs_tests.rs"]
mod tests;
