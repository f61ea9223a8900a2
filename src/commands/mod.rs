//! Subcommand implementations.
//!
//! Each command exposes `run_<name>` returning a process exit code and
//! `run_<name>_impl` returning a `Result` for tests and embedding.

pub mod compose;
pub mod context;
pub mod history;
pub mod init;
pub mod report;
pub mod show;
pub mod summarize;
pub mod upload;

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::dataset::{Dataset, Row};
use crate::error::{ReportError, Result};
use crate::exit_code;
use crate::store::{DatasetRecord, DatasetStore, atomic_write};
use crate::summary::{SUMMARY_PREVIEW_ROWS, Summary};

pub use compose::{run_compose, run_compose_impl};
pub use context::{CommandContext, DEFAULT_USER, generated_by};
pub use history::{HistoryEntry, format_history_text, run_history, run_history_impl};
pub use init::{run_init, run_init_impl};
pub use report::{report_filename, run_report, run_report_impl};
pub use show::{run_show, run_show_impl};
pub use summarize::{run_summarize, run_summarize_impl};
pub use upload::{run_upload, run_upload_impl};

/// A stored dataset as printed by `upload` and `show`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetView {
    pub id: u64,
    pub original_filename: String,
    pub uploaded_at: DateTime<Utc>,
    pub summary: Summary,
    pub preview_rows: Vec<Row>,
}

impl DatasetView {
    #[must_use]
    pub fn new(record: DatasetRecord, preview_rows: Vec<Row>) -> Self {
        Self {
            id: record.id,
            original_filename: record.original_filename,
            uploaded_at: record.uploaded_at,
            summary: record.summary,
            preview_rows,
        }
    }
}

/// Print `err` with its suggestion and map it to an exit code.
pub(crate) fn report_failure(err: &ReportError) -> i32 {
    eprintln!("Error: {err}");
    if let Some(detail) = err.detail() {
        eprintln!("  {detail}");
    }
    if let Some(hint) = err.suggestion() {
        eprintln!("  Hint: {hint}");
    }
    exit_code(err)
}

/// Read a file, or stdin for `-`.
pub(crate) fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        return Ok(buf);
    }
    fs::read(path).map_err(|source| ReportError::FileAccess {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn write_output(path: &Path, data: &[u8]) -> Result<()> {
    atomic_write(path, data).map_err(|source| ReportError::FileAccess {
        path: path.to_path_buf(),
        source,
    })
}

/// First rows of the stored upload. A missing or unreadable file yields an
/// empty preview; the summary alone is still usable.
pub(crate) fn stored_preview(store: &impl DatasetStore, record: &DatasetRecord) -> Vec<Row> {
    let preview = store
        .read_raw(record)
        .and_then(|raw| Dataset::from_csv_bytes(&raw))
        .map(|dataset| dataset.head(SUMMARY_PREVIEW_ROWS));
    match preview {
        Ok(rows) => rows,
        Err(e) => {
            warn!(id = record.id, error = %e, "stored upload unavailable, preview omitted");
            Vec::new()
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
