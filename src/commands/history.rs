use std::fmt::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{CommandContext, report_failure};
use crate::EXIT_SUCCESS;
use crate::cli::{Cli, HistoryArgs, OutputFormat};
use crate::error::Result;
use crate::store::{DatasetRecord, DatasetStore};
use crate::summary::Summary;

/// One line of upload history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub id: u64,
    pub original_filename: String,
    pub uploaded_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    pub summary: Summary,
}

impl From<DatasetRecord> for HistoryEntry {
    fn from(record: DatasetRecord) -> Self {
        Self {
            id: record.id,
            original_filename: record.original_filename,
            uploaded_at: record.uploaded_at,
            owner: record.owner,
            summary: record.summary,
        }
    }
}

#[must_use]
pub fn run_history(args: &HistoryArgs, cli: &Cli) -> i32 {
    match CommandContext::from_cli(cli).and_then(|ctx| run_history_impl(args, &ctx)) {
        Ok(_) => EXIT_SUCCESS,
        Err(e) => report_failure(&e),
    }
}

/// List the most recent uploads, newest first.
///
/// # Errors
/// Returns an error if the store index cannot be read.
pub fn run_history_impl(args: &HistoryArgs, ctx: &CommandContext) -> Result<Vec<HistoryEntry>> {
    let entries: Vec<HistoryEntry> = ctx
        .store()
        .recent(args.owner.as_deref(), args.limit)?
        .into_iter()
        .map(HistoryEntry::from)
        .collect();

    match args.format {
        OutputFormat::Text => print!("{}", format_history_text(&entries)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
    }
    Ok(entries)
}

#[must_use]
pub fn format_history_text(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No datasets stored.\n".to_string();
    }
    let mut out = String::new();
    for entry in entries {
        let _ = writeln!(
            out,
            "{:>4}  {}  {}  ({} items, {} types)",
            entry.id,
            entry.uploaded_at.format("%Y-%m-%d %H:%M:%S"),
            entry.original_filename,
            entry.summary.total_count,
            entry.summary.type_count()
        );
    }
    out
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
