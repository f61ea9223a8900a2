//! Summarizer: turns a [`Dataset`] into a [`Summary`].
//!
//! Pure and deterministic. Map fields are [`IndexMap`]s so the same input
//! always serializes to the same JSON: numeric columns in their fixed order,
//! types in first-seen order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dataset::{CellValue, Dataset, Row};
use crate::error::{ReportError, Result};

pub const NAME_COLUMN: &str = "Equipment Name";
pub const TYPE_COLUMN: &str = "Type";
pub const NUMERIC_COLUMNS: [&str; 3] = ["Flowrate", "Pressure", "Temperature"];
pub const REQUIRED_COLUMNS: [&str; 5] = [
    NAME_COLUMN,
    TYPE_COLUMN,
    NUMERIC_COLUMNS[0],
    NUMERIC_COLUMNS[1],
    NUMERIC_COLUMNS[2],
];

/// Rows kept for display when the preview is derived from a dataset.
pub const SUMMARY_PREVIEW_ROWS: usize = 8;

/// Distribution key for rows whose `Type` cell is empty. Empty cells never
/// parse as text, so no literal type value maps here.
pub const MISSING_TYPE_KEY: &str = "";

/// Display name for [`MISSING_TYPE_KEY`].
pub const MISSING_TYPE_LABEL: &str = "(missing)";

/// Computed statistical digest of a dataset. `None` means "unavailable".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_count: usize,
    #[serde(default)]
    pub averages: IndexMap<String, Option<f64>>,
    #[serde(default)]
    pub type_distribution: IndexMap<String, usize>,
    #[serde(default)]
    pub per_type_averages: IndexMap<String, IndexMap<String, Option<f64>>>,
}

impl Summary {
    /// Number of distinct `Type` values.
    #[must_use]
    pub fn type_count(&self) -> usize {
        self.type_distribution.len()
    }

    /// Printable name of a distribution key. The missing-type key shows as
    /// [`MISSING_TYPE_LABEL`] unless a real type already uses that name.
    #[must_use]
    pub fn type_label<'a>(&self, key: &'a str) -> &'a str {
        if key == MISSING_TYPE_KEY && !self.type_distribution.contains_key(MISSING_TYPE_LABEL) {
            MISSING_TYPE_LABEL
        } else {
            key
        }
    }

    /// Columns that have per-type averages, in stored order.
    pub fn numeric_columns(&self) -> impl Iterator<Item = &str> {
        self.per_type_averages.keys().map(String::as_str)
    }

    /// Dataset-wide average for `column`; `None` if unknown or unavailable.
    #[must_use]
    pub fn average(&self, column: &str) -> Option<f64> {
        self.averages.get(column).copied().flatten()
    }
}

/// A summary plus the preview rows that travel alongside it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub summary: Summary,
    #[serde(default)]
    pub preview_rows: Vec<Row>,
}

/// Running mean over the non-missing values of one partition. Updated
/// incrementally so large finite values never overflow to infinity.
#[derive(Debug, Clone, Copy, Default)]
struct MeanAcc {
    mean: f64,
    count: usize,
}

impl MeanAcc {
    #[allow(clippy::cast_precision_loss)]
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.count += 1;
            let n = self.count as f64;
            self.mean += v / n - self.mean / n;
        }
    }

    fn mean(self) -> Option<f64> {
        (self.count > 0).then_some(self.mean)
    }
}

/// Reject datasets that lack any required column.
///
/// # Errors
/// Returns `ReportError::Schema` listing the required and found columns.
pub fn validate_columns(dataset: &Dataset) -> Result<()> {
    if REQUIRED_COLUMNS.iter().all(|c| dataset.has_column(c)) {
        return Ok(());
    }
    let mut required: Vec<String> = REQUIRED_COLUMNS.iter().map(ToString::to_string).collect();
    required.sort();
    Err(ReportError::Schema {
        required,
        found: dataset.columns().to_vec(),
    })
}

fn type_key(cell: &CellValue) -> String {
    match cell {
        CellValue::Missing => MISSING_TYPE_KEY.to_string(),
        other => other.to_string(),
    }
}

/// Compute the summary and preview for a dataset.
///
/// # Errors
/// Returns `ReportError::Schema` when a required column is absent.
pub fn summarize(dataset: &Dataset) -> Result<DatasetSummary> {
    validate_columns(dataset)?;

    let types: Vec<String> = dataset.column_values(TYPE_COLUMN).map(type_key).collect();

    let mut type_distribution: IndexMap<String, usize> = IndexMap::new();
    for key in &types {
        *type_distribution.entry(key.clone()).or_default() += 1;
    }

    let mut averages = IndexMap::new();
    let mut per_type_averages = IndexMap::new();
    for column in NUMERIC_COLUMNS {
        let mut overall = MeanAcc::default();
        let mut by_type: IndexMap<&str, MeanAcc> = type_distribution
            .keys()
            .map(|k| (k.as_str(), MeanAcc::default()))
            .collect();

        for (value, key) in dataset.column_values(column).zip(&types) {
            let value = value.as_f64();
            overall.push(value);
            if let Some(acc) = by_type.get_mut(key.as_str()) {
                acc.push(value);
            }
        }

        averages.insert(column.to_string(), overall.mean());
        per_type_averages.insert(
            column.to_string(),
            by_type
                .into_iter()
                .map(|(k, acc)| (k.to_string(), acc.mean()))
                .collect(),
        );
    }

    let summary = Summary {
        total_count: dataset.len(),
        averages,
        type_distribution,
        per_type_averages,
    };
    debug!(
        rows = summary.total_count,
        types = summary.type_count(),
        "summarized dataset"
    );

    Ok(DatasetSummary {
        summary,
        preview_rows: dataset.head(SUMMARY_PREVIEW_ROWS),
    })
}

/// Parse CSV bytes and summarize them.
///
/// # Errors
/// Returns `ReportError::Parse` for malformed input and `ReportError::Schema`
/// for missing columns.
pub fn summarize_csv(bytes: &[u8]) -> Result<DatasetSummary> {
    let dataset = Dataset::from_csv_bytes(bytes)?;
    summarize(&dataset)
}

#[cfg(test)]
#[path = "summary_tests.rs"]
mod tests;
