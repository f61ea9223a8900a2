//! Tabular input: CSV bytes parsed into ordered rows of loosely typed cells.
//!
//! Header names are trimmed. Cell values are kept verbatim so that previews
//! show exactly what was uploaded; numeric coercion happens in the summarizer.

use std::fmt;

use csv::{ReaderBuilder, Trim};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};

/// A single cell: what a client payload or a CSV field can carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Missing,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Build a cell from a raw CSV field. Empty fields are missing.
    #[must_use]
    pub fn from_field(field: &str) -> Self {
        if field.is_empty() {
            Self::Missing
        } else {
            Self::Text(field.to_string())
        }
    }

    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Coerce to a finite float. Anything that is not a number is `None`.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
            Self::Missing | Self::Bool(_) => return None,
        };
        value.is_finite().then_some(value)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A row keyed by column name, in column order.
pub type Row = IndexMap<String, CellValue>;

/// An in-memory dataset: column names plus rows sharing that column set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Dataset {
    /// Parse delimited text with a header row.
    ///
    /// # Errors
    /// Returns `ReportError::Parse` when the bytes are not valid UTF-8 CSV,
    /// there is no header row, or a record has more fields than the header.
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::None)
            .from_reader(bytes);

        let headers = reader.headers()?.clone();
        if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
            return Err(ReportError::Parse {
                message: "no header row found".to_string(),
            });
        }
        let columns = dedupe_columns(headers.iter().map(str::trim));

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record?;
            if record.len() > columns.len() {
                // Header is line 1, so the first data record is line 2.
                let line = record.position().map_or(index as u64 + 2, csv::Position::line);
                return Err(ReportError::Parse {
                    message: format!(
                        "line {line}: expected {} fields, saw {}",
                        columns.len(),
                        record.len()
                    ),
                });
            }
            let mut cells: Vec<CellValue> = record.iter().map(CellValue::from_field).collect();
            cells.resize(columns.len(), CellValue::Missing);
            rows.push(cells);
        }

        Ok(Self { columns, rows })
    }

    /// Build a dataset from rows that are already structured, e.g. a client
    /// payload. Columns come from the first row; later rows missing a column
    /// get `Missing` and extra keys are ignored.
    #[must_use]
    pub fn from_rows(rows: &[Row]) -> Self {
        let columns = rows
            .first()
            .map(|row| dedupe_columns(row.keys().map(|k| k.trim())))
            .unwrap_or_default();
        let originals: Vec<&String> = rows.first().map(|r| r.keys().collect()).unwrap_or_default();

        let rows = rows
            .iter()
            .map(|row| {
                originals
                    .iter()
                    .map(|key| row.get(*key).cloned().unwrap_or(CellValue::Missing))
                    .collect()
            })
            .collect();
        Self { columns, rows }
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at `row` in the named column.
    #[must_use]
    pub fn cell(&self, row: usize, column: &str) -> Option<&CellValue> {
        let col = self.column_index(column)?;
        self.rows.get(row).and_then(|cells| cells.get(col))
    }

    /// All cells of one column, in row order.
    pub fn column_values(&self, column: &str) -> impl Iterator<Item = &CellValue> {
        let col = self.column_index(column);
        self.rows
            .iter()
            .filter_map(move |cells| col.and_then(|c| cells.get(c)))
    }

    /// The first `limit` rows as keyed rows, original values untouched.
    #[must_use]
    pub fn head(&self, limit: usize) -> Vec<Row> {
        self.rows
            .iter()
            .take(limit)
            .map(|cells| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(cells.iter().cloned())
                    .collect()
            })
            .collect()
    }
}

/// Trimmed header names with duplicates suffixed `.1`, `.2`, ...
fn dedupe_columns<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: IndexSet<String> = IndexSet::new();
    for name in names {
        if seen.contains(name) {
            let mut n = 1;
            while seen.contains(&format!("{name}.{n}")) {
                n += 1;
            }
            seen.insert(format!("{name}.{n}"));
        } else {
            seen.insert(name.to_string());
        }
    }
    seen.into_iter().collect()
}

#[cfg(test)]
#[path = "dataset_tests.rs"]
mod tests;
