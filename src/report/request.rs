//! What a caller asks the composer for: a summary plus presentation options.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::chart::ChartKind;
use crate::dataset::Row;
use crate::error::{ReportError, Result};
use crate::summary::{DatasetSummary, NUMERIC_COLUMNS, SUMMARY_PREVIEW_ROWS, Summary};

pub const DEFAULT_FILENAME: &str = "report.pdf";
pub const DEFAULT_ANALYSIS_PARAMETER: &str = "Flowrate";

/// Rows kept when the client supplies its own preview.
pub const SUPPLIED_PREVIEW_ROWS: usize = 10;

/// `null` and a missing field both mean "use the default".
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Where the preview rows came from. Decides the row cap and the heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreviewSource {
    /// First rows of a stored dataset.
    Derived,
    /// Rows sent by the client with the request.
    #[default]
    Supplied,
}

impl PreviewSource {
    #[must_use]
    pub const fn row_cap(self) -> usize {
        match self {
            Self::Derived => SUMMARY_PREVIEW_ROWS,
            Self::Supplied => SUPPLIED_PREVIEW_ROWS,
        }
    }

    #[must_use]
    pub const fn heading(self) -> &'static str {
        match self {
            Self::Derived => "Preview (first rows)",
            Self::Supplied => "Preview (provided rows)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    /// Only `AnalysisOptions::parameter`.
    #[default]
    Single,
    /// Every numeric column with per-type averages.
    All,
}

/// Per-type average charts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    pub include: bool,
    pub mode: AnalysisMode,
    pub parameter: String,
    pub chart_type: ChartKind,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            include: false,
            mode: AnalysisMode::Single,
            parameter: DEFAULT_ANALYSIS_PARAMETER.to_string(),
            chart_type: ChartKind::Bar,
        }
    }
}

/// Section toggles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncludeOptions {
    pub summary: bool,
    pub type_chart: bool,
    #[serde(alias = "chart_type")]
    pub type_chart_type: ChartKind,
    #[serde(deserialize_with = "null_as_default")]
    pub analysis: AnalysisOptions,
    pub preview_rows: bool,
}

impl Default for IncludeOptions {
    fn default() -> Self {
        Self {
            summary: true,
            type_chart: true,
            type_chart_type: ChartKind::Bar,
            analysis: AnalysisOptions::default(),
            preview_rows: true,
        }
    }
}

/// Input to [`Composer::compose`](super::Composer::compose).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: Summary,
    #[serde(default)]
    pub preview_rows: Option<Vec<Row>>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub include: IncludeOptions,
    #[serde(default, deserialize_with = "null_as_default")]
    pub analysis_chart_types: IndexMap<String, ChartKind>,
    #[serde(skip)]
    pub preview_source: PreviewSource,
}

impl ReportRequest {
    /// A request with default options for `summary`.
    #[must_use]
    pub fn new(summary: Summary) -> Self {
        Self {
            summary,
            ..Self::default()
        }
    }

    /// Parse a client payload.
    ///
    /// # Errors
    /// Returns `ReportError::Parse` if the payload is not a valid request,
    /// including unknown chart types.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| ReportError::Parse {
            message: format!("invalid report request: {e}"),
        })
    }

    /// The full report for a stored dataset: every section, all analysis
    /// columns, preview from the dataset's first rows.
    #[must_use]
    pub fn for_dataset(dataset: DatasetSummary, type_chart_type: ChartKind) -> Self {
        Self {
            summary: dataset.summary,
            preview_rows: Some(dataset.preview_rows),
            include: IncludeOptions {
                type_chart_type,
                analysis: AnalysisOptions {
                    include: true,
                    mode: AnalysisMode::All,
                    ..AnalysisOptions::default()
                },
                ..IncludeOptions::default()
            },
            preview_source: PreviewSource::Derived,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Suggested attachment name: the requested name stripped of any path
    /// and unsafe characters, always ending in `.pdf`.
    #[must_use]
    pub fn filename(&self) -> String {
        self.filename
            .as_deref()
            .map_or_else(|| DEFAULT_FILENAME.to_string(), sanitize_filename)
    }

    /// Preview rows, capped for the preview source. Empty when the section
    /// is switched off.
    #[must_use]
    pub fn preview(&self) -> &[Row] {
        if !self.include.preview_rows {
            return &[];
        }
        let rows = self.preview_rows.as_deref().unwrap_or_default();
        &rows[..rows.len().min(self.preview_source.row_cap())]
    }

    /// Columns that get an analysis chart, in drawing order.
    #[must_use]
    pub fn analysis_columns(&self) -> Vec<String> {
        match self.include.analysis.mode {
            AnalysisMode::Single => vec![self.include.analysis.parameter.clone()],
            AnalysisMode::All => {
                let stored: Vec<String> = self.summary.numeric_columns().map(str::to_string).collect();
                if stored.is_empty() {
                    NUMERIC_COLUMNS.iter().map(|c| (*c).to_string()).collect()
                } else {
                    stored
                }
            }
        }
    }

    /// Chart type for one analysis column: a per-column override, else the
    /// analysis default.
    #[must_use]
    pub fn analysis_kind(&self, column: &str) -> ChartKind {
        self.analysis_chart_types
            .get(column)
            .copied()
            .unwrap_or(self.include.analysis.chart_type)
    }
}

/// Keep the last path segment, replace anything outside `[A-Za-z0-9._-]`
/// and force a `.pdf` extension.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        return DEFAULT_FILENAME.to_string();
    }
    if cleaned.to_ascii_lowercase().ends_with(".pdf") {
        cleaned.to_string()
    } else {
        format!("{cleaned}.pdf")
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
