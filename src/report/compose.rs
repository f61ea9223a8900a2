//! The report composer: request in, paginated PDF out.
//!
//! Charts are rendered up front, in parallel, each on its own canvas. The
//! layout pass then walks the sections in document order and never touches
//! the renderer, so a failed chart only changes what is printed in its slot.

use std::cmp::Reverse;

use chrono::{DateTime, Local};
use indexmap::{IndexMap, IndexSet};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::image::{DecodedImage, decode_png};
use super::layout::{
    BLOCK_GAP, HEADING_SIZE, Layout, LayoutEngine, PageGeometry, SectionKind, TABLE_SIZE, TITLE_SIZE, TextStyle,
    Tone,
};
use super::pdf::{DocumentInfo, write_pdf};
use super::request::{PreviewSource, ReportRequest};
use crate::chart::{ChartKind, ChartRenderError, ChartRenderer, ChartRequest, ChartSettings, ChartSize, Series};
use crate::error::{ReportError, Result};
use crate::summary::Summary;

pub const DEFAULT_TITLE: &str = "Chemical Equipment Report";

/// Shortest label limit that still fits one character plus `...`.
const MIN_LABEL_LEN: usize = 4;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Indent of lines inside a section.
const INDENT: f64 = 8.0;
/// Indent of nested list lines (averages).
const NESTED_INDENT: f64 = 20.0;
const SUBHEADING_SIZE: f64 = 11.0;

/// Presentation settings, loaded from the `[report]` config table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub title: String,
    /// Document author; the caller identity is used when unset.
    pub author: Option<String>,
    /// Page margin in points.
    pub margin: f64,
    /// Type chart height as a fraction of its width.
    pub type_chart_ratio: f64,
    /// Analysis chart height as a fraction of its width.
    pub analysis_chart_ratio: f64,
    /// Preview table columns beyond this are dropped.
    pub preview_columns: usize,
    pub chart: ChartSettings,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            author: None,
            margin: 72.0,
            type_chart_ratio: 0.45,
            analysis_chart_ratio: 0.40,
            preview_columns: 6,
            chart: ChartSettings::default(),
        }
    }
}

impl ReportSettings {
    /// # Errors
    /// Returns `ReportError::Config` naming the first invalid field.
    pub fn validate(&self) -> Result<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if PageGeometry::letter(self.margin).is_err() {
            return Err(ReportError::Config(format!(
                "report.margin {} leaves no room on a letter page",
                self.margin
            )));
        }
        if !positive(self.type_chart_ratio) {
            return Err(ReportError::Config("report.type_chart_ratio must be positive".to_string()));
        }
        if !positive(self.analysis_chart_ratio) {
            return Err(ReportError::Config(
                "report.analysis_chart_ratio must be positive".to_string(),
            ));
        }
        if self.preview_columns == 0 {
            return Err(ReportError::Config("report.preview_columns must be at least 1".to_string()));
        }
        if !positive(self.chart.scale) {
            return Err(ReportError::Config("report.chart.scale must be positive".to_string()));
        }
        if self.chart.label_max_len < MIN_LABEL_LEN {
            return Err(ReportError::Config(format!(
                "report.chart.label_max_len must be at least {MIN_LABEL_LEN}"
            )));
        }
        Ok(())
    }
}

/// Attribution printed under the title.
#[derive(Debug, Clone)]
pub struct ComposeContext {
    pub generated_by: String,
    pub generated_at: DateTime<Local>,
    /// Source dataset file name, for stored-dataset reports.
    pub source: Option<String>,
}

impl ComposeContext {
    #[must_use]
    pub fn new(generated_by: impl Into<String>) -> Self {
        Self {
            generated_by: generated_by.into(),
            generated_at: Local::now(),
            source: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn with_generated_at(mut self, at: DateTime<Local>) -> Self {
        self.generated_at = at;
        self
    }
}

/// A finished document.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub page_count: usize,
    pub sections: Vec<SectionKind>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ChartSlot {
    TypeDistribution,
    Analysis(String),
}

type ChartResult = std::result::Result<DecodedImage, ChartRenderError>;

/// Per-type averages for one column, ready to chart.
struct AnalysisSeries {
    series: Series,
    /// Types whose average is unavailable.
    missing: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Composer {
    settings: ReportSettings,
    renderer: ChartRenderer,
}

impl Composer {
    #[must_use]
    pub fn new(settings: ReportSettings) -> Self {
        let renderer = ChartRenderer::new(settings.chart.clone());
        Self { settings, renderer }
    }

    #[must_use]
    pub const fn settings(&self) -> &ReportSettings {
        &self.settings
    }

    /// Compose the request into PDF bytes.
    ///
    /// # Errors
    /// Returns `ReportError::Render` if the page geometry is unusable or the
    /// document cannot be written. Chart failures are not errors.
    pub fn compose(&self, request: &ReportRequest, context: &ComposeContext) -> Result<RenderedReport> {
        let title = self.title(request);
        let layout = self.layout(request, context)?;
        let info = DocumentInfo {
            title,
            author: self
                .settings
                .author
                .clone()
                .unwrap_or_else(|| context.generated_by.clone()),
            created: context.generated_at,
        };
        let bytes = write_pdf(&layout, &info).map_err(|e| ReportError::Render(e.to_string()))?;
        let report = RenderedReport {
            bytes,
            filename: request.filename(),
            page_count: layout.page_count(),
            sections: layout.sections,
        };
        info!(
            filename = %report.filename,
            pages = report.page_count,
            bytes = report.bytes.len(),
            "composed report"
        );
        Ok(report)
    }

    /// Lay out the request without serializing it.
    ///
    /// # Errors
    /// Returns `ReportError::Render` if the margins leave no content area.
    pub fn layout(&self, request: &ReportRequest, context: &ComposeContext) -> Result<Layout> {
        let geometry = PageGeometry::letter(self.settings.margin)?;
        let types = ordered_types(&request.summary);
        let mut charts = self.render_charts(request, &types, geometry.content_width());

        let mut engine = LayoutEngine::new(geometry);
        self.title_block(&mut engine, request, context);
        if request.include.summary {
            summary_block(&mut engine, &request.summary, &types);
        }
        if request.include.type_chart {
            self.type_chart_block(&mut engine, &request.summary, &mut charts);
        }
        if request.include.analysis.include {
            self.analysis_blocks(&mut engine, request, &types, &mut charts);
        }
        self.preview_block(&mut engine, request);
        Ok(engine.finish())
    }

    fn title(&self, request: &ReportRequest) -> String {
        request.title.clone().unwrap_or_else(|| match request.preview_source {
            PreviewSource::Derived => self.settings.title.clone(),
            PreviewSource::Supplied => format!("{} (Ad-hoc)", self.settings.title),
        })
    }

    fn render_charts(
        &self,
        request: &ReportRequest,
        types: &[&str],
        content_width: f64,
    ) -> IndexMap<ChartSlot, ChartResult> {
        let mut jobs = Vec::new();
        let summary = &request.summary;

        if request.include.type_chart && !summary.type_distribution.is_empty() {
            let chart = type_chart_request(summary, types, request.include.type_chart_type)
                .with_size(chart_size(content_width, self.settings.type_chart_ratio));
            jobs.push((ChartSlot::TypeDistribution, chart));
        }

        if request.include.analysis.include && !summary.per_type_averages.is_empty() {
            for column in request.analysis_columns() {
                let data = analysis_series(summary, &column, types);
                if data.series.is_empty() {
                    continue;
                }
                let kind = request.analysis_kind(&column);
                let chart = ChartRequest::new(format!("Average {column} by Type"), data.series, kind)
                    .with_size(chart_size(content_width, self.settings.analysis_chart_ratio))
                    .with_value_label(column.clone());
                jobs.push((ChartSlot::Analysis(column), chart));
            }
        }

        debug!(charts = jobs.len(), "rendering report charts");
        jobs.into_par_iter()
            .map(|(slot, chart)| {
                let image = self
                    .renderer
                    .try_render(&chart)
                    .and_then(|png| decode_png(&png));
                (slot, image)
            })
            .collect::<Vec<_>>()
            .into_iter()
            .collect()
    }

    fn title_block(&self, engine: &mut LayoutEngine, request: &ReportRequest, context: &ComposeContext) {
        engine.begin_section(SectionKind::Title);
        engine.line(&self.title(request), TextStyle::heading(TITLE_SIZE));
        let body = TextStyle::body();
        if let Some(source) = &context.source {
            engine.line(&format!("File: {source}"), body);
        }
        engine.line(&format!("Generated by: {}", context.generated_by), body);
        engine.line(
            &format!("Generated at: {}", context.generated_at.format(TIMESTAMP_FORMAT)),
            body,
        );
        engine.rule();
    }

    fn type_chart_block(
        &self,
        engine: &mut LayoutEngine,
        summary: &Summary,
        charts: &mut IndexMap<ChartSlot, ChartResult>,
    ) {
        engine.begin_section(SectionKind::TypeChart);
        match charts.shift_remove(&ChartSlot::TypeDistribution) {
            None => muted_line(engine, "Type distribution chart not available."),
            Some(Ok(image)) => chart_image(engine, image, self.settings.type_chart_ratio, 0.0),
            Some(Err(err)) => {
                warn!(error = %err, types = summary.type_count(), "type distribution chart failed");
                error_line(engine, "Failed to render type distribution chart.");
            }
        }
    }

    fn analysis_blocks(
        &self,
        engine: &mut LayoutEngine,
        request: &ReportRequest,
        types: &[&str],
        charts: &mut IndexMap<ChartSlot, ChartResult>,
    ) {
        let summary = &request.summary;
        let columns = request.analysis_columns();

        if summary.per_type_averages.is_empty() {
            for column in columns {
                engine.begin_section(SectionKind::Analysis(column));
            }
            engine.heading("Analysis", TextStyle::body().line_height());
            muted_line(engine, "Per-type averages not available for this dataset.");
            return;
        }

        let heading_height = TextStyle::heading(HEADING_SIZE).line_height();
        let width = engine.geometry().content_width();
        for column in columns {
            engine.begin_section(SectionKind::Analysis(column.clone()));
            let heading = format!("Analysis - {column}");
            match charts.shift_remove(&ChartSlot::Analysis(column.clone())) {
                None => {
                    engine.heading(&heading, TextStyle::body().line_height());
                    muted_line(engine, &format!("No per-type averages available for {column}."));
                }
                Some(Ok(image)) => {
                    let ratio = self.settings.analysis_chart_ratio;
                    let chart_height = engine.fit_height(width * ratio, heading_height);
                    engine.heading(&heading, chart_height);
                    chart_image(engine, image, ratio, heading_height);
                    let missing = analysis_series(summary, &column, types).missing;
                    if missing > 0 {
                        muted_line(engine, &format!("{missing} type(s) without data"));
                    }
                }
                Some(Err(err)) => {
                    warn!(column = %column, error = %err, "analysis chart failed");
                    engine.heading(&heading, TextStyle::body().line_height());
                    error_line(engine, &format!("Failed to draw analysis chart for {column}."));
                }
            }
        }
    }

    fn preview_block(&self, engine: &mut LayoutEngine, request: &ReportRequest) {
        let rows = request.preview();
        if rows.is_empty() {
            return;
        }
        let columns: Vec<String> = rows
            .iter()
            .flat_map(|row| row.keys().cloned())
            .collect::<IndexSet<_>>()
            .into_iter()
            .take(self.settings.preview_columns)
            .collect();
        let cells: Vec<Vec<String>> = rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|c| row.get(c).map(ToString::to_string).unwrap_or_default())
                    .collect()
            })
            .collect();

        engine.begin_section(SectionKind::Preview);
        let table_start = TextStyle::heading(TABLE_SIZE).line_height() * 2.0;
        engine.gap(BLOCK_GAP / 2.0);
        engine.heading(request.preview_source.heading(), table_start);
        engine.table(&columns, &cells);
    }
}

fn summary_block(engine: &mut LayoutEngine, summary: &Summary, types: &[&str]) {
    let body = TextStyle::body();
    engine.begin_section(SectionKind::Summary);
    engine.heading("Summary", body.line_height());
    engine.line_at(INDENT, &format!("Total equipment: {}", summary.total_count), body);
    engine.line_at(INDENT, "Averages:", body);
    for (column, average) in &summary.averages {
        let value = average.map_or_else(|| "N/A".to_string(), |v| format!("{v:.2}"));
        engine.line_at(NESTED_INDENT, &format!("{column}: {value}"), body);
    }

    engine.gap(BLOCK_GAP / 2.0);
    let subheading = TextStyle::heading(SUBHEADING_SIZE);
    engine.ensure_space(subheading.line_height() + body.line_height());
    engine.line("Type distribution", subheading);
    if types.is_empty() {
        engine.line_at(INDENT, "No equipment types recorded.", body.with_tone(Tone::Muted));
    }
    for t in types {
        engine.line_at(
            INDENT,
            &format!("{}: {}", summary.type_label(t), summary.type_distribution[*t]),
            body,
        );
    }
    engine.gap(BLOCK_GAP / 2.0);
}

fn chart_size(content_width: f64, ratio: f64) -> ChartSize {
    ChartSize::new(content_width, content_width * ratio)
}

/// Place a chart at the content width, shrunk so it fits on one page below
/// `reserved` points of other content.
fn chart_image(engine: &mut LayoutEngine, image: DecodedImage, ratio: f64, reserved: f64) {
    let width = engine.geometry().content_width();
    let height = engine.fit_height(width * ratio, reserved);
    let width = width.min(height / image.aspect_ratio().max(f64::EPSILON));
    engine.image(image, width, height);
}

fn muted_line(engine: &mut LayoutEngine, text: &str) {
    engine.line(text, TextStyle::body().with_tone(Tone::Muted));
}

fn error_line(engine: &mut LayoutEngine, text: &str) {
    engine.line(text, TextStyle::body().with_tone(Tone::Error));
}

/// The type-distribution chart. `hist` bins the available dataset-wide
/// averages and only falls back to the type counts when none exist.
fn type_chart_request(summary: &Summary, types: &[&str], kind: ChartKind) -> ChartRequest {
    let series: Series = types
        .iter()
        .map(|t| (summary.type_label(t).to_string(), count_value(summary.type_distribution[*t])))
        .collect();
    let averages: Vec<f64> = summary.averages.values().flatten().copied().collect();
    if kind == ChartKind::Hist && !averages.is_empty() {
        return ChartRequest::new("Histogram of average values", series, kind)
            .with_value_label("Value")
            .with_samples(averages);
    }
    ChartRequest::new(type_chart_title(kind), series, kind).with_value_label("Count")
}

const fn type_chart_title(kind: ChartKind) -> &'static str {
    match kind {
        ChartKind::Bar => "Count by Equipment Type",
        ChartKind::Pie => "Type Distribution (%)",
        ChartKind::Line => "Type counts",
        ChartKind::Hist => "Histogram of type counts",
    }
}

#[allow(clippy::cast_precision_loss)]
const fn count_value(count: usize) -> f64 {
    count as f64
}

/// Types by count, most frequent first; ties keep first-seen order.
fn ordered_types(summary: &Summary) -> Vec<&str> {
    let mut types: Vec<(&str, usize)> = summary
        .type_distribution
        .iter()
        .map(|(t, count)| (t.as_str(), *count))
        .collect();
    types.sort_by_key(|(_, count)| Reverse(*count));
    types.into_iter().map(|(t, _)| t).collect()
}

/// Available per-type averages for `column`, in type order. Types that only
/// appear in the averages follow in their stored order.
fn analysis_series(summary: &Summary, column: &str, types: &[&str]) -> AnalysisSeries {
    let Some(averages) = summary.per_type_averages.get(column) else {
        return AnalysisSeries {
            series: Series::new(),
            missing: 0,
        };
    };
    let order = types
        .iter()
        .copied()
        .chain(averages.keys().map(String::as_str))
        .collect::<IndexSet<&str>>();

    let mut series = Series::new();
    let mut missing = 0;
    for t in order {
        match averages.get(t) {
            Some(Some(value)) => {
                series.insert(summary.type_label(t).to_string(), *value);
            }
            Some(None) => missing += 1,
            None => {}
        }
    }
    AnalysisSeries { series, missing }
}

#[cfg(test)]
#[path = "compose_tests.rs"]
mod tests;
