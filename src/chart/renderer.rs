//! Chart requests and the renderer that turns them into PNG bytes.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::bars::{BarChart, HorizontalBarChart};
use super::builder::message_svg;
use super::data::DataPoint;
use super::element::SvgElement;
use super::format::truncate_label;
use super::histogram::ValueHistogram;
use super::line::LineChart;
use super::pie::PieChart;
use super::raster::{MINIMAL_PNG, fallback_frame, pixel_size, svg_to_png};
use super::style::{ChartColor, ERROR};
use super::ChartRenderError;

/// Category label to value, in presentation order.
pub type Series = IndexMap<String, f64>;

/// Supported chart types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Bar,
    Pie,
    Line,
    Hist,
}

impl ChartKind {
    pub const ALL: [Self; 4] = [Self::Bar, Self::Pie, Self::Line, Self::Hist];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Pie => "pie",
            Self::Line => "line",
            Self::Hist => "hist",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bar" => Ok(Self::Bar),
            "pie" => Ok(Self::Pie),
            "line" => Ok(Self::Line),
            "hist" | "histogram" => Ok(Self::Hist),
            _ => Err(format!("Unknown chart type: {s}")),
        }
    }
}

/// Logical chart size in pixels, before rasterization scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartSize {
    pub width: f64,
    pub height: f64,
}

impl ChartSize {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for ChartSize {
    fn default() -> Self {
        Self::new(640.0, 360.0)
    }
}

/// Renderer tuning, loaded from the `[report.chart]` config table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    /// Raster pixels per logical pixel.
    pub scale: f64,
    pub label_max_len: usize,
    /// Bar charts with at least this many categories are drawn horizontally.
    pub horizontal_bar_threshold: usize,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            scale: 2.0,
            label_max_len: 20,
            horizontal_bar_threshold: 8,
        }
    }
}

/// Everything needed to draw one chart.
#[derive(Debug, Clone, Default)]
pub struct ChartRequest {
    pub title: String,
    /// Measured quantity, used as the value axis title.
    pub value_label: Option<String>,
    pub series: Series,
    pub kind: ChartKind,
    pub size: ChartSize,
    /// Numeric sample for `hist`; the series values are used when absent.
    pub samples: Option<Vec<f64>>,
}

impl ChartRequest {
    #[must_use]
    pub fn new(title: impl Into<String>, series: Series, kind: ChartKind) -> Self {
        Self {
            title: title.into(),
            series,
            kind,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_size(mut self, size: ChartSize) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn with_value_label(mut self, label: impl Into<String>) -> Self {
        self.value_label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_samples(mut self, samples: Vec<f64>) -> Self {
        self.samples = Some(samples);
        self
    }

    fn validate(&self) -> Result<(), ChartRenderError> {
        if let Some((label, _)) = self.series.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ChartRenderError::InvalidValue { label: label.clone() });
        }
        if self
            .samples
            .as_ref()
            .is_some_and(|s| s.iter().any(|v| !v.is_finite()))
        {
            return Err(ChartRenderError::InvalidValue {
                label: "sample".to_string(),
            });
        }
        Ok(())
    }
}

/// Draws charts. Holds only settings; every call builds its own canvas.
#[derive(Debug, Clone, Default)]
pub struct ChartRenderer {
    settings: ChartSettings,
}

impl ChartRenderer {
    #[must_use]
    pub const fn new(settings: ChartSettings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub const fn settings(&self) -> &ChartSettings {
        &self.settings
    }

    /// Render to PNG, substituting an error placeholder for any failure.
    /// The result is never empty.
    #[must_use]
    pub fn render(&self, request: &ChartRequest) -> Vec<u8> {
        match self.try_render(request) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(chart = %request.title, kind = %request.kind, error = %err, "chart rendering failed, using placeholder");
                self.error_placeholder(request.size)
            }
        }
    }

    /// Render to PNG, reporting failures to the caller.
    ///
    /// # Errors
    /// Returns `ChartRenderError` for non-finite values or rasterization failures.
    pub fn try_render(&self, request: &ChartRequest) -> Result<Vec<u8>, ChartRenderError> {
        let svg = self.svg(request)?;
        let bytes = svg_to_png(&svg, request.size.width, request.size.height, self.settings.scale)?;
        debug!(chart = %request.title, kind = %request.kind, bytes = bytes.len(), "rendered chart");
        Ok(bytes)
    }

    /// Build the SVG document for a request.
    ///
    /// # Errors
    /// Returns `ChartRenderError::InvalidValue` for NaN or infinite inputs.
    pub fn svg(&self, request: &ChartRequest) -> Result<String, ChartRenderError> {
        request.validate()?;
        let ChartSize { width, height } = request.size;
        let title = request.title.as_str();

        let points: Vec<DataPoint> = request
            .series
            .iter()
            .map(|(label, value)| DataPoint::new(truncate_label(label, self.settings.label_max_len), *value))
            .collect();
        let value_label = request.value_label.clone();

        let svg = match request.kind {
            ChartKind::Hist => {
                let samples = request
                    .samples
                    .clone()
                    .unwrap_or_else(|| request.series.values().copied().collect());
                ValueHistogram::from_samples(title, &samples)
                    .with_size(width, height)
                    .with_value_label(value_label)
                    .render()
            }
            _ if points.is_empty() => no_data_svg(title, request.size),
            ChartKind::Bar if points.len() >= self.settings.horizontal_bar_threshold => {
                HorizontalBarChart::new(title, points)
                    .with_size(width, height)
                    .with_value_label(value_label)
                    .render()
            }
            ChartKind::Bar => BarChart::new(title, points)
                .with_size(width, height)
                .with_value_label(value_label)
                .render(),
            ChartKind::Line => LineChart::new(title, points)
                .with_size(width, height)
                .with_value_label(value_label)
                .render(),
            ChartKind::Pie => PieChart::new(title, points).with_size(width, height).render(),
        };
        Ok(svg)
    }

    /// A framed message image, e.g. "No data". Never empty.
    #[must_use]
    pub fn placeholder(&self, message: &str, size: ChartSize) -> Vec<u8> {
        self.message_png(message, size, &ChartColor::muted())
    }

    fn error_placeholder(&self, size: ChartSize) -> Vec<u8> {
        self.message_png("Chart unavailable", size, &ChartColor::hex(ERROR))
    }

    fn message_png(&self, message: &str, size: ChartSize, tone: &ChartColor) -> Vec<u8> {
        let svg = message_svg("", message, size.width, size.height, tone);
        svg_to_png(&svg, size.width, size.height, self.settings.scale)
            .or_else(|err| {
                warn!(error = %err, "placeholder rasterization failed, drawing bare frame");
                let (w, h) = pixel_size(size.width, size.height, self.settings.scale);
                fallback_frame(w, h)
            })
            .unwrap_or_else(|_| MINIMAL_PNG.to_vec())
    }
}

fn no_data_svg(title: &str, size: ChartSize) -> String {
    message_svg(title, "No data", size.width, size.height, &ChartColor::muted())
}

/// Render `series` with default settings. Never fails and never returns
/// an empty buffer.
#[must_use]
pub fn render(series: &Series, kind: ChartKind, size: ChartSize) -> Vec<u8> {
    ChartRenderer::default().render(&ChartRequest::new("", series.clone(), kind).with_size(size))
}

#[cfg(test)]
#[path = "renderer_tests.rs"]
mod tests;
