//! Vertical and horizontal bar charts.

use std::fmt::Write;

use super::builder::{PlotArea, SvgBuilder, TITLE_BAND, message_svg};
use super::data::DataPoint;
use super::element::{Axis, Bar, Label, SvgElement};
use super::format::format_value;
use super::scale::ValueScale;
use super::style::{ChartColor, TEXT_MUTED, TextAnchor};

/// Categories beyond which vertical bar labels are rotated.
const ROTATE_LABELS_AFTER: usize = 5;

/// Value axis with ticks and grid lines across the plot.
pub(super) fn value_axis(area: &PlotArea, scale: &ValueScale) -> Axis {
    Axis::vertical(area.left, area.bottom(), area.height)
        .with_labels(tick_labels(scale))
        .with_grid(area.width)
}

pub(super) fn tick_labels(scale: &ValueScale) -> Vec<(f64, String)> {
    scale
        .ticks()
        .into_iter()
        .map(|t| (scale.fraction(t), format_value(t)))
        .collect()
}

/// Rotated axis title along the left edge.
pub(super) fn value_title(area: &PlotArea, text: &str) -> Label {
    Label::new(14.0, area.top + area.height / 2.0, text)
        .with_anchor(TextAnchor::Middle)
        .with_size(11.0)
        .with_color(ChartColor::muted())
        .rotated(-90.0)
}

/// Labels centered under each category slot.
pub(super) fn category_labels(area: &PlotArea, centers: &[f64], labels: &[&str]) -> String {
    let rotate = labels.len() > ROTATE_LABELS_AFTER;
    let mut output = String::new();
    for (x, text) in centers.iter().zip(labels) {
        let label = if rotate {
            Label::new(*x, area.bottom() + 14.0, *text)
                .with_anchor(TextAnchor::End)
                .rotated(-35.0)
        } else {
            Label::new(*x, area.bottom() + 16.0, *text).with_anchor(TextAnchor::Middle)
        };
        let _ = writeln!(output, "{}", label.with_color(ChartColor::muted()).render());
    }
    output
}

pub(super) fn category_bottom_margin(count: usize) -> f64 {
    if count > ROTATE_LABELS_AFTER { 84.0 } else { 36.0 }
}

fn zero_line(x1: f64, y1: f64, x2: f64, y2: f64) -> String {
    format!(r#"<line x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" stroke="{TEXT_MUTED}" stroke-width="1"/>"#)
}

/// Vertical bar chart. The value axis always includes zero, so negative
/// values hang below the baseline.
#[derive(Debug)]
pub struct BarChart {
    pub title: String,
    pub value_label: Option<String>,
    pub data: Vec<DataPoint>,
    pub width: f64,
    pub height: f64,
    pub bar_color: ChartColor,
    pub show_values: bool,
}

impl Default for BarChart {
    fn default() -> Self {
        Self {
            title: String::new(),
            value_label: None,
            data: Vec::new(),
            width: 640.0,
            height: 360.0,
            bar_color: ChartColor::primary(),
            show_values: true,
        }
    }
}

impl BarChart {
    #[must_use]
    pub fn new(title: impl Into<String>, data: Vec<DataPoint>) -> Self {
        Self {
            title: title.into(),
            data,
            ..Default::default()
        }
    }

    #[must_use]
    pub const fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[must_use]
    pub fn with_value_label(mut self, label: Option<String>) -> Self {
        self.value_label = label;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: ChartColor) -> Self {
        self.bar_color = color;
        self
    }
}

impl SvgElement for BarChart {
    #[allow(clippy::cast_precision_loss)]
    fn render(&self) -> String {
        if self.data.is_empty() {
            return message_svg(&self.title, "No data", self.width, self.height, &ChartColor::muted());
        }

        let count = self.data.len();
        let area = PlotArea::inset(
            self.width,
            self.height,
            64.0,
            16.0,
            TITLE_BAND + 8.0,
            category_bottom_margin(count),
        );
        let scale = ValueScale::including_zero(self.data.iter().map(|d| d.value));
        let baseline = area.y_at(scale.fraction(0.0));

        let mut svg = SvgBuilder::chart(&self.title, self.width, self.height)
            .push_element(&value_axis(&area, &scale));
        if let Some(label) = &self.value_label {
            svg = svg.push_element(&value_title(&area, label));
        }

        let slot = area.width / count as f64;
        let bar_width = slot * 0.7;
        let mut centers = Vec::with_capacity(count);
        for (i, point) in self.data.iter().enumerate() {
            let x = slot.mul_add(i as f64, area.left) + (slot - bar_width) / 2.0;
            let value_y = area.y_at(scale.fraction(point.value));
            let top = value_y.min(baseline);
            let height = (value_y - baseline).abs();

            svg = svg.push_element(&Bar {
                x,
                y: top,
                width: bar_width,
                height,
                color: point.color.clone().unwrap_or_else(|| self.bar_color.clone()),
            });

            let center = x + bar_width / 2.0;
            centers.push(center);
            if self.show_values {
                let text_y = if point.value < 0.0 { top + height + 12.0 } else { top - 4.0 };
                svg = svg.push_element(
                    &Label::new(center, text_y, format_value(point.value))
                        .with_anchor(TextAnchor::Middle)
                        .with_size(9.0),
                );
            }
        }

        let labels: Vec<&str> = self.data.iter().map(|d| d.label.as_str()).collect();
        svg.push_raw(zero_line(area.left, baseline, area.right(), baseline))
            .push_raw(category_labels(&area, &centers, &labels))
            .build()
    }
}

/// Horizontal bar chart, used when there are too many categories for
/// legible labels under vertical bars.
#[derive(Debug)]
pub struct HorizontalBarChart {
    pub title: String,
    pub value_label: Option<String>,
    pub data: Vec<DataPoint>,
    pub width: f64,
    pub height: f64,
    pub bar_color: ChartColor,
    pub show_values: bool,
}

impl Default for HorizontalBarChart {
    fn default() -> Self {
        Self {
            title: String::new(),
            value_label: None,
            data: Vec::new(),
            width: 640.0,
            height: 360.0,
            bar_color: ChartColor::primary(),
            show_values: true,
        }
    }
}

impl HorizontalBarChart {
    #[must_use]
    pub fn new(title: impl Into<String>, data: Vec<DataPoint>) -> Self {
        Self {
            title: title.into(),
            data,
            ..Default::default()
        }
    }

    #[must_use]
    pub const fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[must_use]
    pub fn with_value_label(mut self, label: Option<String>) -> Self {
        self.value_label = label;
        self
    }
}

impl SvgElement for HorizontalBarChart {
    #[allow(clippy::cast_precision_loss)]
    fn render(&self) -> String {
        if self.data.is_empty() {
            return message_svg(&self.title, "No data", self.width, self.height, &ChartColor::muted());
        }

        let bottom = if self.value_label.is_some() { 48.0 } else { 32.0 };
        let area = PlotArea::inset(self.width, self.height, 136.0, 48.0, TITLE_BAND + 6.0, bottom);
        let scale = ValueScale::including_zero(self.data.iter().map(|d| d.value));
        let baseline = area.x_at(scale.fraction(0.0));

        let band = area.height / self.data.len() as f64;
        let bar_height = band * 0.7;
        let font_size = (band * 0.8).clamp(6.0, 11.0);

        let mut svg = SvgBuilder::chart(&self.title, self.width, self.height).push_element(
            &Axis::horizontal(area.left, area.bottom(), area.width)
                .with_labels(tick_labels(&scale))
                .with_grid(area.height),
        );
        if let Some(label) = &self.value_label {
            svg = svg.push_element(
                &Label::new(area.left + area.width / 2.0, self.height - 8.0, label.as_str())
                    .with_anchor(TextAnchor::Middle)
                    .with_size(11.0)
                    .with_color(ChartColor::muted()),
            );
        }

        for (i, point) in self.data.iter().enumerate() {
            let y = band.mul_add(i as f64, area.top) + (band - bar_height) / 2.0;
            let value_x = area.x_at(scale.fraction(point.value));
            let left = value_x.min(baseline);
            let width = (value_x - baseline).abs();
            let middle = y + bar_height / 2.0 + font_size / 3.0;

            svg = svg
                .push_element(&Bar {
                    x: left,
                    y,
                    width,
                    height: bar_height,
                    color: point.color.clone().unwrap_or_else(|| self.bar_color.clone()),
                })
                .push_element(
                    &Label::new(area.left - 8.0, middle, point.label.as_str())
                        .with_anchor(TextAnchor::End)
                        .with_size(font_size),
                );

            if self.show_values {
                let (text_x, anchor) = if point.value < 0.0 {
                    (left - 4.0, TextAnchor::End)
                } else {
                    (left + width + 4.0, TextAnchor::Start)
                };
                svg = svg.push_element(
                    &Label::new(text_x, middle, format_value(point.value))
                        .with_anchor(anchor)
                        .with_size(font_size * 0.9)
                        .with_color(ChartColor::muted()),
                );
            }
        }

        svg.push_raw(zero_line(baseline, area.top, baseline, area.bottom()))
            .build()
    }
}

#[cfg(test)]
#[path = "bars_tests.rs"]
mod tests;
