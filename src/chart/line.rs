//! Line chart over ordered categories.

use super::bars::{category_bottom_margin, category_labels, value_axis, value_title};
use super::builder::{PlotArea, SvgBuilder, TITLE_BAND, message_svg};
use super::data::DataPoint;
use super::element::{Label, Line, SvgElement};
use super::format::format_value;
use super::scale::ValueScale;
use super::style::{ChartColor, TextAnchor};

/// One point per category, in the given order, joined by a polyline.
#[derive(Debug)]
pub struct LineChart {
    pub title: String,
    pub value_label: Option<String>,
    pub data: Vec<DataPoint>,
    pub width: f64,
    pub height: f64,
    pub line_color: ChartColor,
    pub show_points: bool,
}

impl Default for LineChart {
    fn default() -> Self {
        Self {
            title: String::new(),
            value_label: None,
            data: Vec::new(),
            width: 640.0,
            height: 360.0,
            line_color: ChartColor::primary(),
            show_points: true,
        }
    }
}

impl LineChart {
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
    pub const fn with_points(mut self, show: bool) -> Self {
        self.show_points = show;
        self
    }
}

impl SvgElement for LineChart {
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
            24.0,
            TITLE_BAND + 8.0,
            category_bottom_margin(count),
        );
        let scale = ValueScale::including_zero(self.data.iter().map(|d| d.value));

        // Points sit at slot centers so a single category lands mid-plot.
        let slot = area.width / count as f64;
        let points: Vec<(f64, f64)> = self
            .data
            .iter()
            .enumerate()
            .map(|(i, d)| {
                (
                    slot.mul_add(i as f64 + 0.5, area.left),
                    area.y_at(scale.fraction(d.value)),
                )
            })
            .collect();

        let mut line = Line::new(points.clone(), self.line_color.clone());
        if self.show_points {
            line = line.with_markers(3.5);
        }

        let mut svg = SvgBuilder::chart(&self.title, self.width, self.height)
            .push_element(&value_axis(&area, &scale))
            .push_element(&line);
        if let Some(label) = &self.value_label {
            svg = svg.push_element(&value_title(&area, label));
        }
        if count <= 12 {
            for ((x, y), point) in points.iter().zip(&self.data) {
                svg = svg.push_element(
                    &Label::new(*x, y - 8.0, format_value(point.value))
                        .with_anchor(TextAnchor::Middle)
                        .with_size(9.0),
                );
            }
        }

        let centers: Vec<f64> = points.iter().map(|(x, _)| *x).collect();
        let labels: Vec<&str> = self.data.iter().map(|d| d.label.as_str()).collect();
        svg.push_raw(category_labels(&area, &centers, &labels)).build()
    }
}

#[cfg(test)]
#[path = "line_tests.rs"]
mod tests;
