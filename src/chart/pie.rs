//! Pie chart with a side legend.

use std::f64::consts::TAU;

use super::builder::{SvgBuilder, TITLE_BAND, message_svg};
use super::data::DataPoint;
use super::element::{Legend, SvgElement, Wedge};
use super::style::ChartColor;

/// Proportional wedges over the positive values. Labels live in the legend
/// so that many small wedges never produce overlapping text.
#[derive(Debug)]
pub struct PieChart {
    pub title: String,
    pub data: Vec<DataPoint>,
    pub width: f64,
    pub height: f64,
}

impl PieChart {
    #[must_use]
    pub fn new(title: impl Into<String>, data: Vec<DataPoint>) -> Self {
        Self {
            title: title.into(),
            data,
            width: 640.0,
            height: 360.0,
        }
    }

    #[must_use]
    pub const fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Sum of the values that can be drawn as wedges.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.slices().map(|d| d.value).sum()
    }

    /// Sum of every finite value, negatives included. A pie whose values
    /// cancel out has nothing to show.
    #[must_use]
    pub fn net_total(&self) -> f64 {
        self.data.iter().map(|d| d.value).filter(|v| v.is_finite()).sum()
    }

    fn slices(&self) -> impl Iterator<Item = &DataPoint> {
        self.data.iter().filter(|d| d.value > 0.0 && d.value.is_finite())
    }
}

impl SvgElement for PieChart {
    fn render(&self) -> String {
        let total = self.total();
        if total <= 0.0 || self.net_total() <= 0.0 {
            return message_svg(&self.title, "No data", self.width, self.height, &ChartColor::muted());
        }

        let plot_top = TITLE_BAND + 4.0;
        let plot_height = (self.height - plot_top - 12.0).max(2.0);
        let radius = (plot_height / 2.0).min(self.width * 0.25);
        let cx = 24.0 + radius;
        let cy = plot_top + plot_height / 2.0;

        let mut svg = SvgBuilder::chart(&self.title, self.width, self.height);
        let mut entries = Vec::new();
        let mut start = 0.0;
        for (i, point) in self.slices().enumerate() {
            let color = point.color.clone().unwrap_or_else(|| ChartColor::palette(i));
            let sweep = point.value / total * TAU;
            svg = svg.push_element(&Wedge {
                cx,
                cy,
                radius,
                start,
                sweep,
                color: color.clone(),
            });
            start += sweep;
            entries.push((
                color,
                format!("{} ({:.1}%)", point.label, point.value / total * 100.0),
            ));
        }

        // Shrink legend rows until every entry fits beside the pie.
        #[allow(clippy::cast_precision_loss)]
        let rows = entries.len() as f64;
        let row_height = (plot_height / rows).min(18.0);
        let mut legend = Legend::new(
            cx + radius + 32.0,
            (cy - row_height * rows / 2.0).max(plot_top),
            entries,
        )
        .with_font_size((row_height / 1.6).clamp(4.0, 11.0));
        legend.row_height = row_height;
        svg.push_element(&legend).build()
    }
}

#[cfg(test)]
#[path = "pie_tests.rs"]
mod tests;
