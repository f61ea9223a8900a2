//! Histogram of a numeric sample.

use super::bars::{tick_labels, value_title};
use super::builder::{PlotArea, SvgBuilder, TITLE_BAND, message_svg};
use super::element::{Axis, Bar, Label, SvgElement};
use super::format::format_value;
use super::scale::ValueScale;
use super::style::{ChartColor, TextAnchor};

/// Upper bound on the number of bins.
pub const MAX_BINS: usize = 10;

/// One equal-width bin: `[start, end)`, except the last bin which is closed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Histogram of values, binned into `min(10, n)` equal-width bins.
#[derive(Debug)]
pub struct ValueHistogram {
    pub title: String,
    pub value_label: Option<String>,
    pub bins: Vec<Bin>,
    pub width: f64,
    pub height: f64,
    pub bar_color: ChartColor,
}

impl ValueHistogram {
    #[must_use]
    pub fn from_samples(title: impl Into<String>, samples: &[f64]) -> Self {
        Self {
            title: title.into(),
            value_label: None,
            bins: bin_samples(samples),
            width: 640.0,
            height: 360.0,
            bar_color: ChartColor::primary(),
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

/// Bin `samples` over `[min, max]`. A degenerate range is widened by 0.5
/// on each side. Empty input yields no bins.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn bin_samples(samples: &[f64]) -> Vec<Bin> {
    if samples.is_empty() {
        return Vec::new();
    }
    let count = samples.len().min(MAX_BINS);
    let (mut lo, mut hi) = samples
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    if (hi - lo).abs() < f64::EPSILON {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / count as f64;

    let mut bins: Vec<Bin> = (0..count)
        .map(|i| Bin {
            start: width.mul_add(i as f64, lo),
            end: width.mul_add((i + 1) as f64, lo),
            count: 0,
        })
        .collect();
    for value in samples {
        let index = (((value - lo) / width).floor().max(0.0) as usize).min(count - 1);
        bins[index].count += 1;
    }
    bins
}

impl SvgElement for ValueHistogram {
    #[allow(clippy::cast_precision_loss)]
    fn render(&self) -> String {
        let (Some(first), Some(last)) = (self.bins.first(), self.bins.last()) else {
            return message_svg(&self.title, "No data", self.width, self.height, &ChartColor::muted());
        };

        let bottom = if self.value_label.is_some() { 52.0 } else { 36.0 };
        let area = PlotArea::inset(self.width, self.height, 64.0, 24.0, TITLE_BAND + 8.0, bottom);
        let counts = ValueScale::including_zero(self.bins.iter().map(|b| b.count as f64));
        let span = last.end - first.start;

        let edges: Vec<(f64, String)> = std::iter::once(first.start)
            .chain(self.bins.iter().map(|b| b.end))
            .map(|edge| ((edge - first.start) / span, format_value(edge)))
            .collect();

        let mut svg = SvgBuilder::chart(&self.title, self.width, self.height)
            .push_element(
                &Axis::vertical(area.left, area.bottom(), area.height)
                    .with_labels(tick_labels(&counts))
                    .with_grid(area.width),
            )
            .push_element(&value_title(&area, "Count"))
            .push_element(&Axis::horizontal(area.left, area.bottom(), area.width).with_labels(edges));

        if let Some(label) = &self.value_label {
            svg = svg.push_element(
                &Label::new(area.left + area.width / 2.0, self.height - 10.0, label.as_str())
                    .with_anchor(TextAnchor::Middle)
                    .with_size(11.0)
                    .with_color(ChartColor::muted()),
            );
        }

        for bin in &self.bins {
            let x = area.x_at((bin.start - first.start) / span);
            let width = area.width * (bin.end - bin.start) / span;
            let top = area.y_at(counts.fraction(bin.count as f64));
            svg = svg.push_element(&Bar {
                x: x + 0.5,
                y: top,
                width: width - 1.0,
                height: area.bottom() - top,
                color: self.bar_color.clone(),
            });
        }

        svg.build()
    }
}

#[cfg(test)]
#[path = "histogram_tests.rs"]
mod tests;
