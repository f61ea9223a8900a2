//! Chart data model.

use super::style::ChartColor;

/// A single labelled value.
#[derive(Debug, Clone)]
pub struct DataPoint {
    /// Label shown on the category axis or in the legend
    pub label: String,
    pub value: f64,
    /// Optional color override
    pub color: Option<ChartColor>,
}

impl DataPoint {
    #[must_use]
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
            color: None,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: ChartColor) -> Self {
        self.color = Some(color);
        self
    }
}
