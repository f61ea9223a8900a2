//! Chart rendering: SVG chart types rasterized to PNG.
//!
//! Charts are plain values implementing [`SvgElement`]. [`ChartRenderer`]
//! picks the chart type for a request, applies the layout policies (label
//! truncation, horizontal bars for many categories, "No data" placeholders)
//! and rasterizes the markup. [`render`] never fails.

mod bars;
mod builder;
mod data;
mod element;
mod format;
mod histogram;
mod line;
mod pie;
mod raster;
mod renderer;
mod scale;
mod style;

use thiserror::Error;

pub use bars::{BarChart, HorizontalBarChart};
pub use builder::{PlotArea, SvgBuilder};
pub use data::DataPoint;
pub use element::{Axis, Bar, Label, Legend, Line, SvgElement, Wedge};
pub use format::{format_value, truncate_label, xml_escape};
pub use histogram::{Bin, ValueHistogram, bin_samples};
pub use line::LineChart;
pub use pie::PieChart;
pub use raster::MINIMAL_PNG;
pub use renderer::{ChartKind, ChartRenderer, ChartRequest, ChartSettings, ChartSize, Series, render};
pub use scale::ValueScale;
pub use style::ChartColor;

/// Internal chart failures. Callers of [`render`] never see these.
#[derive(Debug, Error)]
pub enum ChartRenderError {
    #[error("non-finite value for '{label}'")]
    InvalidValue { label: String },

    #[error("invalid chart markup: {0}")]
    SvgParse(String),

    #[error("cannot allocate a {width}x{height} canvas")]
    Raster { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),

    #[error("PNG decoding failed: {0}")]
    Decode(#[from] png::DecodingError),
}
