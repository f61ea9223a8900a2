//! Report composition: a [`ReportRequest`] laid out onto US Letter pages and
//! written as PDF.
//!
//! [`Composer::layout`] is pure and returns the paginated [`Layout`], which
//! tests inspect directly. [`Composer::compose`] adds PDF serialization.

mod compose;
mod image;
mod layout;
mod metrics;
mod pdf;
mod request;

pub use compose::{ComposeContext, Composer, DEFAULT_TITLE, RenderedReport, ReportSettings};
pub use image::{DecodedImage, decode_png};
pub use layout::{Item, Layout, LayoutEngine, Page, PageGeometry, SectionKind, TextStyle, Tone};
pub use metrics::{Font, fit_text, text_width};
pub use pdf::{DocumentInfo, win_ansi, write_pdf};
pub use request::{
    AnalysisMode, AnalysisOptions, DEFAULT_FILENAME, IncludeOptions, PreviewSource, ReportRequest, sanitize_filename,
};
