//! SVG to PNG rasterization.
//!
//! Every call parses its own tree into its own pixmap. The font database is
//! the only shared value and it is never mutated after first use.

use std::sync::Arc;

use once_cell::sync::Lazy;
use png::{BitDepth, ColorType, Encoder};
use resvg::tiny_skia::{self, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};
use resvg::usvg::{self, Options, Tree, fontdb};
use tracing::debug;

use super::ChartRenderError;

/// A valid 1x1 transparent PNG, the answer of last resort.
pub const MINIMAL_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4,
    0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE,
    0x42, 0x60, 0x82,
];

/// Families tried, in order, as the generic `sans-serif` fallback.
const SANS_SERIF_CANDIDATES: [&str; 6] = [
    "DejaVu Sans",
    "Liberation Sans",
    "Arial",
    "Helvetica",
    "Noto Sans",
    "Segoe UI",
];

static FONT_DB: Lazy<Arc<fontdb::Database>> = Lazy::new(|| {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    let chosen = SANS_SERIF_CANDIDATES.into_iter().find(|family| {
        db.faces()
            .any(|face| face.families.iter().any(|(name, _)| name == family))
    });
    if let Some(family) = chosen {
        db.set_sans_serif_family(family);
    }
    debug!(faces = db.len(), "loaded system fonts for charts");
    Arc::new(db)
});

/// Pixel dimensions for a logical size at `scale`. Never zero.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn pixel_size(width: f64, height: f64, scale: f64) -> (u32, u32) {
    let px = |v: f64| (v * scale).round().clamp(1.0, 16_384.0) as u32;
    (px(width), px(height))
}

/// Rasterize an SVG document, scaling logical units by `scale`.
///
/// # Errors
/// Returns a `ChartRenderError` if the markup does not parse, the canvas
/// cannot be allocated, or PNG encoding fails.
#[allow(clippy::cast_possible_truncation)]
pub fn svg_to_png(svg: &str, width: f64, height: f64, scale: f64) -> Result<Vec<u8>, ChartRenderError> {
    let options = Options {
        fontdb: Arc::clone(&FONT_DB),
        ..Options::default()
    };
    let tree = Tree::from_data(svg.as_bytes(), &options)?;

    let (px_width, px_height) = pixel_size(width, height, scale);
    let mut pixmap = Pixmap::new(px_width, px_height).ok_or(ChartRenderError::Raster {
        width: px_width,
        height: px_height,
    })?;
    let scale = scale as f32;
    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    encode_rgba(&pixmap)
}

/// Draw a plain red frame with a cross, without any SVG or text machinery.
///
/// # Errors
/// Returns a `ChartRenderError` if the canvas cannot be allocated or encoded.
#[allow(clippy::cast_precision_loss)]
pub fn fallback_frame(width: u32, height: u32) -> Result<Vec<u8>, ChartRenderError> {
    let mut pixmap = Pixmap::new(width, height).ok_or(ChartRenderError::Raster { width, height })?;
    pixmap.fill(tiny_skia::Color::WHITE);

    let (w, h) = (width as f32, height as f32);
    let inset = 4.0_f32.min(w / 4.0).min(h / 4.0);
    let mut builder = PathBuilder::new();
    if let Some(rect) = Rect::from_ltrb(inset, inset, w - inset, h - inset) {
        builder.push_rect(rect);
    }
    builder.move_to(inset, inset);
    builder.line_to(w - inset, h - inset);
    builder.move_to(w - inset, inset);
    builder.line_to(inset, h - inset);

    if let Some(path) = builder.finish() {
        let mut paint = Paint::default();
        paint.set_color_rgba8(220, 38, 38, 255);
        paint.anti_alias = true;
        let stroke = Stroke {
            width: 2.0,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    encode_rgba(&pixmap)
}

fn encode_rgba(pixmap: &Pixmap) -> Result<Vec<u8>, ChartRenderError> {
    let mut out = Vec::new();
    let mut encoder = Encoder::new(&mut out, pixmap.width(), pixmap.height());
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);
    encoder
        .write_header()?
        .write_image_data(pixmap.data())?;
    Ok(out)
}

impl From<usvg::Error> for ChartRenderError {
    fn from(err: usvg::Error) -> Self {
        Self::SvgParse(err.to_string())
    }
}

#[cfg(test)]
#[path = "raster_tests.rs"]
mod tests;
