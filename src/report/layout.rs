//! Page layout: a vertical cursor that places text, rules, images and tables
//! onto fixed-size pages, breaking pages before any block that does not fit.
//!
//! Coordinates are PDF user space: points, origin at the bottom-left corner.
//! Text `y` is the baseline; image `y` is the bottom edge.

use std::mem;

use serde::Serialize;

use super::image::DecodedImage;
use super::metrics::{Font, fit_text};
use crate::error::{ReportError, Result};

pub const TITLE_SIZE: f64 = 16.0;
pub const HEADING_SIZE: f64 = 12.0;
pub const BODY_SIZE: f64 = 10.0;
pub const TABLE_SIZE: f64 = 9.0;

/// Line advance as a multiple of the font size.
const LEADING: f64 = 1.4;
/// Space after images and between sections.
pub const BLOCK_GAP: f64 = 12.0;
/// Horizontal padding inside table cells.
const CELL_PADDING: f64 = 4.0;

/// Page size and margins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
}

impl PageGeometry {
    pub const LETTER_WIDTH: f64 = 612.0;
    pub const LETTER_HEIGHT: f64 = 792.0;

    /// US Letter with equal margins on all sides.
    ///
    /// # Errors
    /// Returns `ReportError::Render` if the margins leave no content area.
    pub fn letter(margin: f64) -> Result<Self> {
        Self::new(Self::LETTER_WIDTH, Self::LETTER_HEIGHT, margin)
    }

    /// # Errors
    /// Returns `ReportError::Render` if the margins leave no content area.
    pub fn new(width: f64, height: f64, margin: f64) -> Result<Self> {
        let valid = [width, height, margin].iter().all(|v| v.is_finite())
            && margin >= 0.0
            && margin * 2.0 < width.min(height);
        if !valid {
            return Err(ReportError::Render(format!(
                "page {width}x{height} with margin {margin} has no content area"
            )));
        }
        Ok(Self { width, height, margin })
    }

    #[must_use]
    pub fn content_width(&self) -> f64 {
        self.margin.mul_add(-2.0, self.width)
    }

    #[must_use]
    pub fn content_height(&self) -> f64 {
        self.margin.mul_add(-2.0, self.height)
    }

    #[must_use]
    pub fn content_top(&self) -> f64 {
        self.height - self.margin
    }
}

/// Text color roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Body,
    Muted,
    Error,
}

impl Tone {
    /// RGB components in 0.0..=1.0.
    #[must_use]
    pub const fn rgb(self) -> (f32, f32, f32) {
        match self {
            Self::Body => (0.12, 0.16, 0.23),
            Self::Muted => (0.39, 0.45, 0.55),
            Self::Error => (0.86, 0.15, 0.15),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: Font,
    pub size: f64,
    pub tone: Tone,
}

impl TextStyle {
    #[must_use]
    pub const fn body() -> Self {
        Self {
            font: Font::Regular,
            size: BODY_SIZE,
            tone: Tone::Body,
        }
    }

    #[must_use]
    pub const fn heading(size: f64) -> Self {
        Self {
            font: Font::Bold,
            size,
            tone: Tone::Body,
        }
    }

    #[must_use]
    pub const fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    #[must_use]
    pub const fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn line_height(&self) -> f64 {
        self.size * LEADING
    }
}

/// Something drawn on a page.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Text {
        x: f64,
        y: f64,
        text: String,
        style: TextStyle,
    },
    Rule {
        x1: f64,
        x2: f64,
        y: f64,
    },
    /// `image` indexes [`Layout::images`].
    Image {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        image: usize,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub items: Vec<Item>,
}

/// Report sections, in the order they were laid out.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "section", content = "column", rename_all = "snake_case")]
pub enum SectionKind {
    Title,
    Summary,
    TypeChart,
    Analysis(String),
    Preview,
}

/// The finished, paginated document.
#[derive(Debug, Clone)]
pub struct Layout {
    pub geometry: PageGeometry,
    pub pages: Vec<Page>,
    pub sections: Vec<SectionKind>,
    pub images: Vec<DecodedImage>,
}

impl Layout {
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All text on all pages, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(|p| &p.items).filter_map(|item| match item {
            Item::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Image indexes as placed, in drawing order.
    pub fn placed_images(&self) -> impl Iterator<Item = usize> + '_ {
        self.pages.iter().flat_map(|p| &p.items).filter_map(|item| match item {
            Item::Image { image, .. } => Some(*image),
            _ => None,
        })
    }
}

/// Lays out blocks top to bottom, starting a new page whenever the next
/// block does not fit in the space left on the current one.
#[derive(Debug)]
pub struct LayoutEngine {
    geometry: PageGeometry,
    pages: Vec<Page>,
    current: Page,
    cursor: f64,
    sections: Vec<SectionKind>,
    images: Vec<DecodedImage>,
}

impl LayoutEngine {
    #[must_use]
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            pages: Vec::new(),
            current: Page { items: Vec::new() },
            cursor: geometry.content_top(),
            sections: Vec::new(),
            images: Vec::new(),
        }
    }

    #[must_use]
    pub const fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Vertical space left above the bottom margin.
    #[must_use]
    pub fn remaining(&self) -> f64 {
        self.cursor - self.geometry.margin
    }

    /// Pages started so far, including the current one.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len() + 1
    }

    fn at_page_top(&self) -> bool {
        self.current.items.is_empty()
    }

    /// Start a new page if fewer than `height` points remain. Never breaks
    /// an empty page, so an oversized block cannot loop forever.
    /// Returns whether a page break happened.
    pub fn ensure_space(&mut self, height: f64) -> bool {
        if height <= self.remaining() || self.at_page_top() {
            return false;
        }
        self.new_page();
        true
    }

    pub fn new_page(&mut self) {
        self.pages.push(mem::take(&mut self.current));
        self.cursor = self.geometry.content_top();
    }

    pub fn begin_section(&mut self, kind: SectionKind) {
        self.sections.push(kind);
    }

    /// Move the cursor down without drawing.
    pub fn gap(&mut self, height: f64) {
        self.cursor -= height;
    }

    /// One line of text at the left margin, truncated to the content width.
    pub fn line(&mut self, text: &str, style: TextStyle) {
        self.line_at(0.0, text, style);
    }

    /// One line of text indented by `indent` points.
    pub fn line_at(&mut self, indent: f64, text: &str, style: TextStyle) {
        let height = style.line_height();
        self.ensure_space(height);
        let max_width = self.geometry.content_width() - indent;
        self.current.items.push(Item::Text {
            x: self.geometry.margin + indent,
            y: self.cursor - style.size,
            text: fit_text(text, style.font, style.size, max_width),
            style,
        });
        self.cursor -= height;
    }

    /// A heading that stays on the same page as the first `following`
    /// points of content after it.
    pub fn heading(&mut self, text: &str, following: f64) {
        let style = TextStyle::heading(HEADING_SIZE);
        self.ensure_space(style.line_height() + following);
        self.line(text, style);
    }

    /// Horizontal separator across the content width.
    pub fn rule(&mut self) {
        self.ensure_space(BLOCK_GAP);
        self.cursor -= 4.0;
        self.current.items.push(Item::Rule {
            x1: self.geometry.margin,
            x2: self.geometry.width - self.geometry.margin,
            y: self.cursor,
        });
        self.cursor -= BLOCK_GAP - 4.0;
    }

    /// Largest height not exceeding `desired` that fits on an empty page
    /// below `reserved` points of other content.
    #[must_use]
    pub fn fit_height(&self, desired: f64, reserved: f64) -> f64 {
        desired.min(self.geometry.content_height() - reserved).max(1.0)
    }

    /// Place an image at the left margin. If it is taller than the space on
    /// a fresh page it is scaled down, keeping its aspect ratio.
    pub fn image(&mut self, image: DecodedImage, width: f64, height: f64) {
        let height = height.max(1.0);
        self.ensure_space(height);
        let scale = (self.remaining() / height).clamp(0.0, 1.0);
        let (width, height) = (width * scale, height * scale);

        let index = self.images.len();
        self.images.push(image);
        self.current.items.push(Item::Image {
            x: self.geometry.margin,
            y: self.cursor - height,
            width,
            height,
            image: index,
        });
        self.cursor -= height + BLOCK_GAP;
    }

    /// A table with evenly split columns. The header row is repeated at the
    /// top of every page the table continues onto.
    #[allow(clippy::cast_precision_loss)]
    pub fn table(&mut self, columns: &[String], rows: &[Vec<String>]) {
        if columns.is_empty() {
            return;
        }
        let column_width = self.geometry.content_width() / columns.len() as f64;
        let header = TextStyle::heading(TABLE_SIZE);
        let body = TextStyle::body().with_size(TABLE_SIZE);

        self.ensure_space(header.line_height() + body.line_height());
        self.table_row(columns, column_width, header);
        for row in rows {
            if self.ensure_space(body.line_height()) {
                self.table_row(columns, column_width, header);
            }
            self.table_row(row, column_width, body);
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn table_row(&mut self, cells: &[String], column_width: f64, style: TextStyle) {
        let y = self.cursor - style.size;
        for (i, cell) in cells.iter().enumerate() {
            self.current.items.push(Item::Text {
                x: column_width.mul_add(i as f64, self.geometry.margin),
                y,
                text: fit_text(cell, style.font, style.size, column_width - CELL_PADDING),
                style,
            });
        }
        self.cursor -= style.line_height();
    }

    #[must_use]
    pub fn finish(mut self) -> Layout {
        if !self.current.items.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        Layout {
            geometry: self.geometry,
            pages: self.pages,
            sections: self.sections,
            images: self.images,
        }
    }
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
