//! Helvetica glyph metrics for fitting text into table cells and lines.

/// The two standard fonts used by reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Font {
    #[default]
    Regular,
    Bold,
}

impl Font {
    /// PostScript name of the standard Type 1 font.
    #[must_use]
    pub const fn base_name(self) -> &'static [u8] {
        match self {
            Self::Regular => b"Helvetica",
            Self::Bold => b"Helvetica-Bold",
        }
    }

    /// Resource name used inside content streams.
    #[must_use]
    pub const fn resource_name(self) -> &'static [u8] {
        match self {
            Self::Regular => b"F1",
            Self::Bold => b"F2",
        }
    }
}

/// Advance widths in 1/1000 em for ASCII 32..=126.
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Width used for characters outside the table.
const DEFAULT_WIDTH: u16 = 556;

const ELLIPSIS: &str = "...";

fn glyph_width(c: char, font: Font) -> u16 {
    let table = match font {
        Font::Regular => &HELVETICA,
        Font::Bold => &HELVETICA_BOLD,
    };
    (c as usize)
        .checked_sub(32)
        .and_then(|i| table.get(i))
        .copied()
        .unwrap_or(DEFAULT_WIDTH)
}

/// Rendered width of `text` in points.
#[must_use]
pub fn text_width(text: &str, font: Font, size: f64) -> f64 {
    let units: u32 = text.chars().map(|c| u32::from(glyph_width(c, font))).sum();
    f64::from(units) * size / 1000.0
}

/// Truncate `text` with `...` so that it fits in `max_width` points.
#[must_use]
pub fn fit_text(text: &str, font: Font, size: f64, max_width: f64) -> String {
    if text_width(text, font, size) <= max_width {
        return text.to_string();
    }
    let budget = max_width - text_width(ELLIPSIS, font, size);
    let mut used = 0.0;
    let mut out = String::new();
    for c in text.chars() {
        let w = f64::from(glyph_width(c, font)) * size / 1000.0;
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    if budget > 0.0 {
        out.push_str(ELLIPSIS);
    }
    out
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;
