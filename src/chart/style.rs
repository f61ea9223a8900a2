//! SVG styling primitives: colors, the categorical palette and text anchoring.

use std::fmt;

/// A concrete color. Rasterization has no stylesheet, so every color is
/// resolved to a literal value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartColor(String);

impl ChartColor {
    /// Create a hex color (e.g. `"#4f46e5"`).
    #[must_use]
    pub fn hex(color: &str) -> Self {
        Self(color.to_string())
    }

    /// Palette color for the `index`-th category, cycling.
    #[must_use]
    pub fn palette(index: usize) -> Self {
        Self::hex(PALETTE[index % PALETTE.len()])
    }

    #[must_use]
    pub fn primary() -> Self {
        Self::hex(PRIMARY)
    }

    #[must_use]
    pub fn text() -> Self {
        Self::hex(TEXT)
    }

    #[must_use]
    pub fn muted() -> Self {
        Self::hex(TEXT_MUTED)
    }

    #[must_use]
    pub fn grid() -> Self {
        Self::hex(GRID)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChartColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub const PRIMARY: &str = "#4f46e5";
pub const TEXT: &str = "#1e293b";
pub const TEXT_MUTED: &str = "#64748b";
pub const GRID: &str = "#e2e8f0";
pub const BACKGROUND: &str = "#ffffff";
pub const ERROR: &str = "#dc2626";

/// Categorical palette for pie wedges and legends.
pub const PALETTE: [&str; 10] = [
    "#4f46e5", "#f59e0b", "#10b981", "#ef4444", "#0ea5e9", "#8b5cf6", "#84cc16", "#ec4899",
    "#14b8a6", "#f97316",
];

/// Font stack used by every chart.
pub const FONT_FAMILY: &str = "sans-serif";

/// Text anchor position for labels.
#[derive(Debug, Clone, Copy, Default)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

impl fmt::Display for TextAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::Middle => write!(f, "middle"),
            Self::End => write!(f, "end"),
        }
    }
}

#[cfg(test)]
#[path = "style_tests.rs"]
mod tests;
