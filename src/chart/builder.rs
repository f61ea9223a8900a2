//! SVG document assembly and the shared plot frame.

use std::fmt::Write;

use super::element::{Label, SvgElement};
use super::format::xml_escape;
use super::style::{BACKGROUND, ChartColor, GRID, TextAnchor};

/// Height reserved above the plot for the chart title.
pub const TITLE_BAND: f64 = 34.0;

/// Builder for a standalone SVG document.
#[derive(Debug, Default)]
pub struct SvgBuilder {
    width: f64,
    height: f64,
    title: String,
    background: Option<ChartColor>,
    elements: Vec<String>,
}

impl SvgBuilder {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            title: String::new(),
            background: None,
            elements: Vec::new(),
        }
    }

    /// Standard chart canvas: white background and a bold centered heading.
    #[must_use]
    pub fn chart(title: &str, width: f64, height: f64) -> Self {
        let builder = Self::new(width, height)
            .with_title(title)
            .with_background(ChartColor::hex(BACKGROUND));
        if title.is_empty() {
            return builder;
        }
        builder.push_element(
            &Label::new(width / 2.0, 22.0, title)
                .with_anchor(TextAnchor::Middle)
                .with_size(14.0)
                .bold(),
        )
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_background(mut self, color: ChartColor) -> Self {
        self.background = Some(color);
        self
    }

    #[must_use]
    pub fn push_element<E: SvgElement>(mut self, element: &E) -> Self {
        self.elements.push(element.render());
        self
    }

    #[must_use]
    pub fn push_raw(mut self, svg: impl Into<String>) -> Self {
        self.elements.push(svg.into());
        self
    }

    #[must_use]
    pub fn build(self) -> String {
        let mut output = String::new();

        let _ = writeln!(
            output,
            r#"<svg width="{w}" height="{h}" viewBox="0 0 {w} {h}" xmlns="http://www.w3.org/2000/svg" role="img">"#,
            w = self.width,
            h = self.height
        );

        if !self.title.is_empty() {
            let escaped = xml_escape(&self.title);
            let _ = writeln!(output, r"    <title>{escaped}</title>");
        }

        if let Some(background) = &self.background {
            let _ = writeln!(
                output,
                r#"    <rect x="0" y="0" width="{}" height="{}" fill="{background}"/>"#,
                self.width, self.height
            );
        }

        for element in self.elements {
            for line in element.lines() {
                let _ = writeln!(output, "    {line}");
            }
        }

        output.push_str("</svg>");
        output
    }
}

/// Plot rectangle inside a chart canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    /// Inset a `width` x `height` canvas by the given margins. Never negative.
    #[must_use]
    pub fn inset(width: f64, height: f64, left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            width: (width - left - right).max(1.0),
            height: (height - top - bottom).max(1.0),
        }
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Y coordinate of a value fraction, 0.0 at the bottom edge.
    #[must_use]
    pub fn y_at(&self, fraction: f64) -> f64 {
        fraction.mul_add(-self.height, self.bottom())
    }

    /// X coordinate of a value fraction, 0.0 at the left edge.
    #[must_use]
    pub fn x_at(&self, fraction: f64) -> f64 {
        fraction.mul_add(self.width, self.left)
    }
}

/// A framed canvas carrying a single centered message.
#[must_use]
pub fn message_svg(title: &str, message: &str, width: f64, height: f64, tone: &ChartColor) -> String {
    let frame = format!(
        r#"<rect x="8" y="8" width="{}" height="{}" fill="none" stroke="{GRID}" stroke-width="2" rx="6"/>"#,
        (width - 16.0).max(1.0),
        (height - 16.0).max(1.0)
    );
    SvgBuilder::chart(title, width, height)
        .push_raw(frame)
        .push_element(
            &Label::new(width / 2.0, height / 2.0 + 6.0, message)
                .with_anchor(TextAnchor::Middle)
                .with_size(16.0)
                .with_color(tone.clone()),
        )
        .build()
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
