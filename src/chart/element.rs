//! Primitive SVG elements: axes, bars, polylines, wedges, legends and text.

use std::f64::consts::PI;
use std::fmt::Write;

use super::format::xml_escape;
use super::style::{ChartColor, FONT_FAMILY, TextAnchor};

/// Axis orientation for charts.
#[derive(Debug, Clone, Copy)]
pub enum AxisOrientation {
    Horizontal,
    Vertical,
}

/// Base trait for SVG elements.
pub trait SvgElement {
    /// Render the element to an SVG fragment.
    fn render(&self) -> String;
}

/// Tick position and label for axis rendering.
struct TickInfo {
    start_x: f64,
    start_y: f64,
    end_x: f64,
    end_y: f64,
    label_x: f64,
    label_y: f64,
    anchor: TextAnchor,
}

/// Axis line with ticks. Label positions are fractions of `length`.
#[derive(Debug, Clone)]
pub struct Axis {
    pub orientation: AxisOrientation,
    pub x: f64,
    pub y: f64,
    pub length: f64,
    pub labels: Vec<(f64, String)>,
    pub color: ChartColor,
    pub tick_length: f64,
    pub font_size: f64,
    /// Draw a faint grid line across the plot at each tick.
    pub grid_span: Option<f64>,
}

impl Axis {
    #[must_use]
    pub fn horizontal(x: f64, y: f64, length: f64) -> Self {
        Self {
            orientation: AxisOrientation::Horizontal,
            x,
            y,
            length,
            labels: Vec::new(),
            color: ChartColor::muted(),
            tick_length: 5.0,
            font_size: 10.0,
            grid_span: None,
        }
    }

    #[must_use]
    pub fn vertical(x: f64, y: f64, length: f64) -> Self {
        Self {
            orientation: AxisOrientation::Vertical,
            ..Self::horizontal(x, y, length)
        }
    }

    #[must_use]
    pub fn with_labels(mut self, labels: Vec<(f64, String)>) -> Self {
        self.labels = labels;
        self
    }

    #[must_use]
    pub const fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    #[must_use]
    pub const fn with_grid(mut self, span: f64) -> Self {
        self.grid_span = Some(span);
        self
    }

    fn calculate_tick(&self, pos: f64) -> TickInfo {
        match self.orientation {
            AxisOrientation::Horizontal => {
                let tick_x = pos.mul_add(self.length, self.x);
                TickInfo {
                    start_x: tick_x,
                    start_y: self.y,
                    end_x: tick_x,
                    end_y: self.y + self.tick_length,
                    label_x: tick_x,
                    label_y: self.y + self.tick_length + self.font_size + 2.0,
                    anchor: TextAnchor::Middle,
                }
            }
            AxisOrientation::Vertical => {
                let tick_y = pos.mul_add(-self.length, self.y);
                TickInfo {
                    start_x: self.x,
                    start_y: tick_y,
                    end_x: self.x - self.tick_length,
                    end_y: tick_y,
                    label_x: self.x - self.tick_length - 4.0,
                    label_y: tick_y + self.font_size / 3.0,
                    anchor: TextAnchor::End,
                }
            }
        }
    }
}

impl SvgElement for Axis {
    fn render(&self) -> String {
        let mut output = String::new();
        let color = &self.color;

        for (pos, label) in &self.labels {
            let tick = self.calculate_tick(*pos);

            if let Some(span) = self.grid_span {
                let grid = ChartColor::grid();
                let (x2, y2) = match self.orientation {
                    AxisOrientation::Horizontal => (tick.start_x, self.y - span),
                    AxisOrientation::Vertical => (self.x + span, tick.start_y),
                };
                let _ = writeln!(
                    output,
                    r#"<line x1="{}" y1="{}" x2="{x2}" y2="{y2}" stroke="{grid}" stroke-width="1"/>"#,
                    tick.start_x, tick.start_y
                );
            }

            let _ = writeln!(
                output,
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{color}" stroke-width="1"/>"#,
                tick.start_x, tick.start_y, tick.end_x, tick.end_y
            );

            let _ = writeln!(
                output,
                "{}",
                Label::new(tick.label_x, tick.label_y, label)
                    .with_anchor(tick.anchor)
                    .with_size(self.font_size)
                    .with_color(color.clone())
                    .render()
            );
        }

        // Main axis line on top of the grid
        let (end_x, end_y) = match self.orientation {
            AxisOrientation::Horizontal => (self.x + self.length, self.y),
            AxisOrientation::Vertical => (self.x, self.y - self.length),
        };
        let _ = writeln!(
            output,
            r#"<line x1="{}" y1="{}" x2="{end_x}" y2="{end_y}" stroke="{color}" stroke-width="1"/>"#,
            self.x, self.y
        );

        output
    }
}

/// A text label.
#[derive(Debug, Clone)]
pub struct Label {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub anchor: TextAnchor,
    pub size: f64,
    pub color: ChartColor,
    pub bold: bool,
    /// Rotation in degrees around the anchor point.
    pub rotate: Option<f64>,
}

impl Label {
    #[must_use]
    pub fn new(x: f64, y: f64, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            text: text.into(),
            anchor: TextAnchor::Start,
            size: 10.0,
            color: ChartColor::text(),
            bold: false,
            rotate: None,
        }
    }

    #[must_use]
    pub const fn with_anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    #[must_use]
    pub const fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: ChartColor) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    #[must_use]
    pub const fn rotated(mut self, degrees: f64) -> Self {
        self.rotate = Some(degrees);
        self
    }
}

impl SvgElement for Label {
    fn render(&self) -> String {
        let weight = if self.bold { "bold" } else { "normal" };
        let transform = self
            .rotate
            .map(|deg| format!(r#" transform="rotate({deg} {} {})""#, self.x, self.y))
            .unwrap_or_default();
        format!(
            r#"<text x="{}" y="{}" text-anchor="{}" font-family="{FONT_FAMILY}" font-size="{}" font-weight="{weight}" fill="{}"{transform}>{}</text>"#,
            self.x,
            self.y,
            self.anchor,
            self.size,
            self.color,
            xml_escape(&self.text)
        )
    }
}

/// A single filled bar.
#[derive(Debug, Clone)]
pub struct Bar {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: ChartColor,
}

impl SvgElement for Bar {
    fn render(&self) -> String {
        format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}" rx="2"/>"#,
            self.x,
            self.y,
            self.width.max(0.0),
            self.height.max(0.0),
            self.color
        )
    }
}

/// A connected polyline with optional point markers.
#[derive(Debug, Clone)]
pub struct Line {
    pub points: Vec<(f64, f64)>,
    pub color: ChartColor,
    pub stroke_width: f64,
    pub marker_radius: Option<f64>,
}

impl Line {
    #[must_use]
    pub const fn new(points: Vec<(f64, f64)>, color: ChartColor) -> Self {
        Self {
            points,
            color,
            stroke_width: 2.0,
            marker_radius: None,
        }
    }

    #[must_use]
    pub const fn with_markers(mut self, radius: f64) -> Self {
        self.marker_radius = Some(radius);
        self
    }
}

impl SvgElement for Line {
    fn render(&self) -> String {
        if self.points.is_empty() {
            return String::new();
        }

        let color = &self.color;
        let mut path = String::new();
        for (i, (x, y)) in self.points.iter().enumerate() {
            if i == 0 {
                let _ = write!(path, "M{x},{y}");
            } else {
                let _ = write!(path, " L{x},{y}");
            }
        }

        let mut output = String::new();
        let _ = writeln!(
            output,
            r#"<path d="{path}" fill="none" stroke="{color}" stroke-width="{}" stroke-linecap="round" stroke-linejoin="round"/>"#,
            self.stroke_width
        );
        if let Some(r) = self.marker_radius {
            for (x, y) in &self.points {
                let _ = writeln!(
                    output,
                    r#"<circle cx="{x}" cy="{y}" r="{r}" fill="{color}" stroke="white" stroke-width="1.5"/>"#
                );
            }
        }
        output
    }
}

/// A pie slice between two angles, measured clockwise from 12 o'clock.
#[derive(Debug, Clone)]
pub struct Wedge {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    pub start: f64,
    pub sweep: f64,
    pub color: ChartColor,
}

impl Wedge {
    fn point_at(&self, angle: f64) -> (f64, f64) {
        (
            self.radius.mul_add(angle.sin(), self.cx),
            self.radius.mul_add(-angle.cos(), self.cy),
        )
    }
}

impl SvgElement for Wedge {
    fn render(&self) -> String {
        let color = &self.color;
        // A single full-circle arc degenerates, so draw a circle instead.
        if self.sweep >= 2.0f64.mul_add(PI, -1e-9) {
            return format!(
                r#"<circle cx="{}" cy="{}" r="{}" fill="{color}"/>"#,
                self.cx, self.cy, self.radius
            );
        }
        let (x1, y1) = self.point_at(self.start);
        let (x2, y2) = self.point_at(self.start + self.sweep);
        let large_arc = u8::from(self.sweep > PI);
        format!(
            r#"<path d="M{},{} L{x1},{y1} A{r},{r} 0 {large_arc} 1 {x2},{y2} Z" fill="{color}" stroke="white" stroke-width="1"/>"#,
            self.cx,
            self.cy,
            r = self.radius
        )
    }
}

/// Vertical list of color swatches with labels.
#[derive(Debug, Clone)]
pub struct Legend {
    pub x: f64,
    pub y: f64,
    pub entries: Vec<(ChartColor, String)>,
    pub font_size: f64,
    pub row_height: f64,
}

impl Legend {
    #[must_use]
    pub const fn new(x: f64, y: f64, entries: Vec<(ChartColor, String)>) -> Self {
        Self {
            x,
            y,
            entries,
            font_size: 10.0,
            row_height: 16.0,
        }
    }

    #[must_use]
    pub const fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self.row_height = size * 1.6;
        self
    }
}

impl SvgElement for Legend {
    #[allow(clippy::cast_precision_loss)]
    fn render(&self) -> String {
        let mut output = String::new();
        let swatch = self.font_size;
        for (i, (color, label)) in self.entries.iter().enumerate() {
            let y = self.row_height.mul_add(i as f64, self.y);
            let _ = writeln!(
                output,
                r#"<rect x="{}" y="{y}" width="{swatch}" height="{swatch}" fill="{color}" rx="2"/>"#,
                self.x
            );
            let _ = writeln!(
                output,
                "{}",
                Label::new(self.x + swatch + 6.0, y + swatch * 0.85, label)
                    .with_size(self.font_size)
                    .render()
            );
        }
        output
    }
}

#[cfg(test)]
#[path = "element_tests.rs"]
mod tests;
