//! Text helpers shared by the chart types.

const ELLIPSIS: &str = "...";

/// Escape text for inclusion in SVG markup.
#[must_use]
pub fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Shorten a label to at most `max_len` characters, ending in `...`.
/// Limits too short to hold the ellipsis cut the label without one.
#[must_use]
pub fn truncate_label(label: &str, max_len: usize) -> String {
    if label.chars().count() <= max_len {
        return label.to_string();
    }
    if max_len <= ELLIPSIS.len() {
        return label.chars().take(max_len).collect();
    }
    let mut out: String = label.chars().take(max_len - ELLIPSIS.len()).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Compact value text for axis ticks and bar annotations.
#[must_use]
pub fn format_value(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if abs >= 10_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else if (value - value.round()).abs() < 1e-9 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

#[cfg(test)]
#[path = "format_tests.rs"]
mod tests;
