//! PDF serialization of a finished [`Layout`].

use std::io::Write;

use chrono::{DateTime, Datelike, Local, Timelike};
use flate2::Compression;
use flate2::write::ZlibEncoder;
use pdf_writer::{Content, Date, Filter, Finish, Name, Pdf, Rect, Ref, Str, TextStr};

use super::layout::{Item, Layout, Tone};
use super::metrics::{Font, text_width};
use crate::error::Result;

const FOOTER_SIZE: f64 = 8.0;
const PRODUCER: &str = concat!("equipment-report ", env!("CARGO_PKG_VERSION"));

/// Document information dictionary entries.
#[derive(Debug, Clone)]
pub struct DocumentInfo {
    pub title: String,
    pub author: String,
    pub created: DateTime<Local>,
}

/// Encode text for a WinAnsi-encoded standard font. Characters outside the
/// encoding become `?`.
#[must_use]
pub fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' | '\u{A0}'..='\u{FF}' => u8::try_from(u32::from(c)).unwrap_or(b'?'),
            '€' => 0x80,
            '…' => 0x85,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            _ => b'?',
        })
        .collect()
}

fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

#[allow(clippy::cast_possible_truncation)]
fn pt(value: f64) -> f32 {
    value as f32
}

fn image_name(index: usize) -> String {
    format!("Im{index}")
}

#[allow(clippy::cast_possible_truncation)]
fn pdf_date(time: &DateTime<Local>) -> Date {
    Date::new(u16::try_from(time.year()).unwrap_or(1970))
        .month(time.month() as u8)
        .day(time.day() as u8)
        .hour(time.hour() as u8)
        .minute(time.minute() as u8)
        .second(time.second() as u8)
}

fn show_text(content: &mut Content, x: f64, y: f64, text: &str, font: Font, size: f64, tone: Tone) {
    let (r, g, b) = tone.rgb();
    content.set_fill_rgb(r, g, b);
    content.begin_text();
    content.set_font(Name(font.resource_name()), pt(size));
    content.next_line(pt(x), pt(y));
    content.show(Str(&win_ansi(text)));
    content.end_text();
}

fn page_content(layout: &Layout, page_index: usize) -> Vec<u8> {
    let geometry = &layout.geometry;
    let mut content = Content::new();

    for item in &layout.pages[page_index].items {
        match item {
            Item::Text { x, y, text, style } => {
                show_text(&mut content, *x, *y, text, style.font, style.size, style.tone);
            }
            Item::Rule { x1, x2, y } => {
                let (r, g, b) = Tone::Muted.rgb();
                content.set_stroke_rgb(r, g, b);
                content.set_line_width(0.75);
                content.move_to(pt(*x1), pt(*y));
                content.line_to(pt(*x2), pt(*y));
                content.stroke();
            }
            Item::Image {
                x,
                y,
                width,
                height,
                image,
            } => {
                let name = image_name(*image);
                content.save_state();
                content.transform([pt(*width), 0.0, 0.0, pt(*height), pt(*x), pt(*y)]);
                content.x_object(Name(name.as_bytes()));
                content.restore_state();
            }
        }
    }

    let footer = format!("Page {} of {}", page_index + 1, layout.page_count());
    let footer_width = text_width(&footer, Font::Regular, FOOTER_SIZE);
    show_text(
        &mut content,
        (geometry.width - footer_width) / 2.0,
        geometry.margin / 2.0,
        &footer,
        Font::Regular,
        FOOTER_SIZE,
        Tone::Muted,
    );

    content.finish()
}

/// Serialize `layout` to PDF bytes. Nothing is returned unless the whole
/// document was written.
///
/// # Errors
/// Returns `ReportError::Io` if a stream cannot be compressed.
#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
pub fn write_pdf(layout: &Layout, info: &DocumentInfo) -> Result<Vec<u8>> {
    let mut alloc = Ref::new(1);
    let catalog_id = alloc.bump();
    let tree_id = alloc.bump();
    let info_id = alloc.bump();
    let regular_id = alloc.bump();
    let bold_id = alloc.bump();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(tree_id);
    pdf.document_info(info_id)
        .title(TextStr(&info.title))
        .author(TextStr(&info.author))
        .producer(TextStr(PRODUCER))
        .creation_date(pdf_date(&info.created));

    for (id, font) in [(regular_id, Font::Regular), (bold_id, Font::Bold)] {
        pdf.type1_font(id)
            .base_font(Name(font.base_name()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    let mut image_ids = Vec::with_capacity(layout.images.len());
    for image in &layout.images {
        let id = alloc.bump();
        let data = deflate(&image.rgb)?;
        let mut xobject = pdf.image_xobject(id, &data);
        xobject.filter(Filter::FlateDecode);
        xobject.width(image.width as i32);
        xobject.height(image.height as i32);
        xobject.color_space().device_rgb();
        xobject.bits_per_component(8);
        xobject.finish();
        image_ids.push(id);
    }

    let page_ids: Vec<(Ref, Ref)> = layout.pages.iter().map(|_| (alloc.bump(), alloc.bump())).collect();
    pdf.pages(tree_id)
        .kids(page_ids.iter().map(|(page_id, _)| *page_id))
        .count(page_ids.len() as i32);

    let media_box = Rect::new(0.0, 0.0, pt(layout.geometry.width), pt(layout.geometry.height));
    for (index, (page_id, content_id)) in page_ids.iter().enumerate() {
        let mut page = pdf.page(*page_id);
        page.media_box(media_box);
        page.parent(tree_id);
        page.contents(*content_id);

        let mut resources = page.resources();
        resources
            .fonts()
            .pair(Name(Font::Regular.resource_name()), regular_id)
            .pair(Name(Font::Bold.resource_name()), bold_id);
        let used: Vec<usize> = layout.pages[index]
            .items
            .iter()
            .filter_map(|item| match item {
                Item::Image { image, .. } => Some(*image),
                _ => None,
            })
            .collect();
        if !used.is_empty() {
            let mut xobjects = resources.x_objects();
            for image in used {
                let name = image_name(image);
                xobjects.pair(Name(name.as_bytes()), image_ids[image]);
            }
            xobjects.finish();
        }
        resources.finish();
        page.finish();

        let content = deflate(&page_content(layout, index))?;
        pdf.stream(*content_id, &content).filter(Filter::FlateDecode);
    }

    Ok(pdf.finish())
}

#[cfg(test)]
#[path = "pdf_tests.rs"]
mod tests;
