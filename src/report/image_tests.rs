use super::*;
use crate::chart::{ChartKind, ChartSize, MINIMAL_PNG, Series, render};

fn encode(width: u32, height: u32, color: png::ColorType, data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut encoder = png::Encoder::new(&mut out, width, height);
    encoder.set_color(color);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.write_header().unwrap().write_image_data(data).unwrap();
    out
}

#[test]
fn rgb_passes_through() {
    let bytes = encode(2, 1, png::ColorType::Rgb, &[1, 2, 3, 4, 5, 6]);
    let image = decode_png(&bytes).unwrap();
    assert_eq!((image.width, image.height), (2, 1));
    assert_eq!(image.rgb, [1, 2, 3, 4, 5, 6]);
}

#[test]
fn transparent_pixels_become_white() {
    let bytes = encode(2, 1, png::ColorType::Rgba, &[0, 0, 0, 0, 10, 20, 30, 255]);
    let image = decode_png(&bytes).unwrap();
    assert_eq!(image.rgb, [255, 255, 255, 10, 20, 30]);
}

#[test]
fn grayscale_is_expanded() {
    let bytes = encode(1, 1, png::ColorType::Grayscale, &[77]);
    assert_eq!(decode_png(&bytes).unwrap().rgb, [77, 77, 77]);
}

#[test]
fn garbage_is_a_decode_error() {
    let err = decode_png(b"not a png").unwrap_err();
    assert!(matches!(err, ChartRenderError::Decode(_)));
}

#[test]
fn rendered_charts_decode() {
    let series: Series = [("Pump".to_string(), 2.0)].into_iter().collect();
    let image = decode_png(&render(&series, ChartKind::Bar, ChartSize::new(100.0, 50.0))).unwrap();
    assert_eq!((image.width, image.height), (200, 100));
    assert_eq!(image.rgb.len(), 200 * 100 * 3);
    assert!((image.aspect_ratio() - 0.5).abs() < 1e-9);
}

#[test]
fn minimal_png_decodes_to_one_white_pixel() {
    let image = decode_png(MINIMAL_PNG).unwrap();
    assert_eq!(image.rgb, [255, 255, 255]);
}
