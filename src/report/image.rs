//! Chart PNGs decoded into raw RGB for embedding.

use png::{ColorType, Decoder, Transformations};

use crate::chart::ChartRenderError;

/// An 8-bit RGB raster, alpha already composited on white.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

impl DecodedImage {
    /// Height divided by width.
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.height) / f64::from(self.width.max(1))
    }
}

/// Decode a PNG of any color type into RGB.
///
/// # Errors
/// Returns `ChartRenderError::Decode` if the bytes are not a valid PNG.
pub fn decode_png(bytes: &[u8]) -> Result<DecodedImage, ChartRenderError> {
    let mut decoder = Decoder::new(bytes);
    decoder.set_transformations(Transformations::normalize_to_color8());
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buf)?;
    let data = &buf[..frame.buffer_size()];

    let rgb = match frame.color_type {
        ColorType::Rgb => data.to_vec(),
        ColorType::Rgba => data
            .chunks_exact(4)
            .flat_map(|px| [over_white(px[0], px[3]), over_white(px[1], px[3]), over_white(px[2], px[3])])
            .collect(),
        ColorType::Grayscale => data.iter().flat_map(|&g| [g, g, g]).collect(),
        ColorType::GrayscaleAlpha => data
            .chunks_exact(2)
            .flat_map(|px| {
                let g = over_white(px[0], px[1]);
                [g, g, g]
            })
            .collect(),
        // Palette images are expanded by the normalize transformation.
        ColorType::Indexed => {
            return Err(ChartRenderError::Decode(png::DecodingError::LimitsExceeded));
        }
    };

    Ok(DecodedImage {
        width: frame.width,
        height: frame.height,
        rgb,
    })
}

#[allow(clippy::cast_possible_truncation)]
fn over_white(channel: u8, alpha: u8) -> u8 {
    let (c, a) = (u32::from(channel), u32::from(alpha));
    ((c * a + 255 * (255 - a) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "image_tests.rs"]
mod tests;
