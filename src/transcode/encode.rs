//! Format encoders.
//!
//! | Format | Backend            | Quality  |
//! |--------|--------------------|----------|
//! | WebP   | `webp` (lossy)     | 0-100    |
//! | AVIF   | `ravif`            | 0-100    |
//! | JPEG   | `image`            | 1-100    |
//! | PNG    | `image`            | ignored  |

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder};
use ravif::{Img, RGBA8};

use super::TranscodeError;

/// ravif speed preset (1 = slowest/best, 10 = fastest).
const AVIF_SPEED: u8 = 6;

/// Fails for images wider or taller than 16383 pixels.
pub fn webp(image: &DynamicImage, quality: u8) -> Result<Vec<u8>, TranscodeError> {
    let rgba = image.to_rgba8();
    let encoded = ::webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height())
        .encode_simple(false, f32::from(quality.min(100)))
        .map_err(|e| TranscodeError::Webp(format!("{e:?}")))?;
    Ok(encoded.to_vec())
}

pub fn avif(image: &DynamicImage, quality: u8) -> Result<Vec<u8>, TranscodeError> {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let pixels: Vec<RGBA8> = rgba
        .pixels()
        .map(|p| RGBA8::new(p[0], p[1], p[2], p[3]))
        .collect();

    let encoded = ravif::Encoder::new()
        .with_quality(f32::from(quality))
        .with_speed(AVIF_SPEED)
        .encode_rgba(Img::new(pixels.as_slice(), width as usize, height as usize))
        .map_err(|e| TranscodeError::Avif(e.to_string()))?;
    Ok(encoded.avif_file)
}

pub fn jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>, TranscodeError> {
    let rgb = image.to_rgb8();
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100))
        .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
        .map_err(|source| TranscodeError::Encode {
            format: "jpeg",
            source,
        })?;
    Ok(out)
}

pub fn png(image: &DynamicImage) -> Result<Vec<u8>, TranscodeError> {
    let rgba = image.to_rgba8();
    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(rgba.as_raw(), rgba.width(), rgba.height(), ExtendedColorType::Rgba8)
        .map_err(|source| TranscodeError::Encode {
            format: "png",
            source,
        })?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};

    fn sample() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(16, 8, Rgba([200, 40, 40, 255])))
    }

    /// Diagonal stripes, so lossy quality settings have something to lose.
    fn detailed() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(64, 64, |x, y| {
            let v = ((x * 7 + y * 13) % 256) as u8;
            Rgba([v, 255 - v, (x * y % 256) as u8, 255])
        }))
    }

    #[test]
    fn test_webp_roundtrip_dimensions() {
        let bytes = webp(&sample(), 80).unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WEBP");

        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::WebP).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 8));
    }

    #[test]
    fn test_webp_quality_changes_output() {
        let low = webp(&detailed(), 10).unwrap();
        let high = webp(&detailed(), 95).unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn test_webp_rejects_oversized() {
        let wide = DynamicImage::new_rgb8(16384, 1);
        assert!(matches!(webp(&wide, 80), Err(TranscodeError::Webp(_))));
    }

    #[test]
    fn test_jpeg_drops_alpha() {
        let bytes = jpeg(&sample(), 0).unwrap();
        assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_png_signature() {
        let bytes = png(&sample()).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }
}
