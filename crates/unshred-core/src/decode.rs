//! Strip decoding.
//!
//! Accepts raw image bytes (BMP or PNG) and produces an RGB [`Strip`].
//! Alpha, palette, and grayscale inputs are converted to 8-bit RGB so
//! every strip compares in the same color space.

use crate::types::{ReconstructError, Strip};

/// Decode raw image bytes into a strip.
///
/// `index` is the strip's position in the input and is only used to
/// label errors.
///
/// # Errors
///
/// Returns [`ReconstructError::ImageDecode`] if the format is
/// unrecognized or the data is corrupt (including empty input).
pub fn decode_strip(bytes: &[u8], index: usize) -> Result<Strip, ReconstructError> {
    let img = image::load_from_memory(bytes)
        .map_err(|source| ReconstructError::ImageDecode { index, source })?;
    Ok(Strip::new(img.to_rgb8()))
}

/// Decode every source in order.
///
/// # Errors
///
/// Returns [`ReconstructError::EmptyInput`] if `sources` is empty.
/// Returns the first [`ReconstructError::ImageDecode`] encountered.
pub fn decode_strips<B: AsRef<[u8]>>(sources: &[B]) -> Result<Vec<Strip>, ReconstructError> {
    if sources.is_empty() {
        return Err(ReconstructError::EmptyInput);
    }
    sources
        .iter()
        .enumerate()
        .map(|(index, bytes)| decode_strip(bytes.as_ref(), index))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::Pixel;

    /// Encode an RGBA image as BMP bytes.
    fn encode_bmp(img: &image::RgbaImage) -> Vec<u8> {
        let mut buf = Vec::new();
        let encoder = image::codecs::bmp::BmpEncoder::new(&mut buf);
        image::ImageEncoder::write_image(
            encoder,
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgba8,
        )
        .unwrap();
        buf
    }

    /// Encode an RGB image as PNG bytes.
    fn encode_png(img: &image::RgbImage) -> Vec<u8> {
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(
            encoder,
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgb8,
        )
        .unwrap();
        buf
    }

    #[test]
    fn empty_bytes_return_decode_error() {
        let result = decode_strip(&[], 4);
        assert!(matches!(
            result,
            Err(ReconstructError::ImageDecode { index: 4, .. })
        ));
    }

    #[test]
    fn corrupt_bytes_return_decode_error() {
        let result = decode_strip(&[0xFF, 0xFE, 0x00, 0x01], 0);
        assert!(matches!(
            result,
            Err(ReconstructError::ImageDecode { index: 0, .. })
        ));
    }

    #[test]
    fn bmp_decodes_to_rgb_strip() {
        let img = image::RgbaImage::from_fn(5, 3, |x, y| {
            image::Rgba([u8::try_from(x * 40).unwrap(), u8::try_from(y * 60).unwrap(), 9, 255])
        });
        let strip = decode_strip(&encode_bmp(&img), 0).unwrap();
        assert_eq!(strip.width(), 5);
        assert_eq!(strip.height(), 3);
        assert_eq!(strip.pixel(2, 4), Some(Pixel::new(160, 120, 9)));
    }

    #[test]
    fn png_decodes_to_rgb_strip() {
        let img = image::RgbImage::from_fn(2, 2, |x, _| image::Rgb([0, 0, u8::try_from(x).unwrap()]));
        let strip = decode_strip(&encode_png(&img), 0).unwrap();
        assert_eq!(strip.as_image(), &img);
    }

    #[test]
    fn decode_strips_preserves_order() {
        let a = image::RgbImage::from_pixel(1, 1, image::Rgb([1, 1, 1]));
        let b = image::RgbImage::from_pixel(1, 1, image::Rgb([2, 2, 2]));
        let strips = decode_strips(&[encode_png(&a), encode_png(&b)]).unwrap();
        assert_eq!(strips.len(), 2);
        assert_eq!(strips[0].pixel(0, 0), Some(Pixel::new(1, 1, 1)));
        assert_eq!(strips[1].pixel(0, 0), Some(Pixel::new(2, 2, 2)));
    }

    #[test]
    fn decode_strips_reports_failing_index() {
        let good = encode_png(&image::RgbImage::new(1, 1));
        let result = decode_strips(&[good.clone(), good, vec![0x00]]);
        assert!(matches!(
            result,
            Err(ReconstructError::ImageDecode { index: 2, .. })
        ));
    }

    #[test]
    fn decode_strips_rejects_no_sources() {
        let result = decode_strips::<Vec<u8>>(&[]);
        assert!(matches!(result, Err(ReconstructError::EmptyInput)));
    }
}
