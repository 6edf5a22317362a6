//! Vertical compositing: stack ordered strips into one image.
//!
//! Each strip lands at a vertical offset equal to the total height of
//! the strips above it. Pixels are copied as-is, with no blending or
//! color conversion.

use std::hash::Hasher;

use siphasher::sip::SipHasher13;

use crate::types::{ReconstructError, RgbImage, Strip};

/// Check that every strip is non-empty and as wide as the first.
///
/// # Errors
///
/// Returns [`ReconstructError::EmptyInput`] if `strips` is empty.
/// Returns [`ReconstructError::EmptyStrip`] for the first strip with zero
/// width or height.
/// Returns [`ReconstructError::DimensionMismatch`] for the first strip
/// whose width differs from strip 0.
pub fn validate_widths(strips: &[Strip]) -> Result<u32, ReconstructError> {
    let first = strips.first().ok_or(ReconstructError::EmptyInput)?;
    let expected = first.width();

    for (index, strip) in strips.iter().enumerate() {
        if strip.is_empty() {
            return Err(ReconstructError::EmptyStrip { index });
        }
        if strip.width() != expected {
            return Err(ReconstructError::DimensionMismatch {
                index,
                expected,
                found: strip.width(),
            });
        }
    }

    Ok(expected)
}

/// Stack strips top to bottom into a single image.
///
/// The output is as wide as the first strip and as tall as all strips
/// combined. Widths are not checked here (see [`validate_widths`]): a
/// wider strip is clipped on the right and a narrower one leaves the
/// remaining columns black.
///
/// # Errors
///
/// Returns [`ReconstructError::EmptyInput`] if `strips` is empty.
pub fn stack_vertically(strips: &[&Strip]) -> Result<RgbImage, ReconstructError> {
    let first = strips.first().ok_or(ReconstructError::EmptyInput)?;
    let width = first.width();
    let height = strips
        .iter()
        .map(|s| s.height())
        .fold(0u32, u32::saturating_add);

    let mut output = RgbImage::new(width, height);
    let mut offset = 0u32;

    for strip in strips {
        let columns = strip.width().min(width);
        for row in 0..strip.height() {
            let Some(y) = offset.checked_add(row).filter(|&y| y < height) else {
                break;
            };
            for col in 0..columns {
                if let Some(pixel) = strip.pixel(row, col) {
                    output.put_pixel(col, y, pixel.into());
                }
            }
        }
        offset = offset.saturating_add(strip.height());
    }

    Ok(output)
}

/// Stable 64-bit digest of an image's dimensions and pixels.
///
/// Two runs over the same input produce the same fingerprint exactly
/// when their composited images are bit-identical.
#[must_use]
pub fn fingerprint(image: &RgbImage) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(0, 0);
    hasher.write_u32(image.width());
    hasher.write_u32(image.height());
    hasher.write(image.as_raw());
    hasher.finish()
}
