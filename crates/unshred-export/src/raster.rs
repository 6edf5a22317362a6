//! Raster export encoder.
//!
//! Converts a composited RGB image into BMP or PNG bytes using the
//! `image` crate's encoders. BMP is the default because the strips this
//! tool reassembles are usually BMP files themselves.
//!
//! This is a pure function with no I/O -- it returns a `Vec<u8>`.

use std::fmt;
use std::path::Path;

use image::ImageEncoder;
use unshred_core::RgbImage;

/// Errors that can occur while encoding an output image.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The encoder rejected the image.
    #[error("{format} encoding failed: {source}")]
    Encode {
        /// Format being written.
        format: OutputFormat,
        /// Underlying encoder error.
        #[source]
        source: image::ImageError,
    },
}

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Uncompressed 24-bit Windows bitmap.
    #[default]
    Bmp,
    /// Lossless PNG.
    Png,
}

impl OutputFormat {
    /// Infer the format from a path's extension (case-insensitive).
    ///
    /// Returns `None` for a missing or unrecognized extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("bmp") {
            Some(Self::Bmp)
        } else if ext.eq_ignore_ascii_case("png") {
            Some(Self::Png)
        } else {
            None
        }
    }

    /// Conventional file extension, without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Bmp => "bmp",
            Self::Png => "png",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bmp => f.write_str("BMP"),
            Self::Png => f.write_str("PNG"),
        }
    }
}

/// Encode an RGB image in the given format.
///
/// # Errors
///
/// Returns [`ExportError::Encode`] if the encoder rejects the image
/// (for example, dimensions the format cannot represent).
pub fn encode(image: &RgbImage, format: OutputFormat) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Vec::new();
    let result = match format {
        OutputFormat::Bmp => image::codecs::bmp::BmpEncoder::new(&mut bytes).write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgb8,
        ),
        OutputFormat::Png => image::codecs::png::PngEncoder::new(&mut bytes).write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgb8,
        ),
    };
    result.map_err(|source| ExportError::Encode { format, source })?;
    Ok(bytes)
}
