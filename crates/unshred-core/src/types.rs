//! Shared types for the unshred reconstruction core.

use serde::{Deserialize, Serialize};

use crate::chain::MatcherKind;

/// Re-export `RgbImage` so downstream crates can build strips and read
/// the composited output without depending on `image` directly.
pub use image::RgbImage;

/// A single RGB pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Pixel {
    /// Red channel intensity.
    pub r: u8,
    /// Green channel intensity.
    pub g: u8,
    /// Blue channel intensity.
    pub b: u8,
}

impl Pixel {
    /// Create a new pixel.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Sum of squared per-channel differences to another pixel.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> u64 {
        let dr = i32::from(self.r) - i32::from(other.r);
        let dg = i32::from(self.g) - i32::from(other.g);
        let db = i32::from(self.b) - i32::from(other.b);
        u64::from((dr * dr + dg * dg + db * db).unsigned_abs())
    }
}

impl From<image::Rgb<u8>> for Pixel {
    fn from(rgb: image::Rgb<u8>) -> Self {
        let [r, g, b] = rgb.0;
        Self { r, g, b }
    }
}

impl From<Pixel> for image::Rgb<u8> {
    fn from(p: Pixel) -> Self {
        Self([p.r, p.g, p.b])
    }
}

/// Borrowed view of one row of a [`Strip`].
///
/// The slice holds packed RGB bytes; a trailing partial pixel is never
/// produced because rows always come from an `RgbImage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Row<'a>(&'a [u8]);

impl<'a> Row<'a> {
    /// Number of pixels in the row.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len() / 3
    }

    /// Returns `true` if the row has no pixels.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over the row's pixels from left to right.
    pub fn pixels(self) -> impl Iterator<Item = Pixel> + 'a {
        self.0
            .chunks_exact(3)
            .map(|c| Pixel::new(c[0], c[1], c[2]))
    }
}

/// An immutable horizontal slice of the image being reconstructed.
///
/// Only the first and last rows take part in ordering; height is
/// otherwise irrelevant until compositing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strip(RgbImage);

impl Strip {
    /// Wrap a decoded RGB image.
    #[must_use]
    pub const fn new(image: RgbImage) -> Self {
        Self(image)
    }

    /// Build a strip by evaluating `f(col, row)` for every pixel.
    #[must_use]
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Pixel) -> Self {
        Self(RgbImage::from_fn(width, height, |x, y| f(x, y).into()))
    }

    /// Build a strip whose every row is a copy of `row`.
    #[must_use]
    pub fn from_row(row: &[Pixel], height: u32) -> Self {
        let width = u32::try_from(row.len()).unwrap_or(u32::MAX);
        Self::from_fn(width, height, |x, _| row[x as usize])
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.0.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.0.height()
    }

    /// Width and height.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width(),
            height: self.height(),
        }
    }

    /// Returns `true` if the strip has no pixels (and so no rows to match).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Pixel at `row`, `col` (row-major, origin top-left).
    ///
    /// Returns `None` outside the strip.
    #[must_use]
    pub fn pixel(&self, row: u32, col: u32) -> Option<Pixel> {
        self.0.get_pixel_checked(col, row).map(|p| Pixel::from(*p))
    }

    /// Row `y`, or `None` past the bottom.
    #[must_use]
    pub fn row(&self, y: u32) -> Option<Row<'_>> {
        if y >= self.height() {
            return None;
        }
        let stride = self.width() as usize * 3;
        let start = y as usize * stride;
        self.0.as_raw().get(start..start + stride).map(Row)
    }

    /// Top row. Empty for a degenerate strip.
    #[must_use]
    pub fn first_row(&self) -> Row<'_> {
        self.row(0).unwrap_or_default()
    }

    /// Bottom row. Empty for a degenerate strip.
    #[must_use]
    pub fn last_row(&self) -> Row<'_> {
        self.height()
            .checked_sub(1)
            .and_then(|y| self.row(y))
            .unwrap_or_default()
    }

    /// Borrow the underlying image.
    #[must_use]
    pub const fn as_image(&self) -> &RgbImage {
        &self.0
    }
}

impl From<RgbImage> for Strip {
    fn from(image: RgbImage) -> Self {
        Self(image)
    }
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Configuration for a reconstruction run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconstructConfig {
    /// Reject inputs whose strips differ in width before ordering.
    ///
    /// When disabled, mismatched widths are not detected and the
    /// compositor clips or pads each strip to the first strip's width.
    pub check_widths: bool,

    /// Which matcher grows the sequence upward from the anchor.
    pub matcher: MatcherKind,
}

impl ReconstructConfig {
    /// Default for [`check_widths`](Self::check_widths).
    pub const DEFAULT_CHECK_WIDTHS: bool = true;

    /// Default for [`matcher`](Self::matcher).
    pub const DEFAULT_MATCHER: MatcherKind = MatcherKind::NearestSeam;
}

impl Default for ReconstructConfig {
    fn default() -> Self {
        Self {
            check_widths: Self::DEFAULT_CHECK_WIDTHS,
            matcher: Self::DEFAULT_MATCHER,
        }
    }
}

/// Result of a full reconstruction.
#[derive(Debug, Clone)]
pub struct Reconstruction {
    /// The composited image, strips stacked top to bottom.
    pub image: RgbImage,

    /// Input indices of the placed strips, top to bottom.
    pub order: Vec<usize>,

    /// Input indices of strips that were never placed, in input order.
    ///
    /// Empty unless the matcher stopped before the pool ran dry.
    pub dropped: Vec<usize>,

    /// Dimensions of [`image`](Self::image).
    pub dimensions: Dimensions,
}

impl Reconstruction {
    /// Returns `true` if every input strip made it into the output.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.dropped.is_empty()
    }
}

/// Errors that can occur during reconstruction.
#[derive(Debug, thiserror::Error)]
pub enum ReconstructError {
    /// No strips were supplied.
    #[error("no strips to reconstruct")]
    EmptyInput,

    /// A strip's bytes could not be decoded.
    #[error("failed to decode strip {index}: {source}")]
    ImageDecode {
        /// Position of the strip in the input.
        index: usize,
        /// Underlying decoder error.
        #[source]
        source: image::ImageError,
    },

    /// A strip has zero width or height.
    #[error("strip {index} has no pixels")]
    EmptyStrip {
        /// Position of the strip in the input.
        index: usize,
    },

    /// A strip's width differs from the first strip's width.
    #[error("strip {index} is {found} pixels wide, expected {expected}")]
    DimensionMismatch {
        /// Position of the offending strip in the input.
        index: usize,
        /// Width of the first strip.
        expected: u32,
        /// Width of the offending strip.
        found: u32,
    },

    /// Configuration is invalid.
    #[error("invalid reconstruction configuration: {0}")]
    InvalidConfig(String),
}
