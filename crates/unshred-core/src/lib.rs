//! unshred-core: Reassemble an image from horizontal strips (sans-IO).
//!
//! Orders strips through:
//! decode -> width check -> bottom strip selection -> upward chaining ->
//! vertical compositing.
//!
//! Ordering uses only the first and last row of each strip. The bottom
//! strip is the one whose best possible continuation below is the worst
//! (maximin); the sequence is then grown upward by repeatedly attaching
//! the strip whose bottom row best matches the current top row.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! byte slices and strips and returns structured data. File handling
//! lives in the `unshred` binary and encoding in `unshred-export`.

pub mod anchor;
pub mod chain;
pub mod composite;
pub mod decode;
pub mod diagnostics;
pub mod distance;
pub mod sequence;
pub mod types;

pub use anchor::{Anchor, select_bottom};
pub use chain::{Candidate, MatcherKind, UpwardMatcher, find_best_above};
pub use composite::{fingerprint, stack_vertically, validate_widths};
pub use distance::row_distance;
pub use sequence::{Ordering, SequenceBuilder, build_order};
pub use types::{
    Dimensions, Pixel, ReconstructConfig, ReconstructError, Reconstruction, RgbImage, Row, Strip,
};

/// Order and composite already-decoded strips.
///
/// # Steps
///
/// 1. Width validation (when `config.check_widths` is set)
/// 2. Bottom strip selection (skipped for a single strip)
/// 3. Upward chaining with `config.matcher`
/// 4. Vertical compositing in the chosen order
///
/// Strips the matcher never placed are listed in
/// [`Reconstruction::dropped`] and left out of the image.
///
/// # Errors
///
/// Returns [`ReconstructError::EmptyInput`] if `strips` is empty.
/// Returns [`ReconstructError::EmptyStrip`] or
/// [`ReconstructError::DimensionMismatch`] if width validation fails.
pub fn reconstruct(
    strips: &[Strip],
    config: &ReconstructConfig,
) -> Result<Reconstruction, ReconstructError> {
    if strips.is_empty() {
        return Err(ReconstructError::EmptyInput);
    }

    // 1. Optional width validation.
    if config.check_widths {
        validate_widths(strips)?;
    }

    // 2 + 3. Anchor selection and upward chaining.
    let ordering = build_order(strips, config.matcher)?;

    // 4. Compositing.
    let ordered: Vec<&Strip> = ordering.order.iter().map(|&i| &strips[i]).collect();
    let image = stack_vertically(&ordered)?;
    let dimensions = Dimensions {
        width: image.width(),
        height: image.height(),
    };

    Ok(Reconstruction {
        image,
        order: ordering.order,
        dropped: ordering.dropped,
        dimensions,
    })
}

/// Decode encoded strips (BMP, PNG) and reconstruct them.
///
/// `sources` are the raw file contents in input order; indices in the
/// result refer to positions in `sources`.
///
/// # Errors
///
/// Returns [`ReconstructError::EmptyInput`] if `sources` is empty.
/// Returns [`ReconstructError::ImageDecode`] if any source fails to decode.
/// Otherwise the same errors as [`reconstruct`].
pub fn reconstruct_bytes<B: AsRef<[u8]>>(
    sources: &[B],
    config: &ReconstructConfig,
) -> Result<Reconstruction, ReconstructError> {
    let strips = decode::decode_strips(sources)?;
    reconstruct(&strips, config)
}
