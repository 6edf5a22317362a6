//! Integration test: reconstruct shuffled strips and export the result.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use unshred_core::{Pixel, ReconstructConfig, Strip};
use unshred_export::{OutputFormat, encode};

fn strip(row: u32) -> Strip {
    // Each strip is two rows of a vertical ramp.
    Strip::from_fn(8, 2, |x, y| {
        let v = u8::try_from((row * 2 + y) * 20).unwrap();
        Pixel::new(v, u8::try_from(x * 30).unwrap(), v / 2)
    })
}

#[test]
fn reconstruction_exports_as_bmp() {
    let strips = [strip(2), strip(0), strip(4), strip(1), strip(3)];
    let result = unshred_core::reconstruct(&strips, &ReconstructConfig::default())
        .expect("reconstruction should succeed");
    assert_eq!(result.order, vec![1, 3, 0, 4, 2]);

    let bytes = encode(&result.image, OutputFormat::Bmp).unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
    assert_eq!(decoded.dimensions(), (8, 10));
    assert_eq!(decoded, result.image);

    // Top-left pixel comes from the first row of the ramp.
    assert_eq!(decoded.get_pixel(0, 0).0, [0, 0, 0]);
    assert_eq!(decoded.get_pixel(0, 9).0, [180, 0, 90]);
}
