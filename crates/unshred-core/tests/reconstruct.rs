//! Integration test: cut a synthetic image into strips, shuffle them,
//! encode each as BMP, and check the reconstruction restores the image.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use unshred_core::{
    MatcherKind, Pixel, ReconstructConfig, RgbImage, Strip, build_order, fingerprint,
    reconstruct, reconstruct_bytes,
};

const STRIP_COUNT: u32 = 16;
const STRIP_HEIGHT: u32 = 5;
const WIDTH: u32 = 12;

/// A smooth vertical gradient with some horizontal texture.
fn source_image() -> RgbImage {
    RgbImage::from_fn(WIDTH, STRIP_COUNT * STRIP_HEIGHT, |x, y| {
        let v = u8::try_from(y * 3).unwrap();
        let h = u8::try_from(x * 21).unwrap();
        image::Rgb([v, h, 255 - v])
    })
}

fn cut(image: &RgbImage) -> Vec<Strip> {
    (0..STRIP_COUNT)
        .map(|i| {
            let view = image::imageops::crop_imm(image, 0, i * STRIP_HEIGHT, WIDTH, STRIP_HEIGHT);
            Strip::new(view.to_image())
        })
        .collect()
}

/// Fixed permutation: input position -> original strip index.
const SHUFFLE: [usize; 16] = [9, 3, 14, 0, 7, 12, 5, 15, 1, 10, 4, 13, 8, 2, 11, 6];

fn shuffled() -> Vec<Strip> {
    let strips = cut(&source_image());
    SHUFFLE.iter().map(|&i| strips[i].clone()).collect()
}

fn encode_bmp(strip: &Strip) -> Vec<u8> {
    let img = strip.as_image();
    let mut buf = Vec::new();
    let encoder = image::codecs::bmp::BmpEncoder::new(&mut buf);
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
fn shuffled_strips_are_restored() {
    let _ = env_logger::builder().is_test(true).try_init();

    let strips = shuffled();
    let result = reconstruct(&strips, &ReconstructConfig::default()).unwrap();

    let restored: Vec<usize> = result.order.iter().map(|&i| SHUFFLE[i]).collect();
    assert_eq!(restored, (0..16).collect::<Vec<_>>());
    assert!(result.is_complete());
    assert_eq!(result.image, source_image());
}

#[test]
fn bmp_round_trip_restores_image() {
    let sources: Vec<Vec<u8>> = shuffled().iter().map(encode_bmp).collect();
    let result = reconstruct_bytes(&sources, &ReconstructConfig::default()).unwrap();
    assert_eq!(result.dimensions.width, WIDTH);
    assert_eq!(result.dimensions.height, STRIP_COUNT * STRIP_HEIGHT);
    assert_eq!(result.image, source_image());
}

#[test]
fn ordering_is_a_permutation_without_duplicates() {
    let strips = shuffled();
    let ordering = build_order(&strips, MatcherKind::NearestSeam).unwrap();
    let mut seen = ordering.order.clone();
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen.len(), strips.len());
    assert!(ordering.dropped.is_empty());
}

#[test]
fn output_height_is_sum_of_strip_heights() {
    // Strips of varying heights from the same gradient.
    let image = source_image();
    let cuts = [(0, 3), (3, 11), (14, 2), (16, 30), (46, 34)];
    let strips: Vec<Strip> = cuts
        .iter()
        .rev()
        .map(|&(y, h)| Strip::new(image::imageops::crop_imm(&image, 0, y, WIDTH, h).to_image()))
        .collect();
    let result = reconstruct(&strips, &ReconstructConfig::default()).unwrap();
    assert_eq!(result.dimensions.height, 80);
    assert_eq!(result.order, vec![4, 3, 2, 1, 0]);
    assert_eq!(result.image, image);
}

#[test]
fn pipeline_is_idempotent() {
    let strips = shuffled();
    let config = ReconstructConfig::default();
    let runs: Vec<u64> = (0..3)
        .map(|_| fingerprint(&reconstruct(&strips, &config).unwrap().image))
        .collect();
    assert!(runs.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn zero_distance_candidate_always_wins() {
    // The strip continuing exactly below the current top is chosen even
    // when it is last in the pool.
    let current = Strip::from_fn(4, 2, |_, _| Pixel::new(120, 120, 120));
    let pool = [
        Strip::from_fn(4, 2, |_, _| Pixel::new(121, 120, 120)),
        Strip::from_fn(4, 2, |_, _| Pixel::new(0, 0, 0)),
        Strip::from_fn(4, 2, |_, y| {
            if y == 1 {
                Pixel::new(120, 120, 120)
            } else {
                Pixel::new(255, 0, 0)
            }
        }),
    ];
    let candidates: Vec<unshred_core::Candidate<'_>> = pool
        .iter()
        .enumerate()
        .map(|(index, strip)| unshred_core::Candidate { index, strip })
        .collect();
    assert_eq!(
        unshred_core::find_best_above(&current, &candidates),
        Some(2)
    );
}
