//! Row dissimilarity: how badly two pixel rows would form a seam.
//!
//! The score is the sum over index-aligned pixel pairs of the squared
//! per-channel differences. It is not normalized by row length; scores
//! are only ever compared between rows of the same width within one run.

use crate::types::Row;

/// Sum of squared channel differences between two rows.
///
/// Zero exactly when the rows are pixel-identical. Symmetric in its
/// arguments. Rows of different lengths are compared over the shorter
/// length only; callers are expected to pass equal-width rows.
#[must_use]
pub fn row_distance(a: Row<'_>, b: Row<'_>) -> u64 {
    a.pixels()
        .zip(b.pixels())
        .map(|(p, q)| p.distance_squared(q))
        .sum()
}
