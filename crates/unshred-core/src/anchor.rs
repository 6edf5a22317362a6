//! Bottom strip selection: pick the anchor the sequence grows up from.
//!
//! A strip that truly sits at the bottom of the original image has
//! nothing below it, so even its best "something continues below me"
//! match is poor. For every candidate we take the minimum distance from
//! its last row to any other strip's first row, then pick the candidate
//! whose minimum is the largest (maximin).

use serde::{Deserialize, Serialize};

use crate::distance::row_distance;
use crate::types::Strip;

/// The strip chosen as the bottom of the reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    /// Input index of the chosen strip.
    pub index: usize,

    /// The anchor's best (lowest) distance from its last row to any other
    /// strip's first row.
    ///
    /// `None` when there was only one strip and nothing to compare.
    pub best_match: Option<u64>,
}

/// Select the strip least likely to have anything below it.
///
/// Ties go to the first candidate in input order. Returns `None` for an
/// empty slice; a single strip is returned as its own anchor without a
/// score.
///
/// Cost is `n * (n - 1)` row comparisons.
#[must_use]
pub fn select_bottom(strips: &[Strip]) -> Option<Anchor> {
    if strips.len() < 2 {
        return strips.first().map(|_| Anchor {
            index: 0,
            best_match: None,
        });
    }

    let mut best: Option<(usize, u64)> = None;

    for (i, candidate) in strips.iter().enumerate() {
        let bottom_row = candidate.last_row();

        // At least one other strip exists, so the minimum is always `Some`.
        let Some(best_below) = strips
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(_, other)| row_distance(bottom_row, other.first_row()))
            .min()
        else {
            continue;
        };

        if best.is_none_or(|(_, worst)| best_below > worst) {
            best = Some((i, best_below));
        }
    }

    best.map(|(index, score)| Anchor {
        index,
        best_match: Some(score),
    })
}
