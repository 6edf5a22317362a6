//! Upward chaining: find the strip that belongs directly above another.
//!
//! This module defines the [`UpwardMatcher`] trait for pluggable matching
//! strategies and the [`MatcherKind`] enum for selecting one at runtime.
//!
//! A matcher may return `None` even when candidates remain (a stricter
//! heuristic might refuse every seam). The sequence builder treats that
//! as the end of the chain and reports the leftover strips as dropped.

use serde::{Deserialize, Serialize};

use crate::distance::row_distance;
use crate::types::Strip;

/// A strip still in the working set, with its input index.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    /// Input index of the strip.
    pub index: usize,
    /// The strip itself.
    pub strip: &'a Strip,
}

/// Selects which matcher grows the sequence upward.
///
/// Ships with [`NearestSeam`](Self::NearestSeam) only. Additional
/// variants can be added without changing `ReconstructConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MatcherKind {
    /// Greedy nearest neighbor: the candidate whose last row has the
    /// smallest [`row_distance`] to the current strip's first row.
    ///
    /// Never returns `None` for a non-empty pool.
    #[default]
    NearestSeam,
}

impl std::fmt::Display for MatcherKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NearestSeam => f.write_str("NearestSeam"),
        }
    }
}

/// Trait for upward matching strategies.
///
/// Input: the current topmost strip and the remaining candidates in a
/// stable order. Output: the input index of the strip to place above it,
/// or `None` for no match.
pub trait UpwardMatcher {
    /// Pick the candidate that belongs directly above `current`.
    fn best_above(&self, current: &Strip, candidates: &[Candidate<'_>]) -> Option<usize>;
}

impl UpwardMatcher for MatcherKind {
    fn best_above(&self, current: &Strip, candidates: &[Candidate<'_>]) -> Option<usize> {
        match *self {
            Self::NearestSeam => find_best_above(current, candidates),
        }
    }
}

/// Candidate whose bottom row best continues `current`'s top row.
///
/// On exact ties the earliest candidate wins. An empty candidate list
/// yields `None`.
#[must_use]
pub fn find_best_above(current: &Strip, candidates: &[Candidate<'_>]) -> Option<usize> {
    let top_row = current.first_row();

    let mut best: Option<usize> = None;
    let mut best_distance = u64::MAX;

    for candidate in candidates {
        let distance = row_distance(top_row, candidate.strip.last_row());
        if best.is_none() || distance < best_distance {
            best_distance = distance;
            best = Some(candidate.index);
        }
    }

    best
}
