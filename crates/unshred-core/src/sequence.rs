//! Ordered sequence building: anchor at the bottom, then grow upward.
//!
//! [`SequenceBuilder`] owns the working set of unplaced strips and the
//! ordered sequence for one reconstruction run. Construction selects the
//! anchor; [`SequenceBuilder::grow_upward`] then repeatedly asks an
//! [`UpwardMatcher`] for the strip above the current head and prepends
//! it until the pool is empty or the matcher gives up.
//!
//! Strips are referred to by their index in the input slice throughout,
//! so the pool iterates in input order and tie-breaks are reproducible.

use std::collections::VecDeque;

use log::{debug, trace, warn};

use crate::anchor::{Anchor, select_bottom};
use crate::chain::{Candidate, UpwardMatcher};
use crate::types::{ReconstructError, Strip};

/// Strips not yet placed, iterated in input order.
///
/// Removal flips a flag instead of shifting elements.
#[derive(Debug, Clone)]
pub struct WorkingSet {
    placed: Vec<bool>,
    remaining: usize,
}

impl WorkingSet {
    /// A pool holding indices `0..len`.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            placed: vec![false; len],
            remaining: len,
        }
    }

    /// Number of strips still in the pool.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.remaining
    }

    /// Returns `true` once every strip has been removed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.remaining == 0
    }

    /// Returns `true` if `index` is still in the pool.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.placed.get(index).is_some_and(|placed| !placed)
    }

    /// Remove `index` from the pool.
    ///
    /// Returns `false` if it was out of range or already removed.
    pub fn remove(&mut self, index: usize) -> bool {
        match self.placed.get_mut(index) {
            Some(placed) if !*placed => {
                *placed = true;
                self.remaining -= 1;
                true
            }
            _ => false,
        }
    }

    /// Remaining indices in input order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.placed
            .iter()
            .enumerate()
            .filter(|&(_, placed)| !placed)
            .map(|(i, _)| i)
    }
}

/// Strip indices from top (head) to bottom (tail).
#[derive(Debug, Clone)]
pub struct OrderedSequence(VecDeque<usize>);

impl OrderedSequence {
    /// A sequence holding only the anchor.
    #[must_use]
    pub fn new(anchor: usize) -> Self {
        Self(VecDeque::from([anchor]))
    }

    /// Current topmost strip.
    #[must_use]
    pub fn head(&self) -> usize {
        self.0.front().copied().unwrap_or_default()
    }

    /// Bottom strip; fixed once the sequence is created.
    #[must_use]
    pub fn tail(&self) -> usize {
        self.0.back().copied().unwrap_or_default()
    }

    /// Place `index` above the current head.
    pub fn prepend(&mut self, index: usize) {
        self.0.push_front(index);
    }

    /// Number of placed strips.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`: a sequence starts with its anchor.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Indices from top to bottom.
    #[must_use]
    pub fn into_vec(self) -> Vec<usize> {
        self.0.into()
    }
}

/// Outcome of ordering a strip set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ordering {
    /// Input indices from top to bottom.
    pub order: Vec<usize>,

    /// Input indices never placed, in input order.
    pub dropped: Vec<usize>,

    /// The bottom strip the sequence was grown from.
    pub anchor: Anchor,

    /// Row comparisons made while chaining (anchor selection excluded).
    pub comparisons: usize,
}

/// Builds one top-to-bottom ordering.
#[derive(Debug)]
pub struct SequenceBuilder<'a, M> {
    strips: &'a [Strip],
    matcher: M,
    pool: WorkingSet,
    sequence: OrderedSequence,
    anchor: Anchor,
}

impl<'a, M: UpwardMatcher> SequenceBuilder<'a, M> {
    /// Select the anchor and seed the sequence with it.
    ///
    /// A single strip bypasses anchor selection and is the whole result.
    ///
    /// # Errors
    ///
    /// Returns [`ReconstructError::EmptyInput`] if `strips` is empty.
    pub fn new(strips: &'a [Strip], matcher: M) -> Result<Self, ReconstructError> {
        let anchor = if strips.len() == 1 {
            debug!("single strip, skipping bottom selection");
            Anchor {
                index: 0,
                best_match: None,
            }
        } else {
            select_bottom(strips).ok_or(ReconstructError::EmptyInput)?
        };
        debug!(
            "anchor strip {} (best match below: {:?})",
            anchor.index, anchor.best_match
        );

        let mut pool = WorkingSet::new(strips.len());
        pool.remove(anchor.index);

        Ok(Self {
            strips,
            matcher,
            pool,
            sequence: OrderedSequence::new(anchor.index),
            anchor,
        })
    }

    /// The bottom strip chosen at construction.
    #[must_use]
    pub const fn anchor(&self) -> Anchor {
        self.anchor
    }

    /// Prepend matches until the pool is empty or the matcher gives up.
    #[must_use = "returns the finished ordering"]
    pub fn grow_upward(mut self) -> Ordering {
        let strips = self.strips;
        let mut comparisons = 0;

        while !self.pool.is_empty() {
            let candidates: Vec<Candidate<'_>> = self
                .pool
                .iter()
                .map(|index| Candidate {
                    index,
                    strip: &strips[index],
                })
                .collect();
            comparisons += candidates.len();

            let head = &strips[self.sequence.head()];
            let Some(best) = self.matcher.best_above(head, &candidates) else {
                break;
            };
            if !self.pool.contains(best) {
                // A placed or unknown index would never shrink the pool.
                warn!("matcher returned strip {best} which is not in the pool");
                break;
            }
            self.pool.remove(best);
            trace!("placed strip {best} above strip {}", self.sequence.head());
            self.sequence.prepend(best);
        }

        let dropped: Vec<usize> = self.pool.iter().collect();
        if !dropped.is_empty() {
            warn!(
                "chaining stopped early, dropping {} of {} strips: {dropped:?}",
                dropped.len(),
                strips.len(),
            );
        }
        debug!(
            "ordered {} strips above bottom strip {} with {comparisons} row comparisons",
            self.sequence.len(),
            self.sequence.tail()
        );

        Ordering {
            order: self.sequence.into_vec(),
            dropped,
            anchor: self.anchor,
            comparisons,
        }
    }
}

/// Order `strips` top to bottom using `matcher`.
///
/// # Errors
///
/// Returns [`ReconstructError::EmptyInput`] if `strips` is empty.
pub fn build_order<M: UpwardMatcher>(
    strips: &[Strip],
    matcher: M,
) -> Result<Ordering, ReconstructError> {
    Ok(SequenceBuilder::new(strips, matcher)?.grow_upward())
}
