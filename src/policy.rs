//! Candidate selection strategies.
//!
//! The induction driver mines a [`Histogram`] and asks a [`Selector`] which
//! patterns to turn into rules. Two strategies are provided:
//!
//! - [`BestCandidate`] ranks every eligible key by the literal symbols it
//!   would save (`concrete length × occurrences`) and the driver replaces
//!   the top one per pass.
//! - [`NgramSet`] keeps every bigram seen at least `multiplicity` times and
//!   the driver replaces all of them in one left-to-right sweep.
//!
//! A run uses exactly one strategy.

use crate::histogram::Histogram;
use crate::pattern::Pattern;
use std::cmp::Reverse;
use std::collections::BTreeSet;

/// A scored candidate pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub pattern: Pattern,
    /// Overlapping occurrences counted by the miner.
    pub count: usize,
    /// Literal symbols covered: `concrete_len × count`.
    pub score: usize,
}

/// What a selector wants replaced this pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Candidates in preference order; the first one that still pays off is
    /// replaced.
    Ranked(Vec<Candidate>),
    /// Every pattern in the set is replaced during a single sweep.
    Sweep(BTreeSet<Pattern>),
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        match self {
            Selection::Ranked(candidates) => candidates.is_empty(),
            Selection::Sweep(patterns) => patterns.is_empty(),
        }
    }
}

/// A pluggable candidate selection strategy.
pub trait Selector {
    /// Longest key the miner should build.
    fn window(&self) -> usize;

    /// Decides what to replace from a freshly mined histogram.
    fn select(&self, histogram: &Histogram) -> Selection;

    /// Whether the driver stops once a pass saves less than half the
    /// previous best.
    fn decays(&self) -> bool {
        false
    }
}

/// Bytes-saved scoring over contiguous and gapped keys.
#[derive(Debug, Clone, Copy)]
pub struct BestCandidate {
    pub max_window: usize,
    pub decay: bool,
}

impl BestCandidate {
    pub fn new(max_window: usize) -> Self {
        Self {
            max_window,
            decay: true,
        }
    }
}

impl Selector for BestCandidate {
    fn window(&self) -> usize {
        self.max_window
    }

    /// Ranks keys that occur more than once by score, highest first, ties
    /// broken by ascending pattern order.
    ///
    /// Keys with interior wildcards are skipped: a rule body must be concrete.
    fn select(&self, histogram: &Histogram) -> Selection {
        let mut candidates: Vec<Candidate> = histogram
            .iter()
            .filter(|(pattern, count)| *count > 1 && pattern.is_concrete())
            .map(|(pattern, count)| Candidate {
                pattern: pattern.clone(),
                count,
                score: pattern.concrete_len() * count,
            })
            .collect();

        candidates.sort_by(|a, b| {
            (Reverse(a.score), &a.pattern).cmp(&(Reverse(b.score), &b.pattern))
        });

        Selection::Ranked(candidates)
    }

    fn decays(&self) -> bool {
        self.decay
    }
}

/// Bigram multiplicity threshold with whole-set replacement.
#[derive(Debug, Clone, Copy)]
pub struct NgramSet {
    pub multiplicity: usize,
}

impl Default for NgramSet {
    fn default() -> Self {
        Self { multiplicity: 4 }
    }
}

impl Selector for NgramSet {
    fn window(&self) -> usize {
        2
    }

    fn select(&self, histogram: &Histogram) -> Selection {
        let patterns = histogram
            .iter()
            .filter(|(pattern, count)| {
                pattern.len() == 2 && pattern.is_concrete() && *count >= self.multiplicity
            })
            .map(|(pattern, _)| pattern.clone())
            .collect();

        Selection::Sweep(patterns)
    }
}
