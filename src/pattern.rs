//! Wildcard-aware pattern matching over a block.

use crate::block::{Block, Cursor};
use crate::symbol::Symbol;
use std::fmt;
use std::ops::Deref;

/// A short symbol sequence, possibly containing wildcards.
///
/// Patterns order lexicographically by symbol code, a shorter prefix first.
/// That order is the tie-break between equally scored candidates.
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Default)]
pub struct Pattern(Vec<Symbol>);

impl Pattern {
    pub fn new(symbols: Vec<Symbol>) -> Self {
        Pattern(symbols)
    }

    /// Builds a literal pattern from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Pattern(bytes.iter().copied().map(Symbol::literal).collect())
    }

    /// Number of positions that are not wildcards.
    pub fn concrete_len(&self) -> usize {
        self.0.iter().filter(|s| !s.is_wildcard()).count()
    }

    /// True when no position is a wildcard.
    pub fn is_concrete(&self) -> bool {
        self.0.iter().all(|s| !s.is_wildcard())
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.0
    }

    pub fn into_symbols(self) -> Vec<Symbol> {
        self.0
    }

    pub(crate) fn push(&mut self, symbol: Symbol) {
        self.0.push(symbol);
    }

    pub(crate) fn set_last(&mut self, symbol: Symbol) {
        if let Some(last) = self.0.last_mut() {
            *last = symbol;
        }
    }
}

impl Deref for Pattern {
    type Target = [Symbol];

    fn deref(&self) -> &[Symbol] {
        &self.0
    }
}

impl From<Vec<Symbol>> for Pattern {
    fn from(symbols: Vec<Symbol>) -> Self {
        Pattern(symbols)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

/// Checks whether the window starting at `position` matches `pattern`.
///
/// Running off the end of the block is a mismatch.
pub fn matches(block: &Block, position: Cursor, pattern: &[Symbol]) -> bool {
    let mut current = position;

    for &expected in pattern {
        let Some(key) = current else {
            return false;
        };
        if !block.get(key).matches(expected) {
            return false;
        }
        current = block.next(key);
    }

    true
}

/// Finds the first position at or after `from` whose window matches.
///
/// Returns `None` when no occurrence remains.
pub fn find(block: &Block, from: Cursor, pattern: &[Symbol]) -> Cursor {
    let mut position = from;

    while let Some(key) = position {
        if matches(block, Some(key), pattern) {
            return Some(key);
        }
        position = block.next(key);
    }

    None
}

/// Counts non-overlapping occurrences scanning left to right.
///
/// Each match skips the whole window, wildcard positions included, which is
/// how `replace_all` steps as well. The two agree for every pattern with at
/// least one concrete position; `replace_all` refuses wildcard-only patterns.
pub fn count(block: &Block, pattern: &[Symbol]) -> usize {
    if pattern.is_empty() {
        return 0;
    }

    let mut n = 0;
    let mut position = block.first();

    while let Some(key) = find(block, position, pattern) {
        n += 1;
        position = skip(block, Some(key), pattern.len());
    }

    n
}

/// Advances `n` positions.
pub(crate) fn skip(block: &Block, mut position: Cursor, n: usize) -> Cursor {
    for _ in 0..n {
        position = position.and_then(|key| block.next(key));
    }
    position
}
