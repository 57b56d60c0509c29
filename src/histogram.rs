//! N-gram mining over the current block.

use crate::block::Block;
use crate::pattern::Pattern;
use crate::symbol::Symbol;
use ahash::AHashMap as HashMap;

/// Shortest contiguous window that is counted.
const MIN_CONTIGUOUS: usize = 3;

/// Shortest gapped key that is counted.
const MIN_GAPPED: usize = 2;

/// Occurrence counts of candidate patterns.
///
/// Rebuilt from scratch on every mining pass and never persisted. Counts are
/// of overlapping occurrences.
#[derive(Debug, Default)]
pub struct Histogram {
    counts: HashMap<Pattern, usize>,
}

impl Histogram {
    /// Mines every start position of `block` for keys up to `max_len` symbols.
    ///
    /// Two families of keys are counted from each start:
    /// - contiguous windows of length 3..=max_len;
    /// - gapped keys of length 2..=max_len that keep the first and last
    ///   symbols and wildcard everything between (`a b`, `a . c`, `a . . d`).
    pub fn mine(block: &Block, max_len: usize) -> Self {
        let mut counts: HashMap<Pattern, usize> = HashMap::default();
        let mut start = block.first();

        while let Some(key) = start {
            let mut contiguous = Pattern::default();
            let mut cursor = Some(key);

            while let Some(k) = cursor {
                if contiguous.len() >= max_len {
                    break;
                }
                contiguous.push(block.get(k));
                if contiguous.len() >= MIN_CONTIGUOUS {
                    *counts.entry(contiguous.clone()).or_insert(0) += 1;
                }
                cursor = block.next(k);
            }

            let mut gapped = Pattern::new(vec![block.get(key)]);
            let mut cursor = block.next(key);

            while let Some(k) = cursor {
                if gapped.len() >= max_len {
                    break;
                }
                gapped.push(block.get(k));
                if gapped.len() >= MIN_GAPPED {
                    *counts.entry(gapped.clone()).or_insert(0) += 1;
                }
                gapped.set_last(Symbol::WILDCARD);
                cursor = block.next(k);
            }

            start = block.next(key);
        }

        Self { counts }
    }

    /// Occurrence count of `pattern`, zero if never seen.
    pub fn count(&self, pattern: &Pattern) -> usize {
        self.counts.get(pattern).copied().unwrap_or(0)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterates over `(pattern, count)` in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&Pattern, usize)> {
        self.counts.iter().map(|(p, &n)| (p, n))
    }
}
