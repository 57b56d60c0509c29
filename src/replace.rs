//! In-place erase and replace primitives.
//!
//! These mutate the block while a scan is in progress. Node keys stay valid
//! across the splice, so every primitive hands back a cursor the caller can
//! keep scanning from.

use crate::block::{Block, Cursor};
use crate::error::{Error, Result};
use crate::pattern::{find, skip, Pattern};
use crate::symbol::Symbol;
use slotmap::DefaultKey;
use std::collections::BTreeSet;

/// Erases the occurrence of `pattern` starting at `position`.
///
/// Wildcard positions are stepped over and kept. Every other position must
/// hold exactly the pattern's symbol; anything else means the caller did not
/// verify the match and is reported as an internal consistency error.
///
/// Returns the position where a substitute belongs: the first surviving node
/// of the matched window, or whatever followed it.
pub fn erase(block: &mut Block, position: DefaultKey, pattern: &[Symbol]) -> Result<Cursor> {
    let before = block.prev(position);
    let mut current = Some(position);

    for (i, &expected) in pattern.iter().enumerate() {
        let Some(key) = current else {
            return Err(Error::internal(format!(
                "erase ran past the end of the block at pattern offset {i}"
            )));
        };
        current = block.next(key);

        if expected.is_wildcard() {
            continue;
        }

        let found = block.get(key);
        if found != expected {
            return Err(Error::internal(format!(
                "erase expected {expected:?} at pattern offset {i}, found {found:?}"
            )));
        }
        block.remove(key);
    }

    Ok(match before {
        Some(key) => block.next(key),
        None => block.first(),
    })
}

/// Replaces the next occurrence of `pattern` at or after `from` with `symbol`.
///
/// Returns `Some(position after the matched window)` when a replacement was
/// made, and `None` once no occurrence remains. For a concrete pattern that
/// is the position just after the inserted symbol; for a gapped one the kept
/// wildcard positions are stepped over too, so repeated calls always make
/// progress. A pattern without a concrete position can never shrink the
/// block and is never replaced.
pub fn replace_next(
    block: &mut Block,
    from: Cursor,
    pattern: &[Symbol],
    symbol: Symbol,
) -> Result<Option<Cursor>> {
    if pattern.iter().all(|s| s.is_wildcard()) {
        return Ok(None);
    }

    let Some(found) = find(block, from, pattern) else {
        return Ok(None);
    };

    let resume = skip(block, Some(found), pattern.len());
    let at = erase(block, found, pattern)?;
    block.insert_before(at, symbol);

    Ok(Some(resume))
}

/// Replaces every non-overlapping occurrence of `pattern`, left to right.
///
/// Returns the number of replacements.
pub fn replace_all(block: &mut Block, pattern: &[Symbol], symbol: Symbol) -> Result<usize> {
    let mut n = 0;
    let mut position = block.first();

    while let Some(next) = replace_next(block, position, pattern, symbol)? {
        n += 1;
        position = next;
    }

    Ok(n)
}

/// Replaces every bigram in `patterns` during one left-to-right sweep.
///
/// `symbol_for` names the substitute for each pair. After a replacement the
/// scan resumes at the inserted symbol, so it can pair with what follows.
/// Returns the number of replacements.
pub fn sweep<F>(block: &mut Block, patterns: &BTreeSet<Pattern>, mut symbol_for: F) -> Result<usize>
where
    F: FnMut(&Pattern) -> Symbol,
{
    let mut replaced = 0;
    let mut position = block.first();

    while let Some(key) = position {
        let Some(next) = block.next(key) else {
            break;
        };

        let pair = Pattern::new(vec![block.get(key), block.get(next)]);
        if !patterns.contains(&pair) {
            position = Some(next);
            continue;
        }

        let symbol = symbol_for(&pair);
        let at = erase(block, key, &pair)?;
        position = Some(block.insert_before(at, symbol));
        replaced += 1;
    }

    Ok(replaced)
}
