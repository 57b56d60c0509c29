//! Post-induction passes: singleton elimination, trimming and remapping.
//!
//! They run in that fixed order. Singleton elimination first moves the body
//! of every rule used once into its use site, trimming then drops rules that
//! nothing references, and remapping renumbers the survivors densely.

use crate::dictionary::Dictionary;
use crate::error::{Error, Result};
use crate::symbol::Symbol;
use ahash::{AHashMap as HashMap, AHashSet as HashSet};
use std::collections::BTreeMap;

/// Counts references to each non-terminal across the block and every body.
pub fn references(block: &[Symbol], dictionary: &Dictionary) -> HashMap<Symbol, usize> {
    let mut counts: HashMap<Symbol, usize> = HashMap::default();

    let bodies = dictionary.iter().map(|(_, body)| body);
    for symbol in std::iter::once(block).chain(bodies).flatten() {
        if symbol.is_rule() {
            *counts.entry(*symbol).or_insert(0) += 1;
        }
    }

    counts
}

/// Inlines every rule referenced exactly once and removes it.
///
/// Inlining moves symbols rather than copying them, but it is still
/// repeated until no singleton remains. Returns the number of rules inlined.
pub fn eliminate_singletons(block: &mut Vec<Symbol>, dictionary: &mut Dictionary) -> usize {
    let mut inlined = 0;

    loop {
        let counts = references(block, dictionary);
        let singletons: HashSet<Symbol> = dictionary
            .symbols()
            .into_iter()
            .filter(|s| counts.get(s) == Some(&1))
            .collect();

        if singletons.is_empty() {
            break;
        }

        let bodies: HashMap<Symbol, Vec<Symbol>> = singletons
            .iter()
            .filter_map(|&s| dictionary.remove(s).map(|body| (s, body)))
            .collect();

        *block = inline(block, &bodies);
        for (_, body) in dictionary.iter_mut() {
            if body.iter().any(|s| bodies.contains_key(s)) {
                *body = inline(body, &bodies);
            }
        }

        tracing::trace!(count = bodies.len(), "inlined singleton rules");
        inlined += bodies.len();
    }

    inlined
}

/// Rewrites `sequence`, recursively substituting every symbol in `bodies`.
fn inline(sequence: &[Symbol], bodies: &HashMap<Symbol, Vec<Symbol>>) -> Vec<Symbol> {
    let mut out = Vec::with_capacity(sequence.len());
    let mut stack = vec![sequence.iter()];

    while let Some(frame) = stack.last_mut() {
        let Some(&symbol) = frame.next() else {
            stack.pop();
            continue;
        };

        match bodies.get(&symbol) {
            Some(body) => stack.push(body.iter()),
            None => out.push(symbol),
        }
    }

    out
}

/// Drops rules that neither the block nor any surviving rule references.
///
/// Repeats until stable, since dropping a rule can orphan the rules its
/// body used. Returns the number of rules dropped.
pub fn trim(block: &[Symbol], dictionary: &mut Dictionary) -> usize {
    let mut dropped = 0;

    loop {
        let counts = references(block, dictionary);
        let before = dictionary.len();
        dictionary.retain(|s| counts.contains_key(&s));

        let removed = before - dictionary.len();
        if removed == 0 {
            break;
        }
        dropped += removed;
    }

    dropped
}

/// Renumbers rules densely from [`Symbol::FIRST`], keeping their relative
/// order, and rewrites every reference through one substitution map.
pub fn remap(block: &mut [Symbol], dictionary: &mut Dictionary) -> Result<()> {
    let map: BTreeMap<Symbol, Symbol> = dictionary
        .symbols()
        .into_iter()
        .zip(Symbol::FIRST.code()..)
        .map(|(old, new)| (old, Symbol::new(new)))
        .collect();

    let rename = |symbol: &mut Symbol| -> Result<()> {
        if symbol.is_rule() {
            *symbol = *map.get(&*symbol).ok_or_else(|| {
                Error::internal(format!("remap found undefined symbol {symbol}"))
            })?;
        }
        Ok(())
    };

    for symbol in block.iter_mut() {
        rename(symbol)?;
    }

    let mut remapped = Dictionary::new();
    for (symbol, body) in dictionary.iter() {
        let mut body = body.to_vec();
        for s in body.iter_mut() {
            rename(s)?;
        }
        remapped.insert(map[&symbol], body);
    }

    *dictionary = remapped;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(text: &str) -> Vec<Symbol> {
        text.bytes().map(Symbol::literal).collect()
    }

    fn r(n: i32) -> Symbol {
        Symbol::new(256 + n)
    }

    #[test]
    fn test_references() {
        let mut d = Dictionary::new();
        d.insert(r(0), lit("ab"));
        d.insert(r(1), vec![r(0), r(0)]);
        let block = vec![r(1), Symbol::from(b'x'), r(0)];

        let counts = references(&block, &d);
        assert_eq!(counts.get(&r(0)), Some(&3));
        assert_eq!(counts.get(&r(1)), Some(&1));
        assert_eq!(counts.get(&Symbol::from(b'x')), None);
    }

    #[test]
    fn test_eliminate_singleton_in_block() {
        let mut d = Dictionary::new();
        d.insert(r(0), lit("ab"));
        d.insert(r(1), lit("xy"));
        let mut block = vec![r(0), r(1), r(1)];

        assert_eq!(eliminate_singletons(&mut block, &mut d), 1);
        assert_eq!(block, vec![Symbol::from(b'a'), Symbol::from(b'b'), r(1), r(1)]);
        assert!(!d.contains(r(0)));
        assert!(d.contains(r(1)));
    }

    #[test]
    fn test_eliminate_nested_singletons() {
        // r2 used once in the block, r1 used once inside r2
        let mut d = Dictionary::new();
        d.insert(r(0), lit("ab"));
        d.insert(r(1), vec![r(0), Symbol::from(b'c')]);
        d.insert(r(2), vec![r(1), r(0)]);
        let mut block = vec![r(2), r(0)];
        let expected = d.expand(&block).unwrap();

        eliminate_singletons(&mut block, &mut d);

        assert_eq!(d.len(), 1);
        assert!(d.contains(r(0)));
        assert_eq!(block, vec![r(0), Symbol::from(b'c'), r(0), r(0)]);
        assert_eq!(d.expand(&block).unwrap(), expected);
    }

    #[test]
    fn test_eliminate_is_idempotent() {
        let mut d = Dictionary::new();
        d.insert(r(0), lit("ab"));
        d.insert(r(1), vec![r(0), r(0)]);
        let mut block = vec![r(1), r(0)];

        eliminate_singletons(&mut block, &mut d);
        let (once_block, once_dict) = (block.clone(), d.clone());

        assert_eq!(eliminate_singletons(&mut block, &mut d), 0);
        assert_eq!(block, once_block);
        assert_eq!(d, once_dict);
    }

    #[test]
    fn test_trim_cascades() {
        let mut d = Dictionary::new();
        d.insert(r(0), lit("ab"));
        d.insert(r(1), vec![r(0), r(0)]);
        d.insert(r(2), lit("zz"));
        let block = vec![r(2), r(2)];

        assert_eq!(trim(&block, &mut d), 2);
        assert_eq!(d.symbols(), vec![r(2)]);
    }

    #[test]
    fn test_remap_dense_and_ordered() {
        let mut d = Dictionary::new();
        d.insert(r(4), lit("ab"));
        d.insert(r(9), vec![r(4), r(4)]);
        let mut block = vec![r(9), r(4), Symbol::from(b'q')];
        let expected = d.expand(&block).unwrap();

        remap(&mut block, &mut d).unwrap();

        assert_eq!(d.symbols(), vec![r(0), r(1)]);
        assert_eq!(d.get(r(1)), Some(&[r(0), r(0)][..]));
        assert_eq!(block, vec![r(1), r(0), Symbol::from(b'q')]);
        assert_eq!(d.expand(&block).unwrap(), expected);
    }

    #[test]
    fn test_remap_undefined_symbol_is_internal_error() {
        let mut d = Dictionary::new();
        let mut block = vec![r(3)];
        let err = remap(&mut block, &mut d).unwrap_err();
        assert!(matches!(err, Error::InternalConsistency { .. }));
    }
}
