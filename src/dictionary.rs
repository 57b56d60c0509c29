//! Rule storage and expansion back to bytes.

use crate::error::{Error, Result};
use crate::symbol::Symbol;
use std::collections::btree_map;
use std::collections::BTreeMap;

/// Maps each non-terminal to the body it replaces.
///
/// Rules are kept in ascending symbol order, which is also the order they
/// are renumbered and serialized in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    rules: BTreeMap<Symbol, Vec<Symbol>>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule, returning any body previously stored under `symbol`.
    pub fn insert(&mut self, symbol: Symbol, body: Vec<Symbol>) -> Option<Vec<Symbol>> {
        self.rules.insert(symbol, body)
    }

    pub fn get(&self, symbol: Symbol) -> Option<&[Symbol]> {
        self.rules.get(&symbol).map(Vec::as_slice)
    }

    pub fn remove(&mut self, symbol: Symbol) -> Option<Vec<Symbol>> {
        self.rules.remove(&symbol)
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        self.rules.contains_key(&symbol)
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Sum of all body lengths.
    pub fn body_len(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    /// Highest rule symbol, if any.
    pub fn max_symbol(&self) -> Option<Symbol> {
        self.rules.keys().next_back().copied()
    }

    /// Iterates over rules in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &[Symbol])> {
        self.rules.iter().map(|(&s, body)| (s, body.as_slice()))
    }

    pub(crate) fn iter_mut(&mut self) -> btree_map::IterMut<'_, Symbol, Vec<Symbol>> {
        self.rules.iter_mut()
    }

    pub(crate) fn symbols(&self) -> Vec<Symbol> {
        self.rules.keys().copied().collect()
    }

    pub(crate) fn retain(&mut self, mut keep: impl FnMut(Symbol) -> bool) {
        self.rules.retain(|&s, _| keep(s));
    }

    /// Expands `block` recursively down to literal bytes.
    ///
    /// Works on an explicit stack of body slices rather than rewriting a
    /// shared sequence. Fails on wildcards, undefined non-terminals, and
    /// nesting deeper than the number of rules (a cycle).
    pub fn expand(&self, block: &[Symbol]) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(block.len());
        let mut stack: Vec<std::slice::Iter<'_, Symbol>> = vec![block.iter()];

        while let Some(frame) = stack.last_mut() {
            let Some(&symbol) = frame.next() else {
                stack.pop();
                continue;
            };

            if let Some(byte) = symbol.as_byte() {
                out.push(byte);
                continue;
            }

            let Some(body) = self.rules.get(&symbol) else {
                return Err(Error::corrupted(format!(
                    "reference to undefined symbol {symbol}"
                )));
            };

            if stack.len() > self.rules.len() {
                return Err(Error::corrupted(format!(
                    "rule {symbol} expands into itself"
                )));
            }

            stack.push(body.iter());
        }

        Ok(out)
    }

    /// Checks the structural invariants of a finished dictionary.
    ///
    /// Every key is a non-terminal, every body is non-empty and concrete,
    /// every referenced non-terminal is defined, and no rule reaches itself.
    pub fn validate(&self) -> Result<()> {
        for (symbol, body) in self.iter() {
            if !symbol.is_rule() {
                return Err(Error::corrupted(format!(
                    "rule key {symbol} is not a non-terminal"
                )));
            }
            if body.is_empty() {
                return Err(Error::corrupted(format!("rule {symbol} has an empty body")));
            }
            for &s in body {
                if s.is_wildcard() || (s.is_rule() && !self.contains(s)) || s.code() < -1 {
                    return Err(Error::corrupted(format!(
                        "rule {symbol} references invalid symbol {s}"
                    )));
                }
            }
        }

        self.check_acyclic()
    }

    /// Depth-first search over rule references with grey/black marking.
    fn check_acyclic(&self) -> Result<()> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Visiting,
            Done,
        }

        let mut marks: BTreeMap<Symbol, Mark> = BTreeMap::new();

        for root in self.rules.keys().copied() {
            if marks.contains_key(&root) {
                continue;
            }

            let mut stack = vec![(root, 0usize)];
            marks.insert(root, Mark::Visiting);

            while let Some((symbol, index)) = stack.pop() {
                let body = self.rules.get(&symbol).map(Vec::as_slice).unwrap_or(&[]);

                let Some(&child) = body.get(index) else {
                    marks.insert(symbol, Mark::Done);
                    continue;
                };
                stack.push((symbol, index + 1));

                if !child.is_rule() {
                    continue;
                }
                match marks.get(&child) {
                    Some(Mark::Visiting) => {
                        return Err(Error::corrupted(format!(
                            "rule {child} expands into itself"
                        )));
                    }
                    Some(Mark::Done) => {}
                    None => {
                        marks.insert(child, Mark::Visiting);
                        stack.push((child, 0));
                    }
                }
            }
        }

        Ok(())
    }
}

impl FromIterator<(Symbol, Vec<Symbol>)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (Symbol, Vec<Symbol>)>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}
