//! The working sequence rewritten during induction.
//!
//! A `Block` is a doubly-linked list of symbols stored in a `SlotMap`, so a
//! node key stays valid while other nodes are erased or inserted around it.
//! Positions are `Option<DefaultKey>`, with `None` standing for the end of
//! the block.

use crate::symbol::{Symbol, SymbolNode};
use slotmap::{DefaultKey, SlotMap};

/// A position in a block; `None` is one past the last symbol.
pub type Cursor = Option<DefaultKey>;

/// Mutable symbol sequence with stable node handles.
#[derive(Debug, Default)]
pub struct Block {
    nodes: SlotMap<DefaultKey, SymbolNode>,
    head: Option<DefaultKey>,
    tail: Option<DefaultKey>,
}

impl Block {
    /// Creates an empty block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a block holding one literal symbol per input byte.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        bytes.iter().copied().map(Symbol::literal).collect()
    }

    /// Appends a symbol at the end.
    pub fn push(&mut self, symbol: Symbol) -> DefaultKey {
        self.insert_before(None, symbol)
    }

    /// Number of symbols in the block.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Position of the first symbol.
    pub fn first(&self) -> Cursor {
        self.head
    }

    /// Position after `key`.
    ///
    /// # Panics
    ///
    /// Panics if `key` was removed; check with [`Block::contains`] when a
    /// cursor may be stale.
    #[inline]
    pub fn next(&self, key: DefaultKey) -> Cursor {
        self.nodes[key].next
    }

    /// Position before `key`.
    ///
    /// # Panics
    ///
    /// Panics if `key` was removed; check with [`Block::contains`] when a
    /// cursor may be stale.
    #[inline]
    pub fn prev(&self, key: DefaultKey) -> Cursor {
        self.nodes[key].prev
    }

    /// Symbol stored at `key`.
    ///
    /// # Panics
    ///
    /// Panics if `key` was removed; check with [`Block::contains`] when a
    /// cursor may be stale.
    #[inline]
    pub fn get(&self, key: DefaultKey) -> Symbol {
        self.nodes[key].symbol
    }

    /// Whether `key` still names a live node.
    pub fn contains(&self, key: DefaultKey) -> bool {
        self.nodes.contains_key(key)
    }

    /// Inserts `symbol` before `at` (or at the end when `at` is `None`).
    ///
    /// Returns the key of the new node.
    pub fn insert_before(&mut self, at: Cursor, symbol: Symbol) -> DefaultKey {
        let new_key = self.nodes.insert(SymbolNode::new(symbol));

        let prev_key = match at {
            Some(next) => self.nodes[next].prev,
            None => self.tail,
        };

        self.nodes[new_key].prev = prev_key;
        self.nodes[new_key].next = at;

        match prev_key {
            Some(prev) => self.nodes[prev].next = Some(new_key),
            None => self.head = Some(new_key),
        }
        match at {
            Some(next) => self.nodes[next].prev = Some(new_key),
            None => self.tail = Some(new_key),
        }

        new_key
    }

    /// Unlinks and drops the node at `key`.
    ///
    /// Returns the position that followed it.
    ///
    /// # Panics
    ///
    /// Panics if `key` was already removed.
    pub fn remove(&mut self, key: DefaultKey) -> Cursor {
        let node = self.nodes.remove(key).expect("remove of a dead block node");

        match node.prev {
            Some(prev) => self.nodes[prev].next = node.next,
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => self.nodes[next].prev = node.prev,
            None => self.tail = node.prev,
        }

        node.next
    }

    /// Iterates over the symbols in order.
    pub fn iter(&self) -> BlockIter<'_> {
        BlockIter {
            block: self,
            current: self.head,
        }
    }

    /// Copies the symbols out in order.
    pub fn to_vec(&self) -> Vec<Symbol> {
        self.iter().collect()
    }
}

impl FromIterator<Symbol> for Block {
    fn from_iter<I: IntoIterator<Item = Symbol>>(iter: I) -> Self {
        let mut block = Block::new();
        for symbol in iter {
            block.push(symbol);
        }
        block
    }
}

/// Iterator over the symbols of a [`Block`].
pub struct BlockIter<'a> {
    block: &'a Block,
    current: Cursor,
}

impl<'a> Iterator for BlockIter<'a> {
    type Item = Symbol;

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.current?;
        self.current = self.block.next(key);
        Some(self.block.get(key))
    }
}

impl<'a> IntoIterator for &'a Block {
    type Item = Symbol;
    type IntoIter = BlockIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
