use slotmap::DefaultKey;
use std::fmt;

/// A grammar symbol.
///
/// Values 0..=255 are literal bytes, values from 256 upward are non-terminals
/// naming a dictionary rule. `-1` is the wildcard, which matches anything
/// during pattern comparison and is never stored in a block or a rule body.
#[derive(Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct Symbol(i32);

impl Symbol {
    /// Match-anything sentinel used only while mining and matching.
    pub const WILDCARD: Symbol = Symbol(-1);

    /// First non-terminal code.
    pub const FIRST: Symbol = Symbol(256);

    /// Largest code that can be written to a compressed stream.
    ///
    /// `0xFFFF` is taken by the end-of-rule sentinel.
    pub const MAX_ENCODED: Symbol = Symbol(0xFFFE);

    /// Creates a symbol from its raw code.
    pub const fn new(code: i32) -> Self {
        Symbol(code)
    }

    /// Creates the literal symbol for a byte.
    pub const fn literal(byte: u8) -> Self {
        Symbol(byte as i32)
    }

    /// Returns the raw code.
    pub const fn code(self) -> i32 {
        self.0
    }

    pub fn is_wildcard(self) -> bool {
        self == Symbol::WILDCARD
    }

    pub fn is_literal(self) -> bool {
        (0..=255).contains(&self.0)
    }

    /// True for dictionary non-terminals (256 and above).
    pub fn is_rule(self) -> bool {
        self >= Symbol::FIRST
    }

    /// Returns the byte for a literal symbol.
    pub fn as_byte(self) -> Option<u8> {
        u8::try_from(self.0).ok()
    }

    /// Wildcard-aware equality: equal codes, or either side is the wildcard.
    #[inline]
    pub fn matches(self, other: Symbol) -> bool {
        self == other || self.is_wildcard() || other.is_wildcard()
    }
}

impl From<u8> for Symbol {
    fn from(byte: u8) -> Self {
        Symbol::literal(byte)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            -1 => write!(f, "*"),
            0..=255 => write!(f, "{:?}", self.0 as u8 as char),
            code => write!(f, "R{}", code),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A node in the doubly-linked list of symbols.
#[derive(Debug)]
pub(crate) struct SymbolNode {
    pub symbol: Symbol,
    pub prev: Option<DefaultKey>,
    pub next: Option<DefaultKey>,
}

impl SymbolNode {
    pub(crate) fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            prev: None,
            next: None,
        }
    }
}
