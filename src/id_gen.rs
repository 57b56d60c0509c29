use crate::symbol::Symbol;

/// Allocates non-terminal symbols.
///
/// Codes start at [`Symbol::FIRST`] and only ever grow; a code is never handed
/// out twice within one run, even after its rule has been inlined or trimmed.
#[derive(Debug)]
pub(crate) struct SymbolAllocator {
    next: i32,
}

impl SymbolAllocator {
    /// Creates an allocator starting at the first non-terminal.
    pub(crate) fn new() -> Self {
        Self {
            next: Symbol::FIRST.code(),
        }
    }

    /// Gets a fresh non-terminal.
    pub(crate) fn get(&mut self) -> Symbol {
        let symbol = Symbol::new(self.next);
        self.next += 1;
        symbol
    }

    /// Number of symbols handed out so far.
    pub(crate) fn allocated(&self) -> usize {
        (self.next - Symbol::FIRST.code()) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_allocation() {
        let mut gen = SymbolAllocator::new();
        assert_eq!(gen.get(), Symbol::new(256));
        assert_eq!(gen.get(), Symbol::new(257));
        assert_eq!(gen.get(), Symbol::new(258));
        assert_eq!(gen.allocated(), 3);
    }

    #[test]
    fn test_fresh_allocator_is_empty() {
        let gen = SymbolAllocator::new();
        assert_eq!(gen.allocated(), 0);
    }
}
