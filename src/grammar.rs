use crate::dictionary::Dictionary;
use crate::error::{Error, Result};
use crate::symbol::Symbol;

/// A finished grammar: the rule dictionary plus the final symbol sequence.
///
/// Expanding the block through the dictionary reproduces the original bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grammar {
    pub(crate) dictionary: Dictionary,
    pub(crate) block: Vec<Symbol>,
}

impl Grammar {
    pub fn new(dictionary: Dictionary, block: Vec<Symbol>) -> Self {
        Self { dictionary, block }
    }

    /// A grammar with no rules whose block is the input itself.
    pub fn stored(input: &[u8]) -> Self {
        Self {
            dictionary: Dictionary::new(),
            block: input.iter().copied().map(Symbol::literal).collect(),
        }
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn block(&self) -> &[Symbol] {
        &self.block
    }

    /// Total symbols held: block plus every rule body.
    pub fn symbol_count(&self) -> usize {
        self.block.len() + self.dictionary.body_len()
    }

    /// Reconstructs the original bytes.
    pub fn expand(&self) -> Result<Vec<u8>> {
        self.dictionary.expand(&self.block)
    }

    /// Checks that the dictionary is well formed and the block only uses
    /// literals and defined rules.
    pub fn validate(&self) -> Result<()> {
        self.dictionary.validate()?;

        for &symbol in &self.block {
            let defined = symbol.is_literal() || self.dictionary.contains(symbol);
            if !defined {
                return Err(Error::corrupted(format!(
                    "block references invalid symbol {symbol}"
                )));
            }
        }

        Ok(())
    }
}
