//! # qzip - Grammar Induction Compression
//!
//! A dictionary-substitution compressor. The input bytes become a block of
//! symbols; recurring subsequences are mined, replaced in place by fresh
//! non-terminal symbols, and recorded as rules until nothing profitable
//! repeats. The result is a rule table followed by the final block:
//!
//! 1. **Mining**: count contiguous and gapped n-grams over the block
//! 2. **Selection**: pick what to replace (bytes-saved ranking or a bigram
//!    multiplicity set)
//! 3. **Replacement**: rewrite every occurrence in place
//! 4. **Cleanup**: inline rules used once, drop unused rules, renumber
//!    densely
//!
//! ## Example
//!
//! ```
//! use qzip_rs::{decompress, Compressor};
//!
//! let compressed = Compressor::default().compress(b"abcabcabcabc").unwrap();
//!
//! // Reconstructs the original bytes
//! assert_eq!(decompress(&compressed.data).unwrap(), b"abcabcabcabc");
//!
//! println!("Created {} rules", compressed.stats.num_rules);
//! ```
//!
//! ## Format
//!
//! Each rule is written as its symbol, its body and a `0xFFFF` terminator,
//! all little-endian `u16`. The block follows with no terminator. Symbols
//! must stay below `0xFFFF`.

mod block;
mod cleanup;
mod codec;
mod compressor;
mod config;
mod dictionary;
mod error;
mod grammar;
mod histogram;
mod id_gen;
mod induction;
mod io;
mod pattern;
mod policy;
mod replace;
mod symbol;

#[cfg(test)]
mod tests;

pub use block::{Block, BlockIter, Cursor};
pub use cleanup::{eliminate_singletons, references, remap, trim};
pub use codec::RULE_END;
pub use compressor::{
    compress, decompress, decompress_stream, verify, CompressionStats, Compressed, Compressor,
};
pub use config::{CompressionLevel, Config, Incompressible, Policy};
pub use dictionary::Dictionary;
pub use error::{Error, Result};
pub use grammar::Grammar;
pub use histogram::Histogram;
pub use induction::{Induced, Induction, Phase};
pub use io::{read_source, write_sink};
pub use pattern::{count, find, matches, Pattern};
pub use policy::{BestCandidate, Candidate, NgramSet, Selection, Selector};
pub use replace::{erase, replace_all, replace_next, sweep};
pub use symbol::Symbol;
