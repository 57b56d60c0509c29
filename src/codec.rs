//! Binary layout of a compressed stream.
//!
//! Every code is a little-endian `u16`:
//!
//! ```text
//! rule*   := symbol body-symbol+ 0xFFFF
//! trailer := block-symbol*            (runs to end of stream)
//! ```
//!
//! `0xFFFF` is the wildcard cast to 16 bits and never a valid symbol, so the
//! trailer is simply whatever follows the last terminated record. There is
//! no magic number, version or length prefix.

use crate::dictionary::Dictionary;
use crate::error::{Error, Result};
use crate::grammar::Grammar;
use crate::symbol::Symbol;
use std::io::Write;

/// End-of-rule marker.
pub const RULE_END: u16 = Symbol::WILDCARD.code() as u16;

impl Grammar {
    /// Serializes the grammar.
    ///
    /// Fails with [`Error::SymbolOverflow`] before producing any output if a
    /// symbol does not fit in a 16-bit code.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(2 * (self.symbol_count() + 2 * self.dictionary.len()));
        self.write_to(&mut out)?;
        Ok(out)
    }

    /// Serializes the grammar into `writer`.
    ///
    /// Every symbol is checked before the first byte is written.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        self.check_encodable()?;

        let mut buf = Vec::with_capacity(2 * (self.symbol_count() + 2 * self.dictionary.len()));
        for (symbol, body) in self.dictionary.iter() {
            push_code(&mut buf, symbol);
            for &s in body {
                push_code(&mut buf, s);
            }
            buf.extend_from_slice(&RULE_END.to_le_bytes());
        }
        for &s in &self.block {
            push_code(&mut buf, s);
        }

        writer.write_all(&buf)?;
        Ok(())
    }

    fn check_encodable(&self) -> Result<()> {
        let bodies = self.dictionary.iter().flat_map(|(s, body)| {
            std::iter::once(s).chain(body.iter().copied())
        });

        for symbol in bodies.chain(self.block.iter().copied()) {
            if symbol > Symbol::MAX_ENCODED {
                return Err(Error::SymbolOverflow {
                    symbol: symbol.code(),
                });
            }
            if symbol.code() < 0 {
                return Err(Error::internal(format!(
                    "symbol {symbol} cannot be stored"
                )));
            }
        }

        Ok(())
    }

    /// Parses a compressed stream and validates the grammar it holds.
    pub fn decode(bytes: &[u8]) -> Result<Grammar> {
        if bytes.len() % 2 != 0 {
            return Err(Error::corrupted(format!(
                "stream length {} is not a whole number of codes",
                bytes.len()
            )));
        }

        let codes: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();

        let mut dictionary = Dictionary::new();
        let mut rest = codes.as_slice();

        while let Some(end) = rest.iter().position(|&c| c == RULE_END) {
            let (record, tail) = rest.split_at(end);
            rest = &tail[1..];

            let Some((&key, body)) = record.split_first() else {
                return Err(Error::corrupted("rule record without a symbol"));
            };
            let key = Symbol::new(i32::from(key));
            let body: Vec<Symbol> = body.iter().map(|&c| Symbol::new(i32::from(c))).collect();

            if dictionary.insert(key, body).is_some() {
                return Err(Error::corrupted(format!("rule {key} defined twice")));
            }
        }

        let block = rest.iter().map(|&c| Symbol::new(i32::from(c))).collect();
        let grammar = Grammar::new(dictionary, block);
        grammar.validate()?;

        Ok(grammar)
    }
}

fn push_code(buf: &mut Vec<u8>, symbol: Symbol) {
    buf.extend_from_slice(&(symbol.code() as u16).to_le_bytes());
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

    fn words(bytes: &[u8]) -> Vec<u16> {
        bytes
            .chunks_exact(2)
            .map(|p| u16::from_le_bytes([p[0], p[1]]))
            .collect()
    }

    #[test]
    fn test_layout() {
        let mut d = Dictionary::new();
        d.insert(r(0), lit("ab"));
        let g = Grammar::new(d, vec![r(0), Symbol::from(b'c'), r(0)]);

        let bytes = g.encode().unwrap();
        assert_eq!(
            words(&bytes),
            vec![256, 97, 98, 0xFFFF, 256, 99, 256]
        );
    }

    #[test]
    fn test_stored_layout_has_no_records() {
        let bytes = Grammar::stored(b"xyz").encode().unwrap();
        assert_eq!(words(&bytes), vec![120, 121, 122]);
    }

    #[test]
    fn test_decode_rebuilds_grammar() {
        let mut d = Dictionary::new();
        d.insert(r(0), lit("ab"));
        d.insert(r(1), vec![r(0), r(0)]);
        let g = Grammar::new(d, vec![r(1), r(0)]);

        let decoded = Grammar::decode(&g.encode().unwrap()).unwrap();
        assert_eq!(decoded, g);
        assert_eq!(decoded.expand().unwrap(), b"ababab");
    }

    #[test]
    fn test_decode_empty() {
        let g = Grammar::decode(&[]).unwrap();
        assert!(g.dictionary().is_empty());
        assert!(g.block().is_empty());
    }

    #[test]
    fn test_decode_rejects_odd_length() {
        assert!(matches!(
            Grammar::decode(&[1, 0, 2]),
            Err(Error::Corrupted(_))
        ));
    }

    #[test]
    fn test_decode_rejects_bad_records() {
        let encode = |codes: &[u16]| -> Vec<u8> {
            codes.iter().flat_map(|c| c.to_le_bytes()).collect()
        };

        // empty record
        assert!(Grammar::decode(&encode(&[0xFFFF])).is_err());
        // literal key
        assert!(Grammar::decode(&encode(&[97, 98, 0xFFFF])).is_err());
        // key only
        assert!(Grammar::decode(&encode(&[256, 0xFFFF, 256])).is_err());
        // duplicate
        assert!(Grammar::decode(&encode(&[256, 97, 0xFFFF, 256, 98, 0xFFFF])).is_err());
        // undefined reference in block
        assert!(Grammar::decode(&encode(&[256, 97, 98, 0xFFFF, 257])).is_err());
        // self reference
        assert!(Grammar::decode(&encode(&[256, 256, 97, 0xFFFF, 256])).is_err());
    }

    #[test]
    fn test_symbol_overflow_writes_nothing() {
        let mut d = Dictionary::new();
        d.insert(Symbol::new(0x1_0000), lit("ab"));
        let g = Grammar::new(d, vec![Symbol::new(0x1_0000)]);

        let mut sink = Vec::new();
        let err = g.write_to(&mut sink).unwrap_err();
        assert!(matches!(err, Error::SymbolOverflow { symbol: 0x1_0000 }));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_sentinel_code_is_not_encodable() {
        let g = Grammar::new(Dictionary::new(), vec![Symbol::new(0xFFFF)]);
        assert!(matches!(g.encode(), Err(Error::SymbolOverflow { .. })));

        let g = Grammar::new(Dictionary::new(), vec![Symbol::MAX_ENCODED]);
        assert!(g.encode().is_ok());
    }
}
