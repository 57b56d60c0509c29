use crate::block::Block;
use crate::compressor::Compressor;
use crate::config::{Config, Policy};
use crate::grammar::Grammar;
use crate::pattern::{count, find};
use crate::replace::replace_all;
use crate::symbol::Symbol;
use proptest::prelude::*;

fn small_text() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(vec![b'x', b'y', b'z']), 0..120)
}

proptest! {
    /// Property 1: Decoding reproduces the encoded grammar
    #[test]
    fn prop_decode_inverts_encode(input in small_text(), ngram in any::<bool>()) {
        let policy = if ngram { Policy::NgramSet } else { Policy::BestCandidate };
        let compressed = Compressor::new(Config::new().with_policy(policy))
            .compress(&input)
            .unwrap();

        let decoded = Grammar::decode(&compressed.data).unwrap();
        prop_assert_eq!(&decoded, &compressed.grammar);
    }

    /// Property 2: Encoded size follows the layout
    /// Two bytes per symbol plus a key and a terminator per rule.
    #[test]
    fn prop_encoded_size(input in small_text()) {
        let compressed = Compressor::default().compress(&input).unwrap();
        let g = &compressed.grammar;

        let codes = g.symbol_count() + 2 * g.dictionary().len();
        prop_assert_eq!(compressed.data.len(), 2 * codes);
        prop_assert_eq!(compressed.stats.encoded_bytes, compressed.data.len());
    }

    /// Property 3: Decoding arbitrary bytes never panics
    #[test]
    fn prop_decode_arbitrary(bytes: Vec<u8>) {
        // Any outcome is fine as long as it is a value.
        let _ = Grammar::decode(&bytes);
    }

    /// Property 4: Block contents survive building
    #[test]
    fn prop_block_from_bytes(input: Vec<u8>) {
        let block = Block::from_bytes(&input);
        prop_assert_eq!(block.len(), input.len());

        let expected: Vec<Symbol> = input.iter().copied().map(Symbol::literal).collect();
        prop_assert_eq!(block.to_vec(), expected);
    }

    /// Property 5: Replacing everything leaves no occurrence behind
    #[test]
    fn prop_replace_all_exhausts(input in small_text(), a in 0usize..3, b in 0usize..3) {
        let alphabet = [b'x', b'y', b'z'];
        let pattern = [Symbol::literal(alphabet[a]), Symbol::literal(alphabet[b])];
        let with = Symbol::FIRST;

        let mut block = Block::from_bytes(&input);
        let before = count(&block, &pattern);
        let replaced = replace_all(&mut block, &pattern, with).unwrap();

        prop_assert_eq!(replaced, before);
        prop_assert_eq!(block.len(), input.len() - replaced);
        prop_assert!(find(&block, block.first(), &pattern).is_none());
    }
}

/// Bolero fuzz test: Decoding arbitrary bytes never panics
#[cfg(test)]
#[test]
fn fuzz_decode_no_panic() {
    bolero::check!().with_type::<Vec<u8>>().for_each(|bytes| {
        if let Ok(g) = Grammar::decode(bytes) {
            // Whatever decodes must survive another trip through the codec.
            let again = Grammar::decode(&g.encode().unwrap()).unwrap();
            assert_eq!(again, g);
        }
    });
}
