//! One-shot and streaming compression entry points.

use crate::config::{Config, Incompressible};
use crate::error::{Error, Result};
use crate::grammar::Grammar;
use crate::induction::Induction;
use crate::io::{read_source, write_sink};
use std::io::{Read, Write};
use tracing::{error, info, warn};

/// Grammar compressor.
#[derive(Debug, Clone, Default)]
pub struct Compressor {
    config: Config,
}

/// Output of a compression run.
#[derive(Debug, Clone)]
pub struct Compressed {
    pub data: Vec<u8>,
    pub grammar: Grammar,
    pub stats: CompressionStats,
}

impl Compressor {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Builds the grammar for `input`.
    ///
    /// Returns the grammar and the number of productive induction passes.
    /// Input in which nothing repeats becomes a stored grammar, or an error
    /// when the configuration asks for [`Incompressible::Fail`].
    pub fn induce(&self, input: &[u8]) -> Result<(Grammar, usize)> {
        if self.config.level.to_level() == 0 {
            return Ok((Grammar::stored(input), 0));
        }

        let selector = self.config.selector();
        let induction =
            Induction::new(input, selector.as_ref()).with_max_probes(self.config.max_probes);

        match induction.run() {
            Ok(induced) => Ok((induced.grammar, induced.passes)),
            Err(Error::NothingToCompress { len })
                if self.config.incompressible == Incompressible::Store =>
            {
                warn!(len, "nothing repeats, storing input");
                Ok((Grammar::stored(input), 0))
            }
            Err(e) => Err(e),
        }
    }

    /// Compresses `input` into the rule-table-plus-block stream.
    pub fn compress(&self, input: &[u8]) -> Result<Compressed> {
        let (grammar, passes) = self.induce(input)?;
        let data = grammar.encode()?;

        if self.config.verify {
            verify(input, &data)?;
        }

        let stats = CompressionStats {
            input_length: input.len(),
            block_symbols: grammar.block().len(),
            num_rules: grammar.dictionary().len(),
            rule_symbols: grammar.dictionary().body_len(),
            passes,
            encoded_bytes: data.len(),
        };

        info!(
            input = stats.input_length,
            document = stats.block_symbols,
            rules = stats.num_rules,
            encoded = stats.encoded_bytes,
            "compressed"
        );

        Ok(Compressed {
            data,
            grammar,
            stats,
        })
    }

    /// Reads `reader` to the end, compresses it and writes the result.
    ///
    /// Nothing is written if compression fails.
    pub fn compress_stream<R: Read, W: Write>(
        &self,
        reader: R,
        writer: W,
    ) -> Result<CompressionStats> {
        let input = read_source(reader)?;
        let compressed = self.compress(&input)?;
        write_sink(writer, &compressed.data)?;
        Ok(compressed.stats)
    }
}

/// Compresses with the default configuration.
pub fn compress(input: &[u8]) -> Result<Vec<u8>> {
    Compressor::default().compress(input).map(|c| c.data)
}

/// Decodes a compressed stream back to the original bytes.
pub fn decompress(input: &[u8]) -> Result<Vec<u8>> {
    Grammar::decode(input)?.expand()
}

/// Reads a compressed stream from `reader` and writes the expansion.
///
/// Returns the number of bytes written.
pub fn decompress_stream<R: Read, W: Write>(reader: R, writer: W) -> Result<usize> {
    let input = read_source(reader)?;
    let output = decompress(&input)?;
    write_sink(writer, &output)?;
    Ok(output.len())
}

/// Decodes `encoded` independently and checks it expands to `original`.
pub fn verify(original: &[u8], encoded: &[u8]) -> Result<()> {
    let expanded = Grammar::decode(encoded)?.expand()?;

    if expanded != original {
        let offset = original
            .iter()
            .zip(&expanded)
            .position(|(a, b)| a != b)
            .unwrap_or_else(|| original.len().min(expanded.len()));

        error!(
            offset,
            expected = original.len(),
            actual = expanded.len(),
            "round trip mismatch"
        );
        return Err(Error::RoundTripFailure {
            offset,
            expected: original.len(),
            actual: expanded.len(),
        });
    }

    Ok(())
}

/// Statistics about one compression run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionStats {
    /// Number of input bytes
    pub input_length: usize,
    /// Symbols left in the final block
    pub block_symbols: usize,
    /// Rules in the final dictionary
    pub num_rules: usize,
    /// Total symbols across rule bodies
    pub rule_symbols: usize,
    /// Productive induction passes
    pub passes: usize,
    /// Size of the encoded stream in bytes
    pub encoded_bytes: usize,
}

impl CompressionStats {
    /// Block plus rule body symbols.
    pub fn grammar_symbols(&self) -> usize {
        self.block_symbols + self.rule_symbols
    }

    /// Encoded size as a percentage of the input size.
    ///
    /// Lower is better. Every symbol costs two bytes, so incompressible
    /// input comes out at 200%.
    pub fn compression_ratio(&self) -> f64 {
        if self.input_length == 0 {
            0.0
        } else {
            (self.encoded_bytes as f64 / self.input_length as f64) * 100.0
        }
    }
}
