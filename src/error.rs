//! Error types for grammar compression.

use thiserror::Error;

/// Result type alias for compression operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Compression error types.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading the byte source or writing the byte sink failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No pattern in the input repeats.
    #[error("nothing to compress: no pattern repeats in {len} bytes")]
    NothingToCompress { len: usize },

    /// The dictionary grew past the 16-bit code space.
    #[error("symbol {symbol} does not fit in a 16-bit code")]
    SymbolOverflow { symbol: i32 },

    /// A splice primitive met block content that contradicts a verified match.
    #[error("internal consistency: {message}")]
    InternalConsistency { message: String },

    /// Expanding the emitted grammar did not reproduce the input.
    #[error("round trip failed at byte {offset}: expected length {expected}, got {actual}")]
    RoundTripFailure {
        offset: usize,
        expected: usize,
        actual: usize,
    },

    /// A compressed stream could not be decoded.
    #[error("corrupted stream: {0}")]
    Corrupted(String),
}

impl Error {
    /// Create an internal consistency error.
    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Error::InternalConsistency {
            message: message.into(),
        }
    }

    /// Create a corrupted stream error.
    pub(crate) fn corrupted(message: impl Into<String>) -> Self {
        Error::Corrupted(message.into())
    }

    /// Whether the error indicates a bug rather than bad input or I/O.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::InternalConsistency { .. } | Error::RoundTripFailure { .. }
        )
    }
}
