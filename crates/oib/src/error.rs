//! Error types for identifier parsing.

use thiserror::Error;

/// Reasons an input string is not a valid OIB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OibError {
    /// The input does not contain exactly eleven characters.
    #[error("identifier must be 11 digits, found {actual} characters")]
    WrongLength {
        /// Number of characters in the rejected input.
        actual: usize,
    },

    /// A character other than an ASCII digit was found.
    #[error("identifier must contain only digits, found a non-digit at position {position}")]
    NonDigit {
        /// Zero-based character position of the first offending character.
        position: usize,
    },

    /// The final digit does not match the computed check digit.
    #[error("identifier check digit mismatch: expected {expected}, found {actual}")]
    ChecksumMismatch {
        /// Check digit computed from the first ten digits.
        expected: u8,
        /// Check digit present in the input.
        actual: u8,
    },
}
