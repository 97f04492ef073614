//! Error types for the tokenizer.

use thiserror::Error;

/// Errors surfaced by the trie and the resource loaders.
///
/// Tokenization itself is total: any string is well-formed input. The
/// variants here cover misuse of the lexical trie and I/O failures while
/// loading word lists.
#[derive(Debug, Error)]
pub enum TokenizerError {
    /// A trie operation was given an empty word.
    #[error("empty word")]
    EmptyWord,

    /// An internal invariant was broken. Indicates a programming error,
    /// not bad input.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// I/O failure while reading a word-list pack.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
