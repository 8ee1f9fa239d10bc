//! Error types for tokenization

use std::time::Duration;
use thiserror::Error;

/// Errors raised while processing a single input item
///
/// Every variant is scoped to one item: the pipeline holds no mutable shared
/// state, so callers may skip the item and carry on with the next.
#[derive(Debug, Error)]
pub enum TokenizeError {
    /// URL recognition ran past its deadline
    #[error("URL extraction timed out after {limit:?} on: {text}")]
    TimeoutExceeded { limit: Duration, text: String },

    /// Structured record is missing required fields
    #[error("Unexpected input shape: {0}")]
    UnexpectedInputShape(String),

    /// A recognizer failed to compile
    #[error("Invalid pattern: {0}")]
    Pattern(String),

    /// Morphological analysis failed
    #[error("Morphological analysis failed: {0}")]
    Analysis(String),

    /// Entity masking changed the buffer length
    #[error("Masked text has {actual} characters, expected {expected}")]
    MaskLength { expected: usize, actual: usize },

    /// A pattern or dictionary resource could not be read
    #[error("I/O error: {0}")]
    Io(String),
}

impl TokenizeError {
    /// Whether the item may succeed when retried without URL extraction
    pub fn is_timeout(&self) -> bool {
        matches!(self, TokenizeError::TimeoutExceeded { .. })
    }
}

impl From<regex::Error> for TokenizeError {
    fn from(err: regex::Error) -> Self {
        TokenizeError::Pattern(err.to_string())
    }
}

impl From<fancy_regex::Error> for TokenizeError {
    fn from(err: fancy_regex::Error) -> Self {
        TokenizeError::Pattern(err.to_string())
    }
}

impl From<std::io::Error> for TokenizeError {
    fn from(err: std::io::Error) -> Self {
        TokenizeError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TokenizeError {
    fn from(err: serde_json::Error) -> Self {
        TokenizeError::UnexpectedInputShape(err.to_string())
    }
}

/// Result alias for tokenization operations
pub type Result<T> = std::result::Result<T, TokenizeError>;
