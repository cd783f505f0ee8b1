//! Error types for line classification.

use thiserror::Error;

/// Errors that can occur while building the classifier.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A line pattern in the grammar failed to compile.
    #[error("invalid line pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Result type alias for classifier operations.
pub type Result<T> = std::result::Result<T, ParseError>;
