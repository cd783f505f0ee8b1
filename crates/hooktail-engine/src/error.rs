//! Error types for the correlation engine.

use thiserror::Error;

/// Errors that can occur while building or running the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The user-supplied event filter failed to compile.
    #[error("invalid event filter {pattern:?}: {source}")]
    InvalidFilter {
        /// The pattern as given.
        pattern: String,
        /// The underlying compile error.
        source: fancy_regex::Error,
    },

    /// The line grammar failed to compile.
    #[error(transparent)]
    Parse(#[from] hooktail_parse::ParseError),
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
