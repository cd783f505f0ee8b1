//! CLI error types.

use std::io;
use thiserror::Error;

/// Errors that can end a tailing run.
#[derive(Debug, Error)]
pub enum CliError {
    /// The engine rejected its configuration or a line.
    #[error(transparent)]
    Engine(#[from] hooktail_engine::EngineError),

    /// A log file could not be read or interlaced.
    #[error(transparent)]
    Stream(#[from] hooktail_stream::StreamError),

    /// The log command could not be spawned.
    #[error("cannot spawn `{command}`: {source}")]
    Spawn {
        /// The command line that failed to start.
        command: String,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// An I/O error occurred while reading the stream or writing frames.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
