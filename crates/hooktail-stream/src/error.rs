//! Error types for line sources.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or interlacing log files.
#[derive(Debug, Error)]
pub enum StreamError {
    /// A log file could not be opened.
    #[error("cannot open log file {}: {source}", path.display())]
    Open {
        /// The file that failed to open.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// An I/O error occurred while reading.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Interlacing needs full datetimes, but a line only carries a time.
    #[error(
        "{}: line has no date, cannot interlace; re-export with `juju debug-log --date`",
        path.display()
    )]
    MissingDate {
        /// The file the dateless line came from.
        path: PathBuf,
    },

    /// A line did not look like a debug-log line at all.
    #[error("{}: cannot parse line for interlacing: {line:?}", path.display())]
    Unparseable {
        /// The file the line came from.
        path: PathBuf,
        /// The offending line.
        line: String,
    },
}

/// Result type alias for line source operations.
pub type Result<T> = std::result::Result<T, StreamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = StreamError::MissingDate {
            path: PathBuf::from("model.log"),
        };
        assert!(err.to_string().contains("juju debug-log --date"));
        assert!(err.to_string().contains("model.log"));

        let err = StreamError::Unparseable {
            path: PathBuf::from("model.log"),
            line: "garbage".to_string(),
        };
        assert!(err.to_string().contains("garbage"));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StreamError>();
    }
}
