//! # hooktail-stream
//!
//! Line sources for debug-log tailing.
//!
//! This crate provides:
//!
//! - [`LinePeeker`] — Buffered line reader with one-line lookahead
//! - [`LogInterlacer`] — Chronological merge across several exported log files
//!
//! ## Example
//!
//! ```rust,no_run
//! use hooktail_stream::LogInterlacer;
//!
//! let mut source = LogInterlacer::open(&["model-a.log".into(), "model-b.log".into()])?;
//! while let Some(line) = source.next_line()? {
//!     println!("{line}");
//! }
//! # Ok::<(), hooktail_stream::StreamError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod interlace;
pub mod peeker;

// Re-export main types
pub use error::{Result, StreamError};
pub use interlace::LogInterlacer;
pub use peeker::LinePeeker;
