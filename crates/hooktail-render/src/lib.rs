//! # hooktail-render
//!
//! Table frames and deferral-lane line art for the hooktail event history.
//!
//! This crate provides:
//!
//! - [`LaneAllocator`] — Stable lane assignment for concurrent deferral chains
//! - [`Connector`] — One cell of the rail grid threading a chain between rows
//! - [`TableBuilder`] — Plain-text table frames from the captured history
//! - [`TableOptions`] — Cropping, ordering and column toggles
//! - [`FrameLimiter`] — Caps how often a live view redraws
//!
//! ## Example
//!
//! ```rust
//! use std::collections::BTreeMap;
//!
//! use hooktail_engine::EventRecord;
//! use hooktail_render::{TableBuilder, TableOptions};
//!
//! let record = EventRecord {
//!     unit: "myapp/0".to_string(),
//!     timestamp: "12:04:18".to_string(),
//!     event: "start".to_string(),
//!     ..EventRecord::default()
//! };
//!
//! let mut builder = TableBuilder::new(TableOptions::default());
//! let frame = builder.frame(&[record], &[], &BTreeMap::new());
//! assert!(frame.contains("myapp/0"));
//! assert!(frame.contains("start"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod lanes;
pub mod limiter;
pub mod symbols;
pub mod table;

// Re-export main types
pub use lanes::{Connector, LaneAllocator};
pub use limiter::FrameLimiter;
pub use table::{TableBuilder, TableOptions};
