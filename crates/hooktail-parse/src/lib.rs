//! # hooktail-parse
//!
//! Line classifier for the Juju `debug-log` grammar.
//!
//! This crate provides:
//!
//! - [`Classifier`] — Stateful matcher that turns raw log lines into events
//! - [`ClassifierOptions`] — Toggles for operator/trace capture and verbosity
//! - [`ClassifiedLine`] — Structured view of one recognized log line
//! - [`LineKind`] — What a recognized line means (emit, defer, failure, ...)
//! - [`EventTag`] — Origin markers attached to recognized lines
//! - [`Verbosity`] — Coarse (uniter-only) vs fine-grained (framework) grammar
//!
//! ## Example
//!
//! ```rust
//! use hooktail_parse::{Classifier, ClassifierOptions, LineKind};
//!
//! let mut classifier = Classifier::new(ClassifierOptions::default()).unwrap();
//! let line = "unit-ubuntu-0: 12:17:50 INFO juju.worker.uniter.operation \
//!             ran \"install\" hook (via hook dispatching script: dispatch)";
//!
//! let hit = classifier.match_emitted(line).unwrap();
//! assert_eq!(hit.kind, LineKind::Emitted);
//! assert_eq!(hit.unit, "ubuntu/0");
//! assert_eq!(hit.event, "install");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod classified;
pub mod classifier;
pub mod error;

// Re-export main types
pub use classified::{ClassifiedLine, EventTag, LineKind, Verbosity};
pub use classifier::{Classifier, ClassifierOptions};
pub use error::{ParseError, Result};
