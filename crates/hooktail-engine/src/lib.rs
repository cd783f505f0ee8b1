//! # hooktail-engine
//!
//! Deferral-tracking event correlator for Juju debug-log streams.
//!
//! This crate provides:
//!
//! - [`Correlator`] — Consumes classified log lines and maintains event history
//! - [`CorrelatorConfig`] — Targets, filters and display toggles
//! - [`Outcome`] — What processing one line did to the history
//! - [`EventRecord`] — One captured event with its deferral lifecycle
//! - [`DeferralStatus`] — Where an event is in that lifecycle
//! - [`DeferredEntry`] — An open deferral awaiting its re-emission
//! - [`EventFilter`] — User-supplied event name filter (lookarounds supported)
//! - [`TargetSet`] — Which units are being followed
//!
//! ## Example
//!
//! ```rust
//! use hooktail_engine::{Correlator, CorrelatorConfig, DeferralStatus};
//!
//! let mut correlator = Correlator::new(CorrelatorConfig::default().with_defer_tracking(true))?;
//! correlator.process("unit-myapp-0: 12:04:18 INFO unit.myapp/0.juju-log Emitting Juju event start.");
//! correlator.process("unit-myapp-0: 12:04:20 DEBUG unit.myapp/0.juju-log Deferring <StartEvent via Charm/on/start[3]>.");
//!
//! let records = correlator.captured();
//! assert_eq!(records[0].deferral, DeferralStatus::Deferred);
//! # Ok::<(), hooktail_engine::EngineError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod correlator;
pub mod error;
pub mod filter;
pub mod record;
pub mod targets;

// Re-export main types
pub use correlator::{Correlator, CorrelatorConfig, Outcome};
pub use error::{EngineError, Result};
pub use filter::EventFilter;
pub use record::{DeferralStatus, DeferredEntry, EventRecord};
pub use targets::TargetSet;

// The classifier types flow through the public API
pub use hooktail_parse::{ClassifiedLine, EventTag, LineKind, Verbosity};
