//! Captured event records and their deferral lifecycle.
//!
//! This module provides:
//! - [`DeferralStatus`] — Where an event is in its deferral lifecycle
//! - [`EventRecord`] — One captured event
//! - [`DeferredEntry`] — An open deferral awaiting its re-emission

use hooktail_parse::{ClassifiedLine, EventTag};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where an event sits in its deferral lifecycle.
///
/// `Bounced` marks a record that was re-emitted and immediately deferred
/// again in the same dispatch, closing one deferral span and opening the
/// next on the same row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeferralStatus {
    /// Never deferred.
    #[default]
    Null,
    /// Deferred, awaiting re-emission.
    Deferred,
    /// Picked up again after a deferral.
    Reemitted,
    /// Re-emitted and deferred again in one dispatch.
    Bounced,
}

impl DeferralStatus {
    /// Returns the lowercase label used in serialized output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Deferred => "deferred",
            Self::Reemitted => "reemitted",
            Self::Bounced => "bounced",
        }
    }
}

impl fmt::Display for DeferralStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One captured event in the history.
///
/// Records are append-only but not immutable: later lines can change the
/// deferral status, add tags, or stamp an exit code onto an earlier record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Unit that emitted the event, in `app/n` form.
    pub unit: String,
    /// Timestamp text from the log line. Empty on mocked records.
    pub timestamp: String,
    /// Log level text from the log line.
    pub loglevel: String,
    /// Event name.
    pub event: String,
    /// True when the engine invented this record to keep the history
    /// consistent (the log started after the event actually happened).
    pub mocked: bool,
    /// Deferral lifecycle state.
    pub deferral: DeferralStatus,
    /// Framework notice number, stamped once the event is seen deferring.
    pub n: Option<u64>,
    /// Origin markers.
    pub tags: Vec<EventTag>,
    /// Relation endpoint, when captured from a relation hook line.
    pub endpoint: Option<String>,
    /// Relation id, when captured from a relation hook line.
    pub endpoint_id: Option<String>,
    /// For replay records, the timestamp of the capture that was replayed.
    pub replayed_from: Option<String>,
    /// Root trace id attached to this dispatch.
    pub trace_id: Option<String>,
    /// Hook exit status. Zero unless a failure line referenced this record.
    pub exit_code: i32,
}

impl EventRecord {
    /// Builds a record the engine invented to stand in for an event it never
    /// saw emitted. Mocked records carry no timestamp.
    #[must_use]
    pub fn mocked(unit: &str, event: &str, loglevel: &str) -> Self {
        Self {
            unit: unit.to_string(),
            event: event.to_string(),
            loglevel: loglevel.to_string(),
            mocked: true,
            ..Self::default()
        }
    }

    /// The application this record's unit belongs to.
    #[must_use]
    pub fn app(&self) -> &str {
        self.unit.split('/').next().unwrap_or(&self.unit)
    }

    /// Returns true if the hook for this event exited nonzero.
    #[must_use]
    pub fn failed(&self) -> bool {
        self.tags.contains(&EventTag::Failed)
    }
}

impl From<ClassifiedLine> for EventRecord {
    fn from(line: ClassifiedLine) -> Self {
        Self {
            unit: line.unit,
            timestamp: line.timestamp,
            loglevel: line.loglevel,
            event: line.event,
            mocked: false,
            deferral: DeferralStatus::Null,
            n: line.n,
            tags: line.tags,
            endpoint: line.endpoint,
            endpoint_id: line.endpoint_id,
            replayed_from: line.replayed_from,
            trace_id: line.trace_id,
            exit_code: line.exit_code.unwrap_or_default(),
        }
    }
}

/// An open deferral: a notice the framework has parked and not yet re-run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeferredEntry {
    /// Unit the deferral belongs to.
    pub unit: String,
    /// Event name.
    pub event: String,
    /// Framework notice number. Unique per unit.
    pub n: u64,
}
