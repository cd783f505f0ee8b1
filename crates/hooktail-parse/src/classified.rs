//! Core types produced by line classification.
//!
//! This module provides:
//! - [`Verbosity`] — Which slice of the debug-log grammar is live
//! - [`LineKind`] — What a recognized line means
//! - [`EventTag`] — Origin markers attached to recognized lines
//! - [`ClassifiedLine`] — Structured view of one recognized log line

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which slice of the debug-log grammar the classifier applies.
///
/// A stream recorded at `WARNING` or `INFO` only carries uniter operation
/// lines, so the classifier starts on the coarse grammar. The first line it
/// recognizes at `DEBUG` or `TRACE` proves the stream carries framework
/// output too, and the classifier switches to the fine grammar permanently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verbosity {
    /// Only uniter operation lines are available (INFO/WARNING streams).
    #[default]
    CoarseOnly,
    /// Framework emission lines are available (DEBUG/TRACE streams).
    FineGrained,
}

impl Verbosity {
    /// Returns true while the classifier is restricted to uniter lines.
    #[must_use]
    pub const fn is_coarse(self) -> bool {
        matches!(self, Self::CoarseOnly)
    }

    /// Infers the grammar slice implied by a Juju log level string.
    #[must_use]
    pub fn from_level(level: &str) -> Self {
        if level.eq_ignore_ascii_case("debug") || level.eq_ignore_ascii_case("trace") {
            Self::FineGrained
        } else {
            Self::CoarseOnly
        }
    }
}

/// What a recognized log line means.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// An event was dispatched to the charm (uniter or framework wording).
    #[default]
    Emitted,
    /// The charm deferred an event to a later dispatch.
    Deferred,
    /// A previously deferred event was picked up again.
    Reemitted,
    /// A hook exited nonzero.
    HookFailed,
    /// The event was synthesized by an external fire command.
    Fired,
    /// The event is a replay of an earlier capture.
    Replayed,
    /// A root trace id was opened for the next dispatch.
    TraceNote,
}

/// Origin markers carried by a classified line.
///
/// Tags travel with the line into the correlation engine, which stores them
/// on the captured record and renders them as annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventTag {
    /// Emitted through the charm's own custom event machinery.
    Custom,
    /// The charm re-invoked itself through its dispatch script.
    Operator,
    /// Synthesized or manipulated by external tooling.
    Jhack,
    /// Injected by a fire command.
    Fire,
    /// Part of a replay exchange.
    Replay,
    /// Swallowed by an active lobotomy instead of being dispatched.
    Lobotomy,
    /// The hook for this event exited nonzero.
    Failed,
    /// The original capture a replay was taken from.
    Source,
    /// The re-executed copy in a replay exchange.
    Replayed,
    /// A root trace id is attached to this event.
    Trace,
}

impl EventTag {
    /// Returns the lowercase label used in rendered output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Custom => "custom",
            Self::Operator => "operator",
            Self::Jhack => "jhack",
            Self::Fire => "fire",
            Self::Replay => "replay",
            Self::Lobotomy => "lobotomy",
            Self::Failed => "failed",
            Self::Source => "source",
            Self::Replayed => "replayed",
            Self::Trace => "trace",
        }
    }
}

impl fmt::Display for EventTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured view of one recognized debug-log line.
///
/// Fields that the matched grammar rule does not produce are left at their
/// empty/`None` defaults; `unit`, `timestamp` and `loglevel` are present for
/// every rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedLine {
    /// What the line means.
    pub kind: LineKind,
    /// Unit that produced the line, in `app/n` form.
    pub unit: String,
    /// Timestamp text exactly as it appeared in the line.
    pub timestamp: String,
    /// Log level text exactly as it appeared in the line.
    pub loglevel: String,
    /// Event name with hyphens normalized to underscores.
    ///
    /// Empty for trace notes, which reference the next event rather than
    /// naming one.
    pub event: String,
    /// Relation endpoint, when the line came through a relation hook.
    pub endpoint: Option<String>,
    /// Relation id, when the line came through a relation hook.
    pub endpoint_id: Option<String>,
    /// Framework notice number, present on defer and re-emit lines.
    pub n: Option<u64>,
    /// Exit status, present on hook failure lines.
    pub exit_code: Option<i32>,
    /// Root trace id, present on trace notes.
    pub trace_id: Option<String>,
    /// Timestamp of the capture a replay was taken from.
    pub replayed_from: Option<String>,
    /// Origin markers for this line.
    pub tags: Vec<EventTag>,
}

impl ClassifiedLine {
    /// Returns true when any tag marks this line as tool-injected.
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.tags.contains(&EventTag::Jhack)
    }
}
