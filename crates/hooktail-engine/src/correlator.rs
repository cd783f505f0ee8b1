//! Event correlation across a debug-log stream.
//!
//! The [`Correlator`] consumes raw log lines one at a time and keeps the
//! capture history: which events ran on which unit, which were deferred,
//! re-emitted or bounced, which hooks failed, and which events were injected
//! by tooling. Lines arrive in log order, so state changes always apply to
//! the most recent matching record.

use std::collections::BTreeMap;

use hooktail_parse::{
    ClassifiedLine, Classifier, ClassifierOptions, EventTag, LineKind, Verbosity,
};
use tracing::{debug, error, warn};

use crate::error::Result;
use crate::filter::EventFilter;
use crate::record::{DeferralStatus, DeferredEntry, EventRecord};
use crate::targets::TargetSet;

/// Configuration for a [`Correlator`].
#[derive(Debug, Clone)]
pub struct CorrelatorConfig {
    /// Units or applications to follow. Empty means everything.
    pub targets: Vec<String>,
    /// Initial leader map (`app -> unit`), updated as elections are seen.
    pub leaders: BTreeMap<String, String>,
    /// Track units of a targeted application as they appear.
    pub add_new_units: bool,
    /// Follow deferral lines, not just emissions.
    pub show_defer: bool,
    /// Follow root trace notes and attach ids to captures.
    pub show_traces: bool,
    /// Recognize the legacy "charm called itself" wording.
    pub show_operator_events: bool,
    /// Event name filter pattern.
    pub event_filter: Option<String>,
    /// Grammar slice the stream is expected to carry.
    pub verbosity: Verbosity,
}

impl Default for CorrelatorConfig {
    fn default() -> Self {
        Self {
            targets: Vec::new(),
            leaders: BTreeMap::new(),
            add_new_units: true,
            show_defer: false,
            show_traces: false,
            show_operator_events: false,
            event_filter: None,
            // debug-log streams are normally requested at DEBUG
            verbosity: Verbosity::FineGrained,
        }
    }
}

impl CorrelatorConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the units or applications to follow.
    #[must_use]
    pub fn with_targets(mut self, targets: Vec<String>) -> Self {
        self.targets = targets;
        self
    }

    /// Seeds the leader map.
    #[must_use]
    pub fn with_leaders(mut self, leaders: BTreeMap<String, String>) -> Self {
        self.leaders = leaders;
        self
    }

    /// Controls whether new units of a targeted application are picked up.
    #[must_use]
    pub const fn with_new_units(mut self, enabled: bool) -> Self {
        self.add_new_units = enabled;
        self
    }

    /// Enables deferral tracking.
    #[must_use]
    pub const fn with_defer_tracking(mut self, enabled: bool) -> Self {
        self.show_defer = enabled;
        self
    }

    /// Enables trace id capture.
    #[must_use]
    pub const fn with_trace_ids(mut self, enabled: bool) -> Self {
        self.show_traces = enabled;
        self
    }

    /// Enables operator event capture.
    #[must_use]
    pub const fn with_operator_events(mut self, enabled: bool) -> Self {
        self.show_operator_events = enabled;
        self
    }

    /// Sets the event name filter.
    #[must_use]
    pub fn with_event_filter(mut self, pattern: impl Into<String>) -> Self {
        self.event_filter = Some(pattern.into());
        self
    }

    /// Sets the expected grammar slice.
    #[must_use]
    pub const fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }
}

/// What processing one line did to the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A new record was appended at this index.
    Captured(usize),
    /// The record at this index was modified in place.
    Updated(usize),
    /// A trace id was stored for the next capture.
    TraceNoted,
}

/// Which processing path a classified line takes.
enum Mode {
    Modifier,
    Emit,
    Defer,
    Reemit,
}

/// Consumes debug-log lines and maintains the event history.
pub struct Correlator {
    classifier: Classifier,
    filter: Option<EventFilter>,
    targets: TargetSet,
    captured: Vec<EventRecord>,
    deferred: Vec<DeferredEntry>,
    leaders: BTreeMap<String, String>,
    next_trace_id: Option<String>,
    warned_about_orphans: bool,
    show_defer: bool,
}

impl Correlator {
    /// Builds a correlator from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the event filter or the line grammar fails to
    /// compile.
    pub fn new(config: CorrelatorConfig) -> Result<Self> {
        let filter = config
            .event_filter
            .as_deref()
            .map(EventFilter::new)
            .transpose()?;
        let classifier = Classifier::new(
            ClassifierOptions::default()
                .with_verbosity(config.verbosity)
                .with_operator_events(config.show_operator_events)
                .with_trace_notes(config.show_traces),
        )?;
        Ok(Self {
            classifier,
            filter,
            targets: TargetSet::new(config.targets, config.add_new_units),
            captured: Vec::new(),
            deferred: Vec::new(),
            leaders: config.leaders,
            next_trace_id: None,
            warned_about_orphans: false,
            show_defer: config.show_defer,
        })
    }

    /// Processes one log line.
    ///
    /// Returns `None` when the line is not a recognized event line, is
    /// filtered out, or belongs to an untracked unit.
    pub fn process(&mut self, line: &str) -> Option<Outcome> {
        let (hit, mode) = self.classify(line)?;

        if !self.targets.tracks(&hit.unit) {
            debug!(unit = %hit.unit, "skipping event from untracked unit");
            return None;
        }

        self.note_leader(&hit);

        match mode {
            Mode::Modifier => self.apply_modifier(hit),
            Mode::Emit => Some(self.capture(hit)),
            Mode::Defer => Some(self.defer(&hit)),
            Mode::Reemit => Some(self.reemit(&hit)),
        }
    }

    /// The capture history, oldest first.
    #[must_use]
    pub fn captured(&self) -> &[EventRecord] {
        &self.captured
    }

    /// Deferrals that have not been re-emitted yet.
    #[must_use]
    pub fn deferred(&self) -> &[DeferredEntry] {
        &self.deferred
    }

    /// Current leader map, `app -> unit`.
    #[must_use]
    pub const fn leaders(&self) -> &BTreeMap<String, String> {
        &self.leaders
    }

    /// Units present in the history, in order of first appearance.
    #[must_use]
    pub fn units(&self) -> Vec<&str> {
        let mut units: Vec<&str> = Vec::new();
        for record in &self.captured {
            if !units.contains(&record.unit.as_str()) {
                units.push(record.unit.as_str());
            }
        }
        units
    }

    /// The grammar slice currently in effect.
    #[must_use]
    pub const fn verbosity(&self) -> Verbosity {
        self.classifier.verbosity()
    }

    /// Capture counts per unit, for the end-of-session summary.
    #[must_use]
    pub fn counts_by_unit(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.captured {
            *counts.entry(record.unit.clone()).or_insert(0) += 1;
        }
        counts
    }

    fn classify(&mut self, line: &str) -> Option<(ClassifiedLine, Mode)> {
        if let Some(hit) = self.classifier.match_modifiers(line) {
            return self.filtered(hit).map(|hit| (hit, Mode::Modifier));
        }
        if let Some(hit) = self.classifier.match_emitted(line) {
            return self.filtered(hit).map(|hit| (hit, Mode::Emit));
        }
        if !self.show_defer {
            return None;
        }
        // substring guards keep the expensive rules off the hot path
        if line.contains("Deferring") {
            if let Some(hit) = self.classifier.match_deferred(line) {
                return self.filtered(hit).map(|hit| (hit, Mode::Defer));
            }
        }
        if line.contains("Re-emitting") {
            if let Some(hit) = self.classifier.match_reemitted(line) {
                return self.filtered(hit).map(|hit| (hit, Mode::Reemit));
            }
        }
        None
    }

    fn filtered(&self, hit: ClassifiedLine) -> Option<ClassifiedLine> {
        match &self.filter {
            Some(filter) if !filter.matches(&hit.event) => {
                debug!(event = %hit.event, "event filtered out");
                None
            }
            _ => Some(hit),
        }
    }

    fn note_leader(&mut self, hit: &ClassifiedLine) {
        if hit.event == "leader_elected" {
            let app = hit.unit.split('/').next().unwrap_or(&hit.unit);
            self.leaders.insert(app.to_string(), hit.unit.clone());
        }
    }

    fn capture(&mut self, hit: ClassifiedLine) -> Outcome {
        debug!(unit = %hit.unit, event = %hit.event, "captured event");
        self.captured.push(EventRecord::from(hit));
        let index = self.captured.len() - 1;
        self.attach_pending_trace(index);
        Outcome::Captured(index)
    }

    /// Opens (or bounces) a deferral.
    ///
    /// The deferral applies to the most recent capture of the same event on
    /// the same unit. If there is none, the log started mid-lifecycle and a
    /// mocked stand-in is appended instead.
    fn defer(&mut self, hit: &ClassifiedLine) -> Outcome {
        let n = hit.n.unwrap_or_default();

        let (index, outcome) = match self
            .captured
            .iter()
            .rposition(|r| r.unit == hit.unit && r.event == hit.event)
        {
            Some(index) => (index, Outcome::Updated(index)),
            None => {
                debug!(
                    unit = %hit.unit,
                    event = %hit.event,
                    "deferral of an event we never saw emitted, mocking it"
                );
                self.captured
                    .push(EventRecord::mocked(&hit.unit, &hit.event, &hit.loglevel));
                let index = self.captured.len() - 1;
                (index, Outcome::Captured(index))
            }
        };

        let already_open = self
            .deferred
            .iter()
            .any(|d| d.unit == hit.unit && d.n == n);

        let record = &mut self.captured[index];
        record.n = Some(n);
        // a record that was just re-emitted and defers again has bounced
        record.deferral = if record.deferral == DeferralStatus::Reemitted {
            DeferralStatus::Bounced
        } else {
            DeferralStatus::Deferred
        };

        if already_open {
            debug!(event = %hit.event, n, "bouncing an already-open deferral");
        } else {
            debug!(event = %hit.event, n, "opening deferral");
            self.deferred.push(DeferredEntry {
                unit: hit.unit.clone(),
                event: hit.event.clone(),
                n,
            });
        }
        outcome
    }

    /// Closes a deferral: the notice is being dispatched again.
    fn reemit(&mut self, hit: &ClassifiedLine) -> Outcome {
        let n = hit.n.unwrap_or_default();
        self.captured.push(EventRecord::from(hit.clone()));
        let index = self.captured.len() - 1;

        let open = self
            .deferred
            .iter()
            .rposition(|d| d.unit == hit.unit && d.n == n)
            .or_else(|| {
                self.warn_about_orphan(&hit.event, n);
                // pretend the deferral happened; the record just appended
                // stands in for the original emission
                self.defer(hit);
                self.deferred
                    .iter()
                    .rposition(|d| d.unit == hit.unit && d.n == n)
            });
        if let Some(position) = open {
            self.deferred.remove(position);
        }

        self.captured[index].deferral = DeferralStatus::Reemitted;
        debug!(event = %hit.event, n, "reemitted");
        self.attach_pending_trace(index);
        Outcome::Captured(index)
    }

    fn warn_about_orphan(&mut self, event: &str, n: u64) {
        if self.warned_about_orphans {
            return;
        }
        self.warned_about_orphans = true;
        warn!(
            event,
            n,
            "no open deferral matches this re-emission; this happens when \
             logging went verbose only after events had already been \
             deferred, so some output may look off"
        );
    }

    fn apply_modifier(&mut self, hit: ClassifiedLine) -> Option<Outcome> {
        match hit.kind {
            LineKind::Fired => {
                // the referenced event was injected; it inherits the marker
                let (index, created) = self.referenced_record(&hit);
                self.captured[index].tags = hit.tags;
                Some(modified(index, created))
            }
            LineKind::HookFailed => {
                let (index, created) = self.referenced_record(&hit);
                let record = &mut self.captured[index];
                record.tags.push(EventTag::Failed);
                record.exit_code = hit.exit_code.unwrap_or_default();
                Some(modified(index, created))
            }
            LineKind::TraceNote => {
                // the trace opens before the emission line is logged, so
                // hold the id for the capture that follows
                self.next_trace_id = hit.trace_id;
                Some(Outcome::TraceNoted)
            }
            LineKind::Replayed => Some(self.replay(hit)),
            // dispatch lines never reach the modifier path
            LineKind::Emitted | LineKind::Deferred | LineKind::Reemitted => None,
        }
    }

    /// The record a modifier line refers to: the most recent capture of the
    /// same event on the same unit, or a mocked stand-in if there is none.
    /// The flag says whether the stand-in had to be created.
    fn referenced_record(&mut self, hit: &ClassifiedLine) -> (usize, bool) {
        if let Some(index) = self
            .captured
            .iter()
            .rposition(|r| r.unit == hit.unit && r.event == hit.event)
        {
            return (index, false);
        }
        error!(
            unit = %hit.unit,
            event = %hit.event,
            "referenced event not in history, simulating it"
        );
        let mut record = EventRecord::mocked(&hit.unit, &hit.event, &hit.loglevel);
        record.timestamp = hit.timestamp.clone();
        self.captured.push(record);
        (self.captured.len() - 1, true)
    }

    /// A replay shows up as a fresh capture of the same event, with the
    /// original capture (found by timestamp) marked as its source.
    fn replay(&mut self, hit: ClassifiedLine) -> Outcome {
        let replayed_from = hit.replayed_from.clone();
        self.captured.push(EventRecord::from(hit));
        let index = self.captured.len() - 1;

        let original = replayed_from
            .as_deref()
            .and_then(|stamp| self.captured.iter().position(|r| r.timestamp == stamp));
        match original {
            Some(source) if source != index => {
                self.captured[source]
                    .tags
                    .extend([EventTag::Jhack, EventTag::Replay, EventTag::Source]);
            }
            _ => debug!("replay source not in history, too far in the past"),
        }

        self.captured[index].tags = vec![EventTag::Jhack, EventTag::Replay, EventTag::Replayed];
        self.attach_pending_trace(index);
        Outcome::Captured(index)
    }

    fn attach_pending_trace(&mut self, index: usize) {
        if let Some(trace_id) = self.next_trace_id.take() {
            self.captured[index].trace_id = Some(trace_id);
        }
    }
}

const fn modified(index: usize, created: bool) -> Outcome {
    if created {
        Outcome::Captured(index)
    } else {
        Outcome::Updated(index)
    }
}

// =============================================================================
// Tests
// =============================================================================
