//! Stateful matcher for the Juju debug-log grammar.
//!
//! One [`Classifier`] instance owns the compiled grammar and the verbosity
//! state. Lines are offered to one of four entry points depending on what the
//! caller is looking for; each returns the first rule that matches, tried in
//! a fixed order.

use regex::{Captures, Regex};
use tracing::debug;

use crate::classified::{ClassifiedLine, EventTag, LineKind, Verbosity};
use crate::error::Result;

/// Start of every `juju-log` payload line. The leading token is the pod name,
/// the timestamp may be `HH:MM:SS` or `YYYY-MM-DD HH:MM:SS`.
const JUJU_LOG_ROOT: &str = r"^(?P<pod>\S+): (?P<timestamp>\S+(\s*\S+)?) (?P<loglevel>\S+) unit\.(?P<unit>\S+)\.juju-log ";

/// Some charms configure a root logger that glues a `module:` token onto the
/// payload (`root:Emitting Juju event ...`). This optional group swallows it,
/// with or without a trailing space.
const LOGGER_PREFIX: &str = r"(\S+)?( )?";

/// `<endpoint>:<relation id>: ` infix present when the line was logged from
/// inside a relation hook.
const RELATION_INFIX: &str = r"(?P<endpoint>\S+):(?P<endpoint_id>\S+): ";

/// Printed repr of a framework event, carrying the notice number `n`.
const EVENT_REPR: &str = r"<(?P<event_cls>\S+) via (?P<charm>\S+)/on/(?P<event>\S+)\[(?P<n>\d+)\]>\.";

const EMITTED_SUFFIX: &str = r"Emitting Juju event (?P<event>\S+)\.";
const OPERATOR_SUFFIX: &str = r"Charm called itself via hooks/(?P<event>\S+)\.";
const FIRED_SUFFIX: &str = r"The previous (?P<event>\S+) was fired by jhack\.";
const REPLAYED_SUFFIX: &str =
    r"(?P<event>\S+) \((?P<replayed_from>\S+(\s*\S+)?)\) was replayed by jhack\.";
const LOBOTOMY_SUFFIX: &str =
    r"(?:selective|full) lobotomy ACTIVE: event hooks/(?P<event>\S+) ignored\.";
const TRACE_SUFFIX: &str = r"(.* )?Starting root trace with id='(?P<trace_id>\S+)'\.";

/// Start of a uniter operation line. These come from the agent rather than
/// the charm, so the unit is encoded in the pod name.
const UNITER_OPERATION: &str = r"^unit-(?P<unit_name>\S+)-(?P<unit_number>\d+): (?P<timestamp>\S+( \S+)?) (?P<loglevel>\S+) juju\.worker\.uniter\.operation ";

const UNITER_RAN_SUFFIX: &str = r#"ran "(?P<event>\S+)" hook \(via hook dispatching script: dispatch\)"#;
const HOOK_FAILED_SUFFIX: &str = r#"hook "(?P<event>\S+)" \(via hook dispatching script: dispatch\) failed: exit status (?P<exit_code>\S+)"#;
const DEBUG_HOOKS_LINE: &str = r"^unit-(?P<unit_name>\S+)-(?P<unit_number>\d+): (?P<timestamp>\S+( \S+)?) (?P<loglevel>\S+) juju\.worker\.uniter\.runner executing (?P<event>\S+) via debug-hooks; hook dispatching script: dispatch";

const NO_TAGS: &[EventTag] = &[];
const CUSTOM_TAGS: &[EventTag] = &[EventTag::Custom];
const OPERATOR_TAGS: &[EventTag] = &[EventTag::Operator];
const FIRE_TAGS: &[EventTag] = &[EventTag::Jhack, EventTag::Fire];
const REPLAY_TAGS: &[EventTag] = &[EventTag::Jhack, EventTag::Replay];
const LOBOTOMY_TAGS: &[EventTag] = &[EventTag::Jhack, EventTag::Lobotomy];
const FAILED_TAGS: &[EventTag] = &[EventTag::Failed];
const TRACE_TAGS: &[EventTag] = &[EventTag::Trace];

/// The compiled rule set. Patterns are anchored, so a failed match is cheap.
struct Grammar {
    emitted: Regex,
    emitted_relation: Regex,
    custom: Regex,
    custom_relation: Regex,
    operator: Regex,
    deferred: Regex,
    deferred_relation: Regex,
    reemitted_old: Regex,
    reemitted_relation_old: Regex,
    reemitted_new: Regex,
    reemitted_relation_new: Regex,
    fired: Regex,
    replayed: Regex,
    lobotomy: Regex,
    trace_note: Regex,
    uniter_ran: Regex,
    uniter_debug_hooks: Regex,
    hook_failed: Regex,
}

impl Grammar {
    fn compile() -> Result<Self> {
        let base = format!("{JUJU_LOG_ROOT}{LOGGER_PREFIX}");
        let base_relation = format!("{base}{RELATION_INFIX}{LOGGER_PREFIX}");

        Ok(Self {
            emitted: Regex::new(&format!("{base}{EMITTED_SUFFIX}"))?,
            emitted_relation: Regex::new(&format!("{base_relation}{EMITTED_SUFFIX}"))?,
            // custom event emission wording shipped with ops 2.1
            custom: Regex::new(&format!("{base}Emitting custom event {EVENT_REPR}"))?,
            custom_relation: Regex::new(&format!(
                "{base_relation}Emitting custom event {EVENT_REPR}"
            ))?,
            operator: Regex::new(&format!("{base}{OPERATOR_SUFFIX}"))?,
            deferred: Regex::new(&format!("{base}Deferring {EVENT_REPR}"))?,
            deferred_relation: Regex::new(&format!("{base_relation}Deferring {EVENT_REPR}"))?,
            // ops < 2.1 wording
            reemitted_old: Regex::new(&format!("{base}Re-emitting {EVENT_REPR}"))?,
            reemitted_relation_old: Regex::new(&format!("{base_relation}Re-emitting {EVENT_REPR}"))?,
            // ops >= 2.1 wording
            reemitted_new: Regex::new(&format!("{base}Re-emitting deferred event {EVENT_REPR}"))?,
            reemitted_relation_new: Regex::new(&format!(
                "{base_relation}Re-emitting deferred event {EVENT_REPR}"
            ))?,
            fired: Regex::new(&format!("{base}{FIRED_SUFFIX}"))?,
            replayed: Regex::new(&format!("{base}{REPLAYED_SUFFIX}"))?,
            lobotomy: Regex::new(&format!("{base}{LOBOTOMY_SUFFIX}"))?,
            trace_note: Regex::new(&format!("{base}{TRACE_SUFFIX}"))?,
            uniter_ran: Regex::new(&format!("{UNITER_OPERATION}{UNITER_RAN_SUFFIX}"))?,
            uniter_debug_hooks: Regex::new(DEBUG_HOOKS_LINE)?,
            hook_failed: Regex::new(&format!("{UNITER_OPERATION}{HOOK_FAILED_SUFFIX}"))?,
        })
    }
}

type Rule<'a> = (&'a Regex, LineKind, &'static [EventTag]);

fn first_match(line: &str, rules: &[Rule<'_>]) -> Option<ClassifiedLine> {
    rules.iter().find_map(|(pattern, kind, tags)| {
        pattern
            .captures(line)
            .map(|caps| extract(&caps, *kind, tags))
    })
}

fn extract(caps: &Captures<'_>, kind: LineKind, tags: &[EventTag]) -> ClassifiedLine {
    let text = |name: &str| caps.name(name).map(|m| m.as_str().to_string());

    let mut line = ClassifiedLine {
        kind,
        unit: text("unit").unwrap_or_default(),
        timestamp: text("timestamp").unwrap_or_default(),
        loglevel: text("loglevel").unwrap_or_default(),
        // juju mangles event names to hyphens in hook paths; normalize back
        event: text("event").unwrap_or_default().replace('-', "_"),
        endpoint: text("endpoint"),
        endpoint_id: text("endpoint_id"),
        n: caps.name("n").and_then(|m| m.as_str().parse().ok()),
        exit_code: caps.name("exit_code").and_then(|m| m.as_str().parse().ok()),
        trace_id: text("trace_id"),
        replayed_from: text("replayed_from"),
        tags: tags.to_vec(),
    };

    // uniter lines carry the unit inside the pod name
    if let (Some(app), Some(number)) = (text("unit_name"), text("unit_number")) {
        line.unit = format!("{app}/{number}");
    }

    line
}

/// Configuration for a [`Classifier`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifierOptions {
    /// Grammar slice to start from. Streams recorded at DEBUG/TRACE should
    /// start fine-grained; the classifier upgrades itself either way as soon
    /// as a fine line proves the stream is rich enough.
    pub verbosity: Verbosity,
    /// Also recognize the legacy "charm called itself" wording.
    pub capture_operator: bool,
    /// Also recognize root trace notes.
    pub capture_traces: bool,
}

impl ClassifierOptions {
    /// Creates the default option set (coarse, no operator, no traces).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the starting grammar slice.
    #[must_use]
    pub const fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Enables the operator event rule.
    #[must_use]
    pub const fn with_operator_events(mut self, enabled: bool) -> Self {
        self.capture_operator = enabled;
        self
    }

    /// Enables trace note recognition.
    #[must_use]
    pub const fn with_trace_notes(mut self, enabled: bool) -> Self {
        self.capture_traces = enabled;
        self
    }
}

/// Turns raw debug-log lines into [`ClassifiedLine`]s.
///
/// The classifier is stateful in exactly one way: it starts out assuming the
/// stream only carries uniter operation lines (the case for models logging at
/// INFO or WARNING) and permanently switches to the fine-grained grammar the
/// first time it recognizes a line logged at DEBUG or TRACE.
pub struct Classifier {
    grammar: Grammar,
    verbosity: Verbosity,
    capture_operator: bool,
    capture_traces: bool,
}

impl Classifier {
    /// Compiles the grammar and returns a ready classifier.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ParseError::Pattern`] if a rule fails to compile.
    pub fn new(options: ClassifierOptions) -> Result<Self> {
        Ok(Self {
            grammar: Grammar::compile()?,
            verbosity: options.verbosity,
            capture_operator: options.capture_operator,
            capture_traces: options.capture_traces,
        })
    }

    /// The grammar slice currently in effect.
    #[must_use]
    pub const fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Matches event dispatch lines: uniter operations, framework emissions,
    /// custom events, lobotomy notices and (optionally) operator events.
    pub fn match_emitted(&mut self, line: &str) -> Option<ClassifiedLine> {
        let hit = self.emitted_rules(line)?;
        self.note_level(&hit.loglevel);
        Some(hit)
    }

    /// Matches `Deferring <...>` lines. Only available on fine streams.
    pub fn match_deferred(&mut self, line: &str) -> Option<ClassifiedLine> {
        if self.verbosity.is_coarse() {
            return None;
        }
        let hit = first_match(
            line,
            &[
                (&self.grammar.deferred, LineKind::Deferred, NO_TAGS),
                (&self.grammar.deferred_relation, LineKind::Deferred, NO_TAGS),
            ],
        )?;
        self.note_level(&hit.loglevel);
        Some(hit)
    }

    /// Matches `Re-emitting <...>` lines in both wordings. Only available on
    /// fine streams.
    pub fn match_reemitted(&mut self, line: &str) -> Option<ClassifiedLine> {
        if self.verbosity.is_coarse() {
            return None;
        }
        let hit = first_match(
            line,
            &[
                (&self.grammar.reemitted_old, LineKind::Reemitted, NO_TAGS),
                (
                    &self.grammar.reemitted_relation_old,
                    LineKind::Reemitted,
                    NO_TAGS,
                ),
                (&self.grammar.reemitted_new, LineKind::Reemitted, NO_TAGS),
                (
                    &self.grammar.reemitted_relation_new,
                    LineKind::Reemitted,
                    NO_TAGS,
                ),
            ],
        )?;
        self.note_level(&hit.loglevel);
        Some(hit)
    }

    /// Matches lines that modify the meaning of other lines: hook failures,
    /// fire/replay injections and (optionally) trace notes.
    pub fn match_modifiers(&mut self, line: &str) -> Option<ClassifiedLine> {
        let hit = self.modifier_rules(line)?;
        self.note_level(&hit.loglevel);
        Some(hit)
    }

    fn emitted_rules(&self, line: &str) -> Option<ClassifiedLine> {
        // a lobotomized event never reaches the charm, but we still want to
        // show it; this rule wins over everything else in both modes
        if let Some(hit) = first_match(
            line,
            &[(&self.grammar.lobotomy, LineKind::Emitted, LOBOTOMY_TAGS)],
        ) {
            return Some(hit);
        }

        if self.verbosity.is_coarse() {
            // the plain emission rule still gets a chance, so a fine line
            // arriving on a supposedly-coarse stream flips us over
            return first_match(
                line,
                &[
                    (&self.grammar.uniter_ran, LineKind::Emitted, NO_TAGS),
                    (&self.grammar.uniter_debug_hooks, LineKind::Emitted, NO_TAGS),
                    (&self.grammar.emitted, LineKind::Emitted, NO_TAGS),
                ],
            );
        }

        // fine streams log both the uniter line and the framework line for
        // the same dispatch; matching only the framework one avoids counting
        // every event twice
        let mut rules: Vec<Rule<'_>> = vec![
            (&self.grammar.emitted, LineKind::Emitted, NO_TAGS),
            (&self.grammar.emitted_relation, LineKind::Emitted, NO_TAGS),
            (&self.grammar.custom, LineKind::Emitted, CUSTOM_TAGS),
            (&self.grammar.custom_relation, LineKind::Emitted, CUSTOM_TAGS),
        ];
        if self.capture_operator {
            rules.push((&self.grammar.operator, LineKind::Emitted, OPERATOR_TAGS));
        }
        first_match(line, &rules)
    }

    fn modifier_rules(&self, line: &str) -> Option<ClassifiedLine> {
        let mut rules: Vec<Rule<'_>> = vec![(
            &self.grammar.hook_failed,
            LineKind::HookFailed,
            FAILED_TAGS,
        )];
        if !self.verbosity.is_coarse() {
            rules.push((&self.grammar.fired, LineKind::Fired, FIRE_TAGS));
            rules.push((&self.grammar.replayed, LineKind::Replayed, REPLAY_TAGS));
            if self.capture_traces {
                rules.push((&self.grammar.trace_note, LineKind::TraceNote, TRACE_TAGS));
            }
        }
        first_match(line, &rules)
    }

    fn note_level(&mut self, loglevel: &str) {
        if self.verbosity.is_coarse() && Verbosity::from_level(loglevel) == Verbosity::FineGrained {
            debug!(loglevel, "fine-grained line seen, upgrading grammar");
            self.verbosity = Verbosity::FineGrained;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn coarse() -> Classifier {
        Classifier::new(ClassifierOptions::default()).unwrap()
    }

    fn fine() -> Classifier {
        Classifier::new(ClassifierOptions::default().with_verbosity(Verbosity::FineGrained))
            .unwrap()
    }

    // =========================================================================
    // Emission lines
    // =========================================================================

    #[test]
    fn uniter_ran_hook() {
        let mut c = coarse();
        let hit = c
            .match_emitted(
                "unit-myapp-0: 12:04:18 INFO juju.worker.uniter.operation ran \"update-status\" hook (via hook dispatching script: dispatch)",
            )
            .unwrap();
        assert_eq!(hit.kind, LineKind::Emitted);
        assert_eq!(hit.unit, "myapp/0");
        assert_eq!(hit.timestamp, "12:04:18");
        assert_eq!(hit.event, "update_status");
        assert!(hit.tags.is_empty());
    }

    #[test]
    fn uniter_unit_name_with_hyphens() {
        let mut c = coarse();
        let hit = c
            .match_emitted(
                "unit-prometheus-node-exporter-0: 12:04:18 INFO juju.worker.uniter.operation ran \"install\" hook (via hook dispatching script: dispatch)",
            )
            .unwrap();
        assert_eq!(hit.unit, "prometheus-node-exporter/0");
    }

    #[test]
    fn debug_hooks_execution() {
        let mut c = coarse();
        let hit = c
            .match_emitted(
                "unit-myapp-0: 12:04:18 INFO juju.worker.uniter.runner executing config-changed via debug-hooks; hook dispatching script: dispatch",
            )
            .unwrap();
        assert_eq!(hit.unit, "myapp/0");
        assert_eq!(hit.event, "config_changed");
    }

    #[test]
    fn framework_emission() {
        let mut c = fine();
        let hit = c
            .match_emitted("unit-myapp-0: 12:04:18 INFO unit.myapp/0.juju-log Emitting Juju event start.")
            .unwrap();
        assert_eq!(hit.kind, LineKind::Emitted);
        assert_eq!(hit.unit, "myapp/0");
        assert_eq!(hit.event, "start");
        assert!(hit.tags.is_empty());
    }

    #[test]
    fn framework_emission_with_date() {
        let mut c = fine();
        let hit = c
            .match_emitted(
                "unit-postgresql-11: 2025-06-16 11:18:48 DEBUG unit.postgresql/11.juju-log restart:15: root:Emitting Juju event restart_relation_joined.",
            )
            .unwrap();
        assert_eq!(hit.unit, "postgresql/11");
        assert_eq!(hit.timestamp, "2025-06-16 11:18:48");
        assert_eq!(hit.event, "restart_relation_joined");
    }

    #[test]
    fn glued_logger_prefix() {
        // machine charms with a reconfigured root logger glue "root:" onto
        // the payload
        let mut c = fine();
        let hit = c
            .match_emitted(
                "unit-postgresql-1: 09:25:36 DEBUG unit.postgresql/1.juju-log root:Emitting Juju event leader_settings_changed.",
            )
            .unwrap();
        assert_eq!(hit.event, "leader_settings_changed");
    }

    #[test_case(
        "unit-prom-1: 12:56:44 DEBUG unit.prom/1.juju-log ingress:1: Emitting custom event <IngressPerUnitReadyForUnitEvent via PrometheusCharm/IngressPerUnitRequirer[ingress]/on/ready_for_unit[14]>.",
        "ready_for_unit";
        "long repr"
    )]
    #[test_case(
        "unit-prom-1: 12:56:44 DEBUG unit.prom/1.juju-log ingress:1: Emitting custom event <Foo via PrometheusCharm/IngressPerUnitRequirer[ingress]/on/bar[14]>.",
        "bar";
        "short repr"
    )]
    fn custom_event(line: &str, expected: &str) {
        let mut c = fine();
        let hit = c.match_emitted(line).unwrap();
        assert_eq!(hit.unit, "prom/1");
        assert_eq!(hit.event, expected);
        assert_eq!(hit.n, Some(14));
        assert_eq!(hit.tags, vec![EventTag::Custom]);
    }

    #[test]
    fn operator_event_gated() {
        let line = "unit-myapp-0: 12:04:18 DEBUG unit.myapp/0.juju-log Charm called itself via hooks/config-changed.";
        assert!(fine().match_emitted(line).is_none());

        let mut c = Classifier::new(
            ClassifierOptions::default()
                .with_verbosity(Verbosity::FineGrained)
                .with_operator_events(true),
        )
        .unwrap();
        let hit = c.match_emitted(line).unwrap();
        assert_eq!(hit.event, "config_changed");
        assert_eq!(hit.tags, vec![EventTag::Operator]);
    }

    #[test_case("selective"; "selective lobotomy")]
    #[test_case("full"; "full lobotomy")]
    fn lobotomy_notice(kind: &str) {
        let line = format!(
            "unit-myapp-0: 12:04:18 DEBUG unit.myapp/0.juju-log {kind} lobotomy ACTIVE: event hooks/update-status ignored."
        );
        // recognized in both modes
        for c in [&mut coarse(), &mut fine()] {
            let hit = c.match_emitted(&line).unwrap();
            assert_eq!(hit.event, "update_status");
            assert_eq!(hit.tags, vec![EventTag::Jhack, EventTag::Lobotomy]);
        }
    }

    // =========================================================================
    // Deferral lines
    // =========================================================================

    #[test]
    fn deferral_carries_notice_number() {
        let mut c = fine();
        let hit = c
            .match_deferred(
                "unit-traefik-0: 12:04:18 DEBUG unit.traefik/0.juju-log Deferring <UpdateStatusEvent via TraefikIngressCharm/on/update_status[318]>.",
            )
            .unwrap();
        assert_eq!(hit.kind, LineKind::Deferred);
        assert_eq!(hit.unit, "traefik/0");
        assert_eq!(hit.event, "update_status");
        assert_eq!(hit.n, Some(318));
    }

    #[test]
    fn reemit_old_and_new_wordings() {
        let mut c = fine();
        for line in [
            "unit-myapp-0: 12:17:50 DEBUG unit.myapp/0.juju-log Re-emitting <EVT via Charm/on/update_status[0]>.",
            "unit-myapp-0: 12:17:50 DEBUG unit.myapp/0.juju-log Re-emitting deferred event <EVT via Charm/on/update_status[0]>.",
        ] {
            let hit = c.match_reemitted(line).unwrap();
            assert_eq!(hit.kind, LineKind::Reemitted);
            assert_eq!(hit.event, "update_status");
            assert_eq!(hit.n, Some(0));
        }
    }

    #[test]
    fn defer_and_reemit_unavailable_on_coarse_streams() {
        let mut c = coarse();
        assert!(c
            .match_deferred(
                "unit-myapp-0: 13:23:30 DEBUG unit.myapp/0.juju-log Deferring <EVT via Charm/on/update_status[0]>.",
            )
            .is_none());
        assert!(c
            .match_reemitted(
                "unit-myapp-0: 12:17:50 DEBUG unit.myapp/0.juju-log Re-emitting <EVT via Charm/on/update_status[0]>.",
            )
            .is_none());
    }

    // =========================================================================
    // Modifier lines
    // =========================================================================

    #[test]
    fn hook_failure_carries_exit_code() {
        let mut c = coarse();
        let hit = c
            .match_modifiers(
                "unit-parca-1: 12:31:01 ERROR juju.worker.uniter.operation hook \"update-status\" (via hook dispatching script: dispatch) failed: exit status 444",
            )
            .unwrap();
        assert_eq!(hit.kind, LineKind::HookFailed);
        assert_eq!(hit.unit, "parca/1");
        assert_eq!(hit.event, "update_status");
        assert_eq!(hit.exit_code, Some(444));
        assert_eq!(hit.tags, vec![EventTag::Failed]);
    }

    #[test]
    fn fired_line() {
        let mut c = fine();
        let hit = c
            .match_modifiers(
                "unit-myapp-0: 13:23:30 DEBUG unit.myapp/0.juju-log The previous update-status was fired by jhack.",
            )
            .unwrap();
        assert_eq!(hit.kind, LineKind::Fired);
        assert_eq!(hit.event, "update_status");
        assert_eq!(hit.tags, vec![EventTag::Jhack, EventTag::Fire]);
    }

    #[test]
    fn replayed_line() {
        let mut c = fine();
        let hit = c
            .match_modifiers(
                "unit-myapp-0: 12:17:50 DEBUG unit.myapp/0.juju-log update_status (12:04:18) was replayed by jhack.",
            )
            .unwrap();
        assert_eq!(hit.kind, LineKind::Replayed);
        assert_eq!(hit.event, "update_status");
        assert_eq!(hit.replayed_from.as_deref(), Some("12:04:18"));
        assert_eq!(hit.tags, vec![EventTag::Jhack, EventTag::Replay]);
    }

    #[test]
    fn fire_and_replay_unavailable_on_coarse_streams() {
        let mut c = coarse();
        assert!(c
            .match_modifiers(
                "unit-myapp-0: 13:23:30 DEBUG unit.myapp/0.juju-log The previous update-status was fired by jhack.",
            )
            .is_none());
    }

    #[test]
    fn trace_note_gated() {
        let relation_line = "prom-1: 12:56:44 DEBUG unit.prom/1.juju-log ingress:1: Starting root trace with id='12312321412412312321'.";
        let plain_line = "prom-1: 12:56:44 DEBUG unit.prom/1.juju-log Starting root trace with id='12312321412412312321'.";

        assert!(fine().match_modifiers(relation_line).is_none());

        let mut c = Classifier::new(
            ClassifierOptions::default()
                .with_verbosity(Verbosity::FineGrained)
                .with_trace_notes(true),
        )
        .unwrap();
        for line in [relation_line, plain_line] {
            let hit = c.match_modifiers(line).unwrap();
            assert_eq!(hit.kind, LineKind::TraceNote);
            assert_eq!(hit.event, "");
            assert_eq!(hit.trace_id.as_deref(), Some("12312321412412312321"));
        }
    }

    // =========================================================================
    // Verbosity upgrade
    // =========================================================================

    #[test]
    fn upgrades_on_first_fine_line() {
        let mut c = coarse();
        assert!(c.verbosity().is_coarse());

        // INFO emissions match on coarse streams too, without upgrading
        c.match_emitted("unit-myapp-0: 12:04:18 INFO unit.myapp/0.juju-log Emitting Juju event start.")
            .unwrap();
        assert!(c.verbosity().is_coarse());

        // the first DEBUG line proves the stream is fine-grained
        c.match_emitted("unit-myapp-0: 12:04:18 DEBUG unit.myapp/0.juju-log Emitting Juju event start.")
            .unwrap();
        assert_eq!(c.verbosity(), Verbosity::FineGrained);

        // and deferrals become visible
        assert!(c
            .match_deferred(
                "unit-myapp-0: 13:23:30 DEBUG unit.myapp/0.juju-log Deferring <EVT via Charm/on/start[0]>.",
            )
            .is_some());
    }

    #[test]
    fn unrelated_lines_do_not_match() {
        let mut c = fine();
        for line in [
            "",
            "machine-0: 12:04:18 DEBUG juju.worker.machiner machine addresses updated",
            "unit-myapp-0: 12:04:18 DEBUG unit.myapp/0.juju-log some charm chatter",
            "unit-myapp-0: 12:04:18 DEBUG juju.worker.uniter.operation committing operation",
        ] {
            assert!(c.match_emitted(line).is_none(), "matched: {line}");
            assert!(c.match_modifiers(line).is_none(), "matched: {line}");
        }
    }
}
