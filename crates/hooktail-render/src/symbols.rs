//! Glyphs for event annotations and deferral marks.

use hooktail_engine::{DeferralStatus, EventRecord, EventTag};

/// Appended to events injected by `jhack fire`.
pub const FIRE: &str = "🔥";
/// ASCII stand-in for [`FIRE`].
pub const FIRE_ASCII: &str = "*";
/// Appended to events whose hook exited nonzero.
pub const FAILED: &str = "❌";
/// Appended to events skipped by an active lobotomy.
pub const LOBOTOMY: &str = "✂";
/// Appended to replayed events.
pub const REPLAY: &str = "⟳";
/// Suffixed to the leader unit's column header.
pub const LEADER_MARK: &str = "*";

/// The mark shown for each stage of the deferral lifecycle.
#[must_use]
pub const fn status_mark(status: DeferralStatus) -> &'static str {
    match status {
        DeferralStatus::Null => "",
        DeferralStatus::Deferred => "❯",
        DeferralStatus::Reemitted => "❮",
        DeferralStatus::Bounced => "●",
    }
}

/// The event name decorated with its annotation glyphs.
#[must_use]
pub fn decorate(record: &EventRecord, ascii: bool) -> String {
    let mut text = record.event.clone();
    if record.tags.contains(&EventTag::Jhack) {
        if record.tags.contains(&EventTag::Lobotomy) {
            text.push(' ');
            text.push_str(LOBOTOMY);
        }
        if record.tags.contains(&EventTag::Fire) {
            text.push(' ');
            text.push_str(if ascii { FIRE_ASCII } else { FIRE });
        }
        if record.tags.contains(&EventTag::Replay) {
            if record.tags.contains(&EventTag::Source) {
                text.push_str(" (↑)");
            } else if record.tags.contains(&EventTag::Replayed) {
                let stamp = record.replayed_from.as_deref().unwrap_or("?");
                text.push_str(&format!(" ({REPLAY}:{stamp} ↓)"));
            }
        }
    }
    if record.tags.contains(&EventTag::Failed) {
        text.push(' ');
        text.push_str(FAILED);
    }
    text
}
