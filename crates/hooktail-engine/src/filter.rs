//! User-supplied event name filtering.

use tracing::warn;

use crate::error::{EngineError, Result};

/// An event name filter.
///
/// The pattern is matched against the start of the event name, like the
/// usual scripting-language `match` semantics, so `update` matches
/// `update_status` while `status` does not. Lookarounds work, which makes
/// exclusion filters like `(?!update_status)` possible.
#[derive(Debug)]
pub struct EventFilter {
    pattern: fancy_regex::Regex,
    source: String,
}

impl EventFilter {
    /// Compiles a filter pattern.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidFilter`] if the pattern does not
    /// compile.
    pub fn new(pattern: &str) -> Result<Self> {
        let anchored =
            fancy_regex::Regex::new(&format!("^(?:{pattern})")).map_err(|source| {
                EngineError::InvalidFilter {
                    pattern: pattern.to_string(),
                    source,
                }
            })?;
        Ok(Self {
            pattern: anchored,
            source: pattern.to_string(),
        })
    }

    /// Returns true if the event name passes the filter.
    ///
    /// Lookaround evaluation can fail at runtime on pathological inputs; in
    /// that case the event is kept rather than silently dropped.
    #[must_use]
    pub fn matches(&self, event: &str) -> bool {
        match self.pattern.is_match(event) {
            Ok(hit) => hit,
            Err(error) => {
                warn!(%error, filter = %self.source, "event filter failed to run, keeping event");
                true
            }
        }
    }

    /// The pattern as originally given.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }
}
