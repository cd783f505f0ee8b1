//! Unit tracking scope.

/// Which units the engine follows.
///
/// Targets may name a unit (`myapp/0`) or a whole application (`myapp`).
/// With no targets at all, everything is tracked. When `add_new_units` is
/// set, a unit target also pulls in its siblings as they appear, so scaling
/// an application up does not silently hide the new units.
#[derive(Debug, Clone, Default)]
pub struct TargetSet {
    targets: Vec<String>,
    add_new_units: bool,
}

fn app_of(name: &str) -> &str {
    name.split('/').next().unwrap_or(name)
}

impl TargetSet {
    /// Creates a target set.
    #[must_use]
    pub fn new(targets: Vec<String>, add_new_units: bool) -> Self {
        Self {
            targets,
            add_new_units,
        }
    }

    /// Returns true if no targets were given (track everything).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// The distinct applications named by the targets.
    #[must_use]
    pub fn apps(&self) -> Vec<&str> {
        let mut apps: Vec<&str> = self.targets.iter().map(|t| app_of(t)).collect();
        apps.sort_unstable();
        apps.dedup();
        apps
    }

    /// Returns true if events from this unit should be kept.
    #[must_use]
    pub fn tracks(&self, unit: &str) -> bool {
        if self.targets.is_empty() {
            return true;
        }
        let unit_app = app_of(unit);
        for target in &self.targets {
            if self.add_new_units && app_of(target) == unit_app {
                return true;
            }
            if target == unit {
                return true;
            }
            if !target.contains('/') && target == unit_app {
                return true;
            }
        }
        false
    }
}
