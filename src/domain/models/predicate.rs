//! Watch predicates classifying whether an awaited output condition holds.

use serde::{Deserialize, Serialize};

/// Condition the observer waits for, evaluated on trimmed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchPredicate {
    /// Current value differs from the previous one.
    Changed,
    /// Current value is non-empty and differs from the previous one.
    NonEmptyAndChanged,
    /// Current value is empty.
    Emptied,
}

impl WatchPredicate {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Changed => "changed",
            Self::NonEmptyAndChanged => "non_empty_and_changed",
            Self::Emptied => "emptied",
        }
    }

    /// Evaluate the predicate. Pure: no state is carried between calls.
    pub fn holds(&self, previous: &str, current: &str) -> bool {
        let previous = previous.trim();
        let current = current.trim();

        match self {
            Self::Changed => current != previous,
            Self::NonEmptyAndChanged => !current.is_empty() && current != previous,
            Self::Emptied => current.is_empty(),
        }
    }
}

impl std::fmt::Display for WatchPredicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changed_ignores_surrounding_whitespace() {
        assert!(!WatchPredicate::Changed.holds("මම", "  මම\n"));
        assert!(WatchPredicate::Changed.holds("මම", "අපි"));
        assert!(WatchPredicate::Changed.holds("මම", ""));
    }

    #[test]
    fn test_non_empty_and_changed() {
        assert!(!WatchPredicate::NonEmptyAndChanged.holds("", ""));
        assert!(!WatchPredicate::NonEmptyAndChanged.holds("", "   "));
        assert!(!WatchPredicate::NonEmptyAndChanged.holds("හරි", "හරි "));
        assert!(WatchPredicate::NonEmptyAndChanged.holds("", "හරි"));
        assert!(WatchPredicate::NonEmptyAndChanged.holds("හරි", "හරි හරි"));
    }

    #[test]
    fn test_emptied_ignores_previous() {
        assert!(WatchPredicate::Emptied.holds("anything", ""));
        assert!(WatchPredicate::Emptied.holds("", " \n"));
        assert!(!WatchPredicate::Emptied.holds("", "x"));
    }

    #[test]
    fn test_missing_value_reads_as_empty() {
        // An unresolved surface is evaluated as "".
        assert!(WatchPredicate::Emptied.holds("මම", ""));
        assert!(WatchPredicate::Changed.holds("මම", ""));
        assert!(!WatchPredicate::Changed.holds("", ""));
        assert!(!WatchPredicate::NonEmptyAndChanged.holds("මම", ""));
    }
}
