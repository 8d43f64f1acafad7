//! Observation domain model.
//!
//! Surface reads, visibility and the phase machine that drives one
//! convergence wait. The machine has exactly one transition table
//! ([`ObservationPhase::on`]); the observer service only feeds it events and
//! performs the action implied by the phase it lands in.

use serde::{Deserialize, Serialize};

use crate::domain::errors::InvalidPhaseTransition;

/// Result of a single surface read that did not hard-fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadOutcome {
    /// The surface resolved and produced this text.
    Value(String),
    /// The surface could not be resolved right now (re-render, detached node).
    Unresolved,
}

impl ReadOutcome {
    /// Text seen by predicates; an unresolved surface reads as empty.
    pub fn text(&self) -> &str {
        match self {
            Self::Value(text) => text,
            Self::Unresolved => "",
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Value(text) => text,
            Self::Unresolved => String::new(),
        }
    }

    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Value(_))
    }
}

/// Tri-state visibility answer from the element layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Visible,
    Hidden,
    Unresolved,
}

impl Visibility {
    /// Only a positive answer counts as visible.
    pub const fn is_visible(&self) -> bool {
        matches!(self, Self::Visible)
    }
}

/// Value of the page's typing-language select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypingLanguage {
    English,
    Sinhala,
}

impl TypingLanguage {
    /// Option value used by the select element.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::English => "english",
            Self::Sinhala => "sinhala",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "english" => Some(Self::English),
            "sinhala" => Some(Self::Sinhala),
            _ => None,
        }
    }
}

/// What happened to a best-effort nudge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NudgeOutcome {
    /// Input held no meaningful content; nothing to recompute.
    Skipped,
    /// Both edits and the settle pause completed.
    Applied,
    /// An edit could not be performed; the failure was swallowed.
    Failed,
}

/// Whether a wait may spend one nudge-and-retry cycle before failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryPolicy {
    /// Time out immediately when the first phase is exhausted.
    None,
    /// Nudge the input once and poll again with the retry budget.
    NudgeOnce,
}

/// Phase of one convergence wait.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationPhase {
    /// First polling phase under the caller's budget
    #[default]
    Polling,
    /// Second and last polling phase, entered after one nudge
    NudgedPolling,
    /// Predicate held
    Satisfied,
    /// Budget exhausted with no recovery left
    TimedOut,
}

/// Event fed into the phase machine at the end of a polling phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseEvent {
    PredicateHeld,
    BudgetExhausted,
}

impl ObservationPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Polling => "polling",
            Self::NudgedPolling => "nudged_polling",
            Self::Satisfied => "satisfied",
            Self::TimedOut => "timed_out",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Satisfied | Self::TimedOut)
    }

    /// Whether entering this phase requires a nudge first.
    pub fn requires_nudge(&self) -> bool {
        matches!(self, Self::NudgedPolling)
    }

    /// The transition table.
    ///
    /// | from          | event           | policy    | to            |
    /// |---------------|-----------------|-----------|---------------|
    /// | Polling       | PredicateHeld   | any       | Satisfied     |
    /// | Polling       | BudgetExhausted | NudgeOnce | NudgedPolling |
    /// | Polling       | BudgetExhausted | None      | TimedOut      |
    /// | NudgedPolling | PredicateHeld   | any       | Satisfied     |
    /// | NudgedPolling | BudgetExhausted | any       | TimedOut      |
    ///
    /// Terminal phases accept no events.
    pub fn on(
        self,
        event: PhaseEvent,
        policy: RecoveryPolicy,
    ) -> Result<Self, InvalidPhaseTransition> {
        match (self, event, policy) {
            (Self::Polling | Self::NudgedPolling, PhaseEvent::PredicateHeld, _) => {
                Ok(Self::Satisfied)
            }
            (Self::Polling, PhaseEvent::BudgetExhausted, RecoveryPolicy::NudgeOnce) => {
                Ok(Self::NudgedPolling)
            }
            (Self::Polling, PhaseEvent::BudgetExhausted, RecoveryPolicy::None)
            | (Self::NudgedPolling, PhaseEvent::BudgetExhausted, _) => Ok(Self::TimedOut),
            (Self::Satisfied | Self::TimedOut, _, _) => Err(InvalidPhaseTransition {
                from: self,
                event,
            }),
        }
    }
}

impl std::fmt::Display for ObservationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVENTS: [PhaseEvent; 2] = [PhaseEvent::PredicateHeld, PhaseEvent::BudgetExhausted];
    const POLICIES: [RecoveryPolicy; 2] = [RecoveryPolicy::None, RecoveryPolicy::NudgeOnce];

    #[test]
    fn test_waits_start_polling() {
        assert_eq!(ObservationPhase::default(), ObservationPhase::Polling);
        assert!(!ObservationPhase::default().is_terminal());
    }

    #[test]
    fn test_transition_table() {
        use ObservationPhase::*;
        use PhaseEvent::*;

        assert_eq!(Polling.on(PredicateHeld, RecoveryPolicy::None), Ok(Satisfied));
        assert_eq!(
            Polling.on(BudgetExhausted, RecoveryPolicy::NudgeOnce),
            Ok(NudgedPolling)
        );
        assert_eq!(Polling.on(BudgetExhausted, RecoveryPolicy::None), Ok(TimedOut));
        assert_eq!(
            NudgedPolling.on(PredicateHeld, RecoveryPolicy::NudgeOnce),
            Ok(Satisfied)
        );
        assert_eq!(
            NudgedPolling.on(BudgetExhausted, RecoveryPolicy::NudgeOnce),
            Ok(TimedOut)
        );
    }

    #[test]
    fn test_terminal_phases_reject_events() {
        for phase in [ObservationPhase::Satisfied, ObservationPhase::TimedOut] {
            assert!(phase.is_terminal());
            for event in EVENTS {
                for policy in POLICIES {
                    assert!(phase.on(event, policy).is_err());
                }
            }
        }
    }

    #[test]
    fn test_at_most_one_nudged_phase() {
        // Walk every path of exhausted budgets; NudgedPolling is entered at most once.
        for policy in POLICIES {
            let mut phase = ObservationPhase::Polling;
            let mut nudges = 0;
            while !phase.is_terminal() {
                phase = phase.on(PhaseEvent::BudgetExhausted, policy).unwrap();
                if phase.requires_nudge() {
                    nudges += 1;
                }
            }
            assert_eq!(phase, ObservationPhase::TimedOut);
            let expected = usize::from(policy == RecoveryPolicy::NudgeOnce);
            assert_eq!(nudges, expected);
        }
    }

    #[test]
    fn test_unresolved_reads_as_empty() {
        assert_eq!(ReadOutcome::Unresolved.text(), "");
        assert!(!ReadOutcome::Unresolved.is_resolved());
        assert_eq!(ReadOutcome::Value("x".into()).into_text(), "x");
    }

    #[test]
    fn test_visibility_only_visible_counts() {
        assert!(Visibility::Visible.is_visible());
        assert!(!Visibility::Hidden.is_visible());
        assert!(!Visibility::Unresolved.is_visible());
    }
}
