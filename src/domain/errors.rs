//! Domain errors for the convergence engine.

use std::time::Duration;

use thiserror::Error;

use super::models::observation::{ObservationPhase, PhaseEvent};
use super::models::predicate::WatchPredicate;
use super::models::verdict::SimilarityVerdict;

/// Invalid poll budget parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BudgetError {
    #[error("Poll timeout must be greater than zero")]
    ZeroTimeout,

    #[error("Poll interval must be greater than zero")]
    ZeroInterval,

    #[error("Poll interval ({interval_ms}ms) must be smaller than the timeout ({timeout_ms}ms)")]
    IntervalNotBelowTimeout { interval_ms: u64, timeout_ms: u64 },
}

/// An event was fed to a phase that cannot accept it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid observation transition: {event:?} in terminal phase {from}")]
pub struct InvalidPhaseTransition {
    pub from: ObservationPhase,
    pub event: PhaseEvent,
}

/// Hard failure of a page or surface operation.
///
/// Transient conditions (element momentarily detached) never surface as this
/// type on reads: adapters report them as `ReadOutcome::Unresolved`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Element not interactable: {0}")]
    NotInteractable(String),

    #[error("Page session closed")]
    SessionClosed,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Protocol error: {0}")]
    Protocol(String),
}

pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// Diagnostics captured when a wait times out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeoutDiagnostics {
    pub predicate: WatchPredicate,
    /// Total time spent polling across phases
    pub waited: Duration,
    /// Whether a nudge-and-retry cycle ran before giving up
    pub nudged: bool,
    /// How many elements the surface resolves to right now
    pub surface_count: usize,
    /// Trimmed length, in characters, of the last observed value
    pub last_len: usize,
}

/// Terminal failures of a convergence wait.
#[derive(Debug, Error)]
pub enum ConvergenceError {
    #[error(
        "Timed out waiting for output ({}). (outputLocatorCount={}, currentLength={}, waited={}ms, nudged={})",
        .0.predicate,
        .0.surface_count,
        .0.last_len,
        .0.waited.as_millis(),
        .0.nudged
    )]
    Timeout(TimeoutDiagnostics),

    #[error("Surface failed during observation: {0}")]
    Surface(#[from] SurfaceError),

    #[error(transparent)]
    Phase(#[from] InvalidPhaseTransition),
}

impl ConvergenceError {
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    pub const fn diagnostics(&self) -> Option<&TimeoutDiagnostics> {
        match self {
            Self::Timeout(diagnostics) => Some(diagnostics),
            _ => None,
        }
    }
}

/// Observed output was not acceptably similar to the expected value.
///
/// This is a verification outcome, not an engine failure.
#[derive(Debug, Clone, PartialEq, Error)]
#[error(
    "expected received to be similar (>= {}); similarity was {:.3}\nreceived: {received}\nexpected: {expected}",
    .verdict.threshold(),
    .verdict.score()
)]
pub struct VerificationMismatch {
    pub verdict: SimilarityVerdict,
    pub received: String,
    pub expected: String,
}

/// Errors from a session operation.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Convergence(#[from] ConvergenceError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error(transparent)]
    Budget(#[from] BudgetError),

    #[error("Invalid exchange URL pattern: {0}")]
    ExchangePattern(#[from] regex::Error),
}

impl SessionError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Convergence(err) if err.is_timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_carries_diagnostics() {
        let err = ConvergenceError::Timeout(TimeoutDiagnostics {
            predicate: WatchPredicate::NonEmptyAndChanged,
            waited: Duration::from_millis(35_000),
            nudged: true,
            surface_count: 1,
            last_len: 0,
        });
        let message = err.to_string();
        assert!(message.contains("outputLocatorCount=1"));
        assert!(message.contains("currentLength=0"));
        assert!(message.contains("nudged=true"));
        assert!(err.is_timeout());
    }

    #[test]
    fn test_mismatch_message_formats_score() {
        let mismatch = VerificationMismatch {
            verdict: SimilarityVerdict::new(0.912_345, 0.95),
            received: "a".to_string(),
            expected: "b".to_string(),
        };
        let message = mismatch.to_string();
        assert!(message.starts_with("expected received to be similar (>= 0.95); similarity was 0.912"));
        assert!(message.ends_with("received: a\nexpected: b"));
    }

    #[test]
    fn test_session_error_timeout_detection() {
        let err: SessionError = SurfaceError::SessionClosed.into();
        assert!(!err.is_timeout());
    }
}
