//! Convergence observation.
//!
//! The observer polls a surface until a [`WatchPredicate`] holds. A wait is
//! driven through [`ObservationPhase`]: each polling phase ends with a
//! [`PhaseEvent`], the phase machine decides where to go, and the observer
//! performs what the new phase implies (return, nudge and poll again, or
//! fail with diagnostics).

use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{debug, info, instrument, trace, warn};

use super::nudger::RecomputeNudger;
use crate::domain::errors::{BudgetError, ConvergenceError, TimeoutDiagnostics};
use crate::domain::models::{
    ObservationPhase, PhaseEvent, PollBudget, ReadOutcome, RecoveryPolicy, TimingConfig,
    WatchPredicate,
};
use crate::domain::ports::{InputSurface, ObservableSurface};

/// How one polling phase ended.
enum PhaseResult {
    Held(String),
    Exhausted,
}

/// Polls observable surfaces until an awaited condition holds
#[derive(Debug, Clone)]
pub struct ConvergenceObserver {
    /// Budget of the single polling phase that follows a nudge
    retry_budget: PollBudget,
    nudger: RecomputeNudger,
}

impl ConvergenceObserver {
    pub const fn new(retry_budget: PollBudget, nudger: RecomputeNudger) -> Self {
        Self {
            retry_budget,
            nudger,
        }
    }

    pub fn from_timing(timing: &TimingConfig) -> Result<Self, BudgetError> {
        Ok(Self::new(
            timing.retry_budget()?,
            RecomputeNudger::from_timing(timing),
        ))
    }

    pub const fn retry_budget(&self) -> PollBudget {
        self.retry_budget
    }

    /// Poll `surface` until `predicate(previous, current)` holds.
    ///
    /// No recovery: an exhausted budget is a [`ConvergenceError::Timeout`].
    pub async fn await_condition<S>(
        &self,
        surface: &S,
        predicate: WatchPredicate,
        previous: &str,
        budget: PollBudget,
    ) -> Result<String, ConvergenceError>
    where
        S: ObservableSurface + ?Sized,
    {
        self.observe::<S, dyn InputSurface>(
            surface,
            None,
            predicate,
            previous,
            budget,
            RecoveryPolicy::None,
        )
        .await
    }

    /// Wait for new, non-empty output after a value-producing edit.
    ///
    /// When the first phase is exhausted the `input` is nudged once and the
    /// wait is retried with the retry budget. A second exhaustion is terminal.
    pub async fn await_non_empty_change<S, I>(
        &self,
        output: &S,
        input: &I,
        previous: &str,
        budget: PollBudget,
    ) -> Result<String, ConvergenceError>
    where
        S: ObservableSurface + ?Sized,
        I: InputSurface + ?Sized,
    {
        self.observe(
            output,
            Some(input),
            WatchPredicate::NonEmptyAndChanged,
            previous,
            budget,
            RecoveryPolicy::NudgeOnce,
        )
        .await
    }

    /// Wait for the output to change, or to empty when `previous` is `None`
    /// (an explicit clear). Never nudges.
    pub async fn await_change_or_clear<S>(
        &self,
        surface: &S,
        previous: Option<&str>,
        budget: PollBudget,
    ) -> Result<String, ConvergenceError>
    where
        S: ObservableSurface + ?Sized,
    {
        match previous {
            None => {
                self.await_condition(surface, WatchPredicate::Emptied, "", budget)
                    .await
            }
            Some(previous) => {
                self.await_condition(surface, WatchPredicate::Changed, previous, budget)
                    .await
            }
        }
    }

    #[instrument(
        skip_all,
        fields(surface = surface.label(), predicate = %predicate, policy = ?policy)
    )]
    async fn observe<S, I>(
        &self,
        surface: &S,
        nudge_target: Option<&I>,
        predicate: WatchPredicate,
        previous: &str,
        budget: PollBudget,
        policy: RecoveryPolicy,
    ) -> Result<String, ConvergenceError>
    where
        S: ObservableSurface + ?Sized,
        I: InputSurface + ?Sized,
    {
        let started = Instant::now();
        let mut phase = ObservationPhase::Polling;
        let mut nudged = false;

        loop {
            let phase_budget = if phase == ObservationPhase::Polling {
                budget
            } else {
                self.retry_budget
            };
            debug!(
                phase = %phase,
                timeout_ms = phase_budget.timeout().as_millis(),
                interval_ms = phase_budget.poll_interval().as_millis(),
                "polling phase started"
            );

            let (event, value) = match self
                .poll_phase(surface, predicate, previous, phase_budget)
                .await?
            {
                PhaseResult::Held(value) => (PhaseEvent::PredicateHeld, Some(value)),
                PhaseResult::Exhausted => (PhaseEvent::BudgetExhausted, None),
            };

            phase = phase.on(event, policy)?;

            match (phase, value) {
                (ObservationPhase::Satisfied, Some(value)) => {
                    info!(
                        elapsed_ms = started.elapsed().as_millis(),
                        nudged,
                        len = value.trim().chars().count(),
                        "output converged"
                    );
                    return Ok(value);
                }
                (ObservationPhase::NudgedPolling, _) => {
                    warn!(
                        elapsed_ms = started.elapsed().as_millis(),
                        "output did not converge, nudging input once"
                    );
                    if let Some(input) = nudge_target {
                        let outcome = self.nudger.nudge(input).await;
                        debug!(outcome = ?outcome, "nudge finished");
                    }
                    nudged = true;
                }
                _ => {
                    return Err(self
                        .timeout(surface, predicate, started.elapsed(), nudged)
                        .await);
                }
            }
        }
    }

    async fn poll_phase<S>(
        &self,
        surface: &S,
        predicate: WatchPredicate,
        previous: &str,
        budget: PollBudget,
    ) -> Result<PhaseResult, ConvergenceError>
    where
        S: ObservableSurface + ?Sized,
    {
        let deadline = Instant::now() + budget.timeout();

        while Instant::now() < deadline {
            match surface.read().await? {
                ReadOutcome::Value(current) => {
                    if predicate.holds(previous, &current) {
                        return Ok(PhaseResult::Held(current));
                    }
                }
                ReadOutcome::Unresolved => {
                    trace!("surface unresolved, no value yet");
                    if predicate.holds(previous, "") {
                        return Ok(PhaseResult::Held(String::new()));
                    }
                }
            }

            sleep(budget.poll_interval()).await;
        }

        Ok(PhaseResult::Exhausted)
    }

    async fn timeout<S>(
        &self,
        surface: &S,
        predicate: WatchPredicate,
        waited: Duration,
        nudged: bool,
    ) -> ConvergenceError
    where
        S: ObservableSurface + ?Sized,
    {
        let surface_count = surface.count().await.unwrap_or(0);
        let last_len = surface
            .read()
            .await
            .map(|outcome| outcome.text().trim().chars().count())
            .unwrap_or(0);

        ConvergenceError::Timeout(TimeoutDiagnostics {
            predicate,
            waited,
            nudged,
            surface_count,
            last_len,
        })
    }
}
