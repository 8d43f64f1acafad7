//! Poll budgets.
//!
//! A [`PollBudget`] bounds one observation phase: how long the observer may
//! keep polling and how often it reads the surface while doing so.

use std::time::Duration;

use crate::domain::errors::BudgetError;

/// Immutable time budget for one polling phase.
///
/// Both durations are strictly positive and the interval is strictly smaller
/// than the timeout. Budgets seen in practice sit between 1:50 and 1:250.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollBudget {
    timeout: Duration,
    poll_interval: Duration,
}

impl PollBudget {
    /// Create a validated budget.
    pub fn new(timeout: Duration, poll_interval: Duration) -> Result<Self, BudgetError> {
        if timeout.is_zero() {
            return Err(BudgetError::ZeroTimeout);
        }
        if poll_interval.is_zero() {
            return Err(BudgetError::ZeroInterval);
        }
        if poll_interval >= timeout {
            return Err(BudgetError::IntervalNotBelowTimeout {
                interval_ms: duration_ms(poll_interval),
                timeout_ms: duration_ms(timeout),
            });
        }

        Ok(Self {
            timeout,
            poll_interval,
        })
    }

    /// Create a budget from millisecond values.
    pub fn from_millis(timeout_ms: u64, poll_interval_ms: u64) -> Result<Self, BudgetError> {
        Self::new(
            Duration::from_millis(timeout_ms),
            Duration::from_millis(poll_interval_ms),
        )
    }

    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Upper bound on the number of reads a phase can perform.
    pub fn max_reads(&self) -> u64 {
        duration_ms(self.timeout).div_ceil(duration_ms(self.poll_interval).max(1))
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
