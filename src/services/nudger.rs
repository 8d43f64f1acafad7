//! Recompute nudges.
//!
//! A nudge appends a space at the end of the input and removes it again, so
//! the page's debounce timer restarts and fires against the same text. It is
//! the recovery step for results that were computed but never rendered.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, instrument};

use crate::domain::errors::SurfaceResult;
use crate::domain::models::{NudgeOutcome, TimingConfig};
use crate::domain::ports::{InputSurface, Key};

/// Performs best-effort, semantically neutral edits on an input surface
#[derive(Debug, Clone, Copy)]
pub struct RecomputeNudger {
    /// Pause between the two edits
    pause: Duration,
    /// Wait after the second edit; one debounce window
    settle: Duration,
}

impl RecomputeNudger {
    pub const fn new(pause: Duration, settle: Duration) -> Self {
        Self { pause, settle }
    }

    pub const fn from_timing(timing: &TimingConfig) -> Self {
        Self::new(timing.nudge_pause(), timing.debounce_window())
    }

    /// Nudge the input. Never fails: edit errors are swallowed and reported
    /// as [`NudgeOutcome::Failed`].
    #[instrument(skip_all, fields(surface = input.label()))]
    pub async fn nudge<I>(&self, input: &I) -> NudgeOutcome
    where
        I: InputSurface + ?Sized,
    {
        let value = match input.read().await {
            Ok(outcome) => outcome.into_text(),
            Err(err) => {
                debug!(error = %err, "could not read input before nudge");
                String::new()
            }
        };

        if value.trim().is_empty() {
            debug!("input is blank, nothing to recompute");
            return NudgeOutcome::Skipped;
        }

        match self.perturb(input).await {
            Ok(()) => {
                debug!(pause_ms = self.pause.as_millis(), "nudge applied");
                NudgeOutcome::Applied
            }
            Err(err) => {
                debug!(error = %err, "nudge failed");
                NudgeOutcome::Failed
            }
        }
    }

    async fn perturb<I>(&self, input: &I) -> SurfaceResult<()>
    where
        I: InputSurface + ?Sized,
    {
        input.focus().await?;
        input.press(Key::End).await?;
        input.type_text(" ").await?;
        sleep(self.pause).await;
        input.press(Key::Backspace).await?;

        // Let the debounce window elapse again.
        sleep(self.settle).await;
        Ok(())
    }
}
