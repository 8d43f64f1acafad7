//! Correlation gate.
//!
//! Lines up an input edit with the backend exchange it triggers. The gate
//! does not decide convergence of the rendered output; it only keeps the
//! observer from starting to poll before the backend has even replied.
//!
//! Two independent scoped waits, in order:
//! 1. the debounce window, always;
//! 2. the armed exchange watch, under its own ceiling.

use std::time::Duration;

use tokio::time::{sleep, timeout};
use tracing::{debug, instrument, warn};

use crate::domain::errors::SurfaceResult;
use crate::domain::models::{ExchangeMatcher, GateReport, TimingConfig};
use crate::domain::ports::{ExchangeWatcher, InputSurface};

/// Applies edits and waits for the debounce window and backend exchange
#[derive(Debug, Clone)]
pub struct CorrelationGate {
    matcher: ExchangeMatcher,
    debounce_window: Duration,
    ceiling: Duration,
}

impl CorrelationGate {
    pub fn new(matcher: ExchangeMatcher, debounce_window: Duration, ceiling: Duration) -> Self {
        Self {
            matcher,
            debounce_window,
            ceiling,
        }
    }

    pub fn from_timing(matcher: ExchangeMatcher, timing: &TimingConfig) -> Self {
        Self::new(matcher, timing.debounce_window(), timing.gate_ceiling())
    }

    pub const fn matcher(&self) -> &ExchangeMatcher {
        &self.matcher
    }

    /// Write `new_value` and wait for the backend to have answered.
    ///
    /// The watch is armed before the write, and only for non-blank values:
    /// blank input makes no backend call. Only a failed write is an error.
    #[instrument(skip_all, fields(surface = input.label(), len = new_value.chars().count()))]
    pub async fn apply_change_and_await_backend<I, W>(
        &self,
        input: &I,
        watcher: &W,
        new_value: &str,
    ) -> SurfaceResult<GateReport>
    where
        I: InputSurface + ?Sized,
        W: ExchangeWatcher + ?Sized,
    {
        let watch = if new_value.trim().is_empty() {
            None
        } else {
            match watcher.arm(&self.matcher).await {
                Ok(watch) => Some(Ok(watch)),
                Err(err) => {
                    warn!(error = %err, "could not arm exchange watch");
                    Some(Err(()))
                }
            }
        };

        input.write(new_value).await?;

        sleep(self.debounce_window).await;

        let report = match watch {
            None => GateReport::NotArmed,
            Some(Err(())) => GateReport::WatchUnavailable,
            Some(Ok(watch)) => match timeout(self.ceiling, watch).await {
                Ok(exchange) => {
                    debug!(url = %exchange.url, status = ?exchange.status, "backend exchange observed");
                    GateReport::Observed(exchange)
                }
                Err(_) => {
                    warn!(
                        ceiling_ms = self.ceiling.as_millis(),
                        pattern = self.matcher.url_pattern(),
                        "backend exchange not observed before ceiling"
                    );
                    GateReport::CeilingElapsed
                }
            },
        };

        Ok(report)
    }
}
