//! Translator session (page object).
//!
//! Composes the correlation gate, the convergence observer and the nudger
//! over a [`TranslatorPage`]. Every operation runs strictly in sequence:
//! write, debounce wait, exchange wait, poll, optional nudge, poll.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, instrument};

use super::correlation_gate::CorrelationGate;
use super::observer::ConvergenceObserver;
use crate::domain::errors::SessionError;
use crate::domain::models::{
    Config, ExchangeMatcher, GateReport, PollBudget, TimingConfig, TypingLanguage, WatchPredicate,
};
use crate::domain::ports::TranslatorPage;

/// Poll budgets for each kind of wait a session performs
#[derive(Debug, Clone, Copy)]
pub struct SessionBudgets {
    /// After an edit that should produce output
    pub produce: PollBudget,
    /// After a blank edit
    pub change: PollBudget,
    /// After an explicit clear
    pub clear: PollBudget,
    /// While typing character by character
    pub realtime: PollBudget,
}

impl SessionBudgets {
    pub fn from_timing(timing: &TimingConfig) -> Result<Self, SessionError> {
        Ok(Self {
            produce: timing.produce_budget()?,
            change: timing.change_budget()?,
            clear: timing.clear_budget()?,
            realtime: timing.realtime_budget()?,
        })
    }
}

/// Session parts resolved from configuration, before any page is opened
pub struct SessionSettings {
    gate: CorrelationGate,
    observer: ConvergenceObserver,
    budgets: SessionBudgets,
    keystroke_delay: Duration,
}

impl SessionSettings {
    pub fn from_config(config: &Config) -> Result<Self, SessionError> {
        let timing = &config.timing;
        let matcher =
            ExchangeMatcher::new(&config.exchange.url_pattern, config.exchange.success_status)?;

        Ok(Self {
            gate: CorrelationGate::from_timing(matcher, timing),
            observer: ConvergenceObserver::from_timing(timing)?,
            budgets: SessionBudgets::from_timing(timing)?,
            keystroke_delay: timing.keystroke_delay(),
        })
    }
}

/// Drives one translator page for the duration of a run
pub struct TranslatorSession {
    page: Arc<dyn TranslatorPage>,
    gate: CorrelationGate,
    observer: ConvergenceObserver,
    budgets: SessionBudgets,
    keystroke_delay: Duration,
}

impl TranslatorSession {
    pub fn new(
        page: Arc<dyn TranslatorPage>,
        gate: CorrelationGate,
        observer: ConvergenceObserver,
        budgets: SessionBudgets,
        keystroke_delay: Duration,
    ) -> Self {
        Self {
            page,
            gate,
            observer,
            budgets,
            keystroke_delay,
        }
    }

    /// Build a session with the budgets and exchange matcher from `config`
    pub fn from_config(page: Arc<dyn TranslatorPage>, config: &Config) -> Result<Self, SessionError> {
        Ok(Self::with_settings(page, SessionSettings::from_config(config)?))
    }

    pub fn with_settings(page: Arc<dyn TranslatorPage>, settings: SessionSettings) -> Self {
        Self::new(
            page,
            settings.gate,
            settings.observer,
            settings.budgets,
            settings.keystroke_delay,
        )
    }

    pub fn page(&self) -> &dyn TranslatorPage {
        self.page.as_ref()
    }

    pub const fn observer(&self) -> &ConvergenceObserver {
        &self.observer
    }

    pub const fn budgets(&self) -> &SessionBudgets {
        &self.budgets
    }

    /// Load the page and wait for the input to be ready
    pub async fn open(&self) -> Result<(), SessionError> {
        self.page.open().await?;
        Ok(())
    }

    /// Make sure the page interprets keystrokes as `language`
    ///
    /// Pages without a visible language select are left alone.
    pub async fn ensure_typing_language(&self, language: TypingLanguage) -> Result<(), SessionError> {
        if !self.page.language_select_visibility().await.is_visible() {
            return Ok(());
        }

        let current = self.page.typing_language().await.unwrap_or(None);
        if current == Some(language) {
            return Ok(());
        }

        debug!(from = ?current, to = language.as_str(), "switching typing language");
        self.page.select_typing_language(language).await?;
        Ok(())
    }

    /// Enter `text` and wait until the output reflects it
    #[instrument(skip_all, fields(len = text.chars().count()))]
    pub async fn enter_text(&self, text: &str) -> Result<GateReport, SessionError> {
        self.ensure_typing_language(TypingLanguage::English).await?;

        let previous = self.output_text().await;

        let report = self
            .gate
            .apply_change_and_await_backend(self.page.input(), self.page.exchanges(), text)
            .await?;
        debug!(gate = report.as_str(), "edit applied");

        if !text.trim().is_empty() {
            self.observer
                .await_non_empty_change(
                    self.page.output(),
                    self.page.input(),
                    &previous,
                    self.budgets.produce,
                )
                .await?;
        } else if !previous.trim().is_empty() {
            self.observer
                .await_change_or_clear(self.page.output(), Some(&previous), self.budgets.change)
                .await?;
        }

        Ok(report)
    }

    /// Current output text; an unresolved or failing read is empty
    pub async fn output_text(&self) -> String {
        match self.page.output().read().await {
            Ok(outcome) => outcome.into_text(),
            Err(err) => {
                debug!(error = %err, "output read failed, treating as empty");
                String::new()
            }
        }
    }

    /// Current input value
    pub async fn input_value(&self) -> Result<String, SessionError> {
        Ok(self.page.input().read().await?.into_text())
    }

    /// Clear the input, via the clear button when it is visible, and wait for
    /// the output to empty
    #[instrument(skip_all)]
    pub async fn clear_input(&self) -> Result<(), SessionError> {
        if self.page.clear_button_visibility().await.is_visible() {
            self.page.click_clear().await?;
        } else {
            self.page.input().write("").await?;
        }

        self.observer
            .await_change_or_clear(self.page.output(), None, self.budgets.clear)
            .await?;
        info!("input cleared");
        Ok(())
    }

    /// Type `text` one character at a time, pausing after each keystroke
    pub async fn type_incrementally(&self, text: &str) -> Result<(), SessionError> {
        let input = self.page.input();
        input.focus().await?;

        let mut buf = [0u8; 4];
        for ch in text.chars() {
            input.type_text(ch.encode_utf8(&mut buf)).await?;
            sleep(self.keystroke_delay).await;
        }
        Ok(())
    }

    /// Wait for any non-empty output, as while typing in real time
    pub async fn await_realtime_output(&self) -> Result<String, SessionError> {
        Ok(self
            .observer
            .await_condition(
                self.page.output(),
                WatchPredicate::NonEmptyAndChanged,
                "",
                self.budgets.realtime,
            )
            .await?)
    }

    /// Release the page
    pub async fn close(&self) -> Result<(), SessionError> {
        self.page.close().await?;
        Ok(())
    }
}
