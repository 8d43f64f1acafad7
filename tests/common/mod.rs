//! Common test utilities for integration tests
//!
//! Scripted page doubles: an input that records every interaction, an
//! output whose value tests set directly, and an exchange watcher whose
//! behaviour is fixed up front.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tidemark::domain::errors::{SurfaceError, SurfaceResult};
use tidemark::domain::models::{
    Config, Exchange, ExchangeMatcher, ReadOutcome, TypingLanguage, Visibility,
};
use tidemark::domain::ports::{
    ExchangeWatch, ExchangeWatcher, InputSurface, Key, ObservableSurface, TranslatorPage,
};

/// Setup test logging
///
/// Call this at the beginning of tests that need logging.
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Output surface whose value the test controls
#[derive(Clone)]
pub struct FakeOutput {
    value: Arc<Mutex<SurfaceResult<ReadOutcome>>>,
    reads: Arc<Mutex<usize>>,
}

impl FakeOutput {
    pub fn new(initial: &str) -> Self {
        Self {
            value: Arc::new(Mutex::new(Ok(ReadOutcome::Value(initial.to_string())))),
            reads: Arc::new(Mutex::new(0)),
        }
    }

    pub fn set(&self, text: &str) {
        *self.value.lock().unwrap() = Ok(ReadOutcome::Value(text.to_string()));
    }

    pub fn detach(&self) {
        *self.value.lock().unwrap() = Ok(ReadOutcome::Unresolved);
    }

    pub fn fail(&self, err: SurfaceError) {
        *self.value.lock().unwrap() = Err(err);
    }

    pub fn reads(&self) -> usize {
        *self.reads.lock().unwrap()
    }

    /// Render `text` after `delay` of (paused) time
    pub fn render_after(&self, delay: Duration, text: &str) {
        let output = self.clone();
        let text = text.to_string();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            output.set(&text);
        });
    }
}

#[async_trait]
impl ObservableSurface for FakeOutput {
    fn label(&self) -> &str {
        "output"
    }

    async fn read(&self) -> SurfaceResult<ReadOutcome> {
        *self.reads.lock().unwrap() += 1;
        self.value.lock().unwrap().clone()
    }

    async fn count(&self) -> SurfaceResult<usize> {
        Ok(match &*self.value.lock().unwrap() {
            Ok(ReadOutcome::Value(_)) => 1,
            _ => 0,
        })
    }
}

/// One interaction with [`FakeInput`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Write(String),
    Focus,
    Press(Key),
    Type(String),
}

/// Input surface that records interactions
///
/// With `render_on_backspace`, pressing Backspace renders text into the
/// linked output the way a recompute would.
#[derive(Clone)]
pub struct FakeInput {
    value: Arc<Mutex<String>>,
    events: Arc<Mutex<Vec<InputEvent>>>,
    fail_edits: Arc<Mutex<bool>>,
    render_on_backspace: Arc<Mutex<Option<(FakeOutput, String)>>>,
}

impl FakeInput {
    pub fn new(initial: &str) -> Self {
        Self {
            value: Arc::new(Mutex::new(initial.to_string())),
            events: Arc::new(Mutex::new(Vec::new())),
            fail_edits: Arc::new(Mutex::new(false)),
            render_on_backspace: Arc::new(Mutex::new(None)),
        }
    }

    pub fn events(&self) -> Vec<InputEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn value(&self) -> String {
        self.value.lock().unwrap().clone()
    }

    pub fn backspaces(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| **event == InputEvent::Press(Key::Backspace))
            .count()
    }

    pub fn fail_edits(&self) {
        *self.fail_edits.lock().unwrap() = true;
    }

    pub fn render_on_backspace(&self, output: &FakeOutput, text: &str) {
        *self.render_on_backspace.lock().unwrap() = Some((output.clone(), text.to_string()));
    }

    fn record(&self, event: InputEvent) -> SurfaceResult<()> {
        if *self.fail_edits.lock().unwrap() {
            return Err(SurfaceError::NotInteractable("input".to_string()));
        }
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

#[async_trait]
impl ObservableSurface for FakeInput {
    fn label(&self) -> &str {
        "input"
    }

    async fn read(&self) -> SurfaceResult<ReadOutcome> {
        Ok(ReadOutcome::Value(self.value()))
    }

    async fn count(&self) -> SurfaceResult<usize> {
        Ok(1)
    }
}

#[async_trait]
impl InputSurface for FakeInput {
    async fn write(&self, text: &str) -> SurfaceResult<()> {
        self.record(InputEvent::Write(text.to_string()))?;
        *self.value.lock().unwrap() = text.to_string();
        Ok(())
    }

    async fn focus(&self) -> SurfaceResult<()> {
        self.record(InputEvent::Focus)
    }

    async fn press(&self, key: Key) -> SurfaceResult<()> {
        self.record(InputEvent::Press(key))?;
        if key == Key::Backspace {
            self.value.lock().unwrap().pop();
            if let Some((output, text)) = &*self.render_on_backspace.lock().unwrap() {
                output.set(text);
            }
        }
        Ok(())
    }

    async fn type_text(&self, text: &str) -> SurfaceResult<()> {
        self.record(InputEvent::Type(text.to_string()))?;
        self.value.lock().unwrap().push_str(text);
        Ok(())
    }
}

/// How [`FakeWatcher`] answers `arm`
#[derive(Debug, Clone)]
pub enum WatchScript {
    /// Resolve with `exchange` after `delay`
    Resolve { delay: Duration, exchange: Exchange },
    /// Never resolve
    Silent,
    /// Fail to arm
    Unavailable,
}

#[derive(Clone)]
pub struct FakeWatcher {
    script: WatchScript,
    arms: Arc<Mutex<usize>>,
}

impl FakeWatcher {
    pub fn new(script: WatchScript) -> Self {
        Self {
            script,
            arms: Arc::new(Mutex::new(0)),
        }
    }

    pub fn resolving_after(delay: Duration) -> Self {
        Self::new(WatchScript::Resolve {
            delay,
            exchange: translate_exchange(),
        })
    }

    pub fn arms(&self) -> usize {
        *self.arms.lock().unwrap()
    }
}

#[async_trait]
impl ExchangeWatcher for FakeWatcher {
    async fn arm(&self, _matcher: &ExchangeMatcher) -> SurfaceResult<ExchangeWatch> {
        *self.arms.lock().unwrap() += 1;
        match self.script.clone() {
            WatchScript::Resolve { delay, exchange } => {
                // The exchange happens on its own clock, polled or not.
                let deadline = tokio::time::Instant::now() + delay;
                Ok(Box::pin(async move {
                    tokio::time::sleep_until(deadline).await;
                    exchange
                }))
            }
            WatchScript::Silent => Ok(Box::pin(futures::future::pending())),
            WatchScript::Unavailable => Err(SurfaceError::Protocol(
                "performance API unavailable".to_string(),
            )),
        }
    }
}

/// Page assembled from the fakes above
pub struct FakePage {
    pub input: FakeInput,
    pub output: FakeOutput,
    pub watcher: FakeWatcher,
}

impl FakePage {
    pub fn new(watcher: FakeWatcher) -> Self {
        Self {
            input: FakeInput::new(""),
            output: FakeOutput::new(""),
            watcher,
        }
    }
}

#[async_trait]
impl TranslatorPage for FakePage {
    fn driver_name(&self) -> &'static str {
        "fake"
    }

    fn input(&self) -> &dyn InputSurface {
        &self.input
    }

    fn output(&self) -> &dyn ObservableSurface {
        &self.output
    }

    fn exchanges(&self) -> &dyn ExchangeWatcher {
        &self.watcher
    }

    async fn open(&self) -> SurfaceResult<()> {
        Ok(())
    }

    async fn clear_button_visibility(&self) -> Visibility {
        Visibility::Hidden
    }

    async fn click_clear(&self) -> SurfaceResult<()> {
        Err(SurfaceError::NotInteractable("clear button".to_string()))
    }

    async fn language_select_visibility(&self) -> Visibility {
        Visibility::Hidden
    }

    async fn typing_language(&self) -> SurfaceResult<Option<TypingLanguage>> {
        Ok(None)
    }

    async fn select_typing_language(&self, _language: TypingLanguage) -> SurfaceResult<()> {
        Ok(())
    }
}

/// The exchange the real translator makes
pub fn translate_exchange() -> Exchange {
    Exchange {
        url: "https://abc123.execute-api.us-east-1.amazonaws.com/transliterate".to_string(),
        status: Some(200),
    }
}

pub fn matcher() -> ExchangeMatcher {
    let config = Config::default();
    ExchangeMatcher::new(&config.exchange.url_pattern, config.exchange.success_status).unwrap()
}
