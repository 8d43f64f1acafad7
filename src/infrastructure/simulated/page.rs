use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{broadcast, Mutex};
use tokio::time::sleep;
use tracing::{debug, trace};

use crate::domain::errors::{SurfaceError, SurfaceResult};
use crate::domain::models::{
    CaseTable, Exchange, ExchangeMatcher, ReadOutcome, SimulationConfig, TypingLanguage,
    Visibility,
};
use crate::domain::ports::{
    ExchangeWatch, ExchangeWatcher, InputSurface, Key, ObservableSurface, TranslatorPage,
};

/// URL reported for every simulated backend exchange
pub const EXCHANGE_URL: &str = "https://sim.execute-api.us-east-1.amazonaws.com/transliterate";

/// Counters of what the simulated page did, for assertions in tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationStats {
    pub opens: u64,
    pub edits: u64,
    pub exchanges: u64,
    pub applied: u64,
    pub dropped: u64,
    pub detached_reads: u64,
    pub language_switches: u64,
    pub clear_clicks: u64,
}

#[derive(Debug)]
struct PageState {
    opened: bool,
    input: String,
    output: String,
    language: TypingLanguage,
    /// Language the select shows after `open`
    initial_language: TypingLanguage,
    focused: bool,
    /// Bumped on every edit; only the latest edit's recompute may render
    generation: u64,
    dropped_applies: u32,
    detached_reads: u32,
    stats: SimulationStats,
}

impl PageState {
    fn require_open(&self, what: &str) -> SurfaceResult<()> {
        if self.opened {
            Ok(())
        } else {
            Err(SurfaceError::ElementNotFound(what.to_string()))
        }
    }
}

struct Shared {
    state: Mutex<PageState>,
    exchanges: broadcast::Sender<Exchange>,
    translations: HashMap<String, String>,
    debounce: Duration,
    latency: Duration,
}

impl Shared {
    /// Record an edit to the input and restart the debounce timer.
    ///
    /// Blank input empties the output at once and makes no backend call.
    fn on_edit(self: &Arc<Self>, state: &mut PageState) {
        state.generation += 1;
        state.stats.edits += 1;

        if state.input.trim().is_empty() {
            state.output.clear();
            return;
        }

        let generation = state.generation;
        let text = state.input.clone();
        let language = state.language;
        let shared = Arc::clone(self);
        tokio::spawn(async move { shared.recompute(generation, text, language).await });
    }

    async fn recompute(self: Arc<Self>, generation: u64, text: String, language: TypingLanguage) {
        sleep(self.debounce).await;
        if self.state.lock().await.generation != generation {
            trace!(generation, "debounce superseded");
            return;
        }

        sleep(self.latency).await;
        let result = self.transliterate(&text, language);

        // The exchange completes before the page renders its response.
        let _ = self.exchanges.send(Exchange {
            url: EXCHANGE_URL.to_string(),
            status: Some(200),
        });

        let mut state = self.state.lock().await;
        state.stats.exchanges += 1;
        if state.generation != generation {
            trace!(generation, "response superseded while in flight");
            return;
        }

        if state.dropped_applies > 0 {
            state.dropped_applies -= 1;
            state.stats.dropped += 1;
            debug!(generation, "dropping computed result");
            return;
        }

        state.output = result;
        state.stats.applied += 1;
    }

    fn transliterate(&self, text: &str, language: TypingLanguage) -> String {
        match language {
            TypingLanguage::Sinhala => text.to_string(),
            TypingLanguage::English => self
                .translations
                .get(text.trim())
                .cloned()
                .unwrap_or_else(|| text.to_string()),
        }
    }
}

/// Translation table holding the expected output of every case that should
/// pass. The first case wins when two share an input.
pub fn translations_from(table: &CaseTable) -> HashMap<String, String> {
    let mut translations = HashMap::new();
    for (_, case) in table.iter().filter(|(_, case)| case.should_pass) {
        translations
            .entry(case.input.trim().to_string())
            .or_insert_with(|| case.expected_output.clone());
    }
    translations
}

/// In-process translator page with a debounced backend
///
/// Edits restart a debounce timer; when it fires, the simulated backend
/// answers after a fixed latency and the page renders the result. Inputs
/// not found in the translation table are echoed back unchanged.
///
/// Fault budgets (`dropped_applies`, `detached_reads`) are spent over the
/// page's lifetime, not per `open`.
pub struct SimulatedPage {
    shared: Arc<Shared>,
    input: SimulatedInput,
    output: SimulatedOutput,
    watcher: SimulatedExchanges,
}

impl SimulatedPage {
    pub fn new(settings: &SimulationConfig, translations: HashMap<String, String>) -> Self {
        let (exchanges, _) = broadcast::channel(64);
        let shared = Arc::new(Shared {
            state: Mutex::new(PageState {
                opened: false,
                input: String::new(),
                output: String::new(),
                language: TypingLanguage::English,
                initial_language: TypingLanguage::English,
                focused: false,
                generation: 0,
                dropped_applies: settings.dropped_applies,
                detached_reads: settings.detached_reads,
                stats: SimulationStats::default(),
            }),
            exchanges: exchanges.clone(),
            translations,
            debounce: Duration::from_millis(settings.debounce_ms),
            latency: Duration::from_millis(settings.backend_latency_ms),
        });

        Self {
            input: SimulatedInput {
                shared: Arc::clone(&shared),
            },
            output: SimulatedOutput {
                shared: Arc::clone(&shared),
            },
            watcher: SimulatedExchanges { sender: exchanges },
            shared,
        }
    }

    pub fn from_cases(settings: &SimulationConfig, table: &CaseTable) -> Self {
        Self::new(settings, translations_from(table))
    }

    /// Language the select shows each time the page is opened
    #[must_use]
    pub fn with_initial_language(self, language: TypingLanguage) -> Self {
        if let Ok(mut state) = self.shared.state.try_lock() {
            state.initial_language = language;
            state.language = language;
        }
        self
    }

    pub async fn stats(&self) -> SimulationStats {
        self.shared.state.lock().await.stats
    }
}

#[async_trait]
impl TranslatorPage for SimulatedPage {
    fn driver_name(&self) -> &'static str {
        "simulated"
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
        let mut state = self.shared.state.lock().await;
        state.opened = true;
        state.input.clear();
        state.output.clear();
        state.language = state.initial_language;
        state.focused = false;
        // Cancels any recompute still pending from a previous load.
        state.generation += 1;
        state.stats.opens += 1;
        Ok(())
    }

    async fn clear_button_visibility(&self) -> Visibility {
        let state = self.shared.state.lock().await;
        if !state.opened {
            Visibility::Unresolved
        } else if state.input.is_empty() {
            Visibility::Hidden
        } else {
            Visibility::Visible
        }
    }

    async fn click_clear(&self) -> SurfaceResult<()> {
        let mut state = self.shared.state.lock().await;
        state.require_open("clear button")?;
        if state.input.is_empty() {
            return Err(SurfaceError::NotInteractable("clear button".to_string()));
        }

        state.stats.clear_clicks += 1;
        state.input.clear();
        self.shared.on_edit(&mut state);
        Ok(())
    }

    async fn language_select_visibility(&self) -> Visibility {
        if self.shared.state.lock().await.opened {
            Visibility::Visible
        } else {
            Visibility::Unresolved
        }
    }

    async fn typing_language(&self) -> SurfaceResult<Option<TypingLanguage>> {
        let state = self.shared.state.lock().await;
        state.require_open("language select")?;
        Ok(Some(state.language))
    }

    async fn select_typing_language(&self, language: TypingLanguage) -> SurfaceResult<()> {
        let mut state = self.shared.state.lock().await;
        state.require_open("language select")?;
        state.language = language;
        state.stats.language_switches += 1;
        Ok(())
    }

    async fn close(&self) -> SurfaceResult<()> {
        let mut state = self.shared.state.lock().await;
        state.opened = false;
        state.generation += 1;
        Ok(())
    }
}

/// The Singlish input textarea
pub struct SimulatedInput {
    shared: Arc<Shared>,
}

#[async_trait]
impl ObservableSurface for SimulatedInput {
    fn label(&self) -> &str {
        "input"
    }

    async fn read(&self) -> SurfaceResult<ReadOutcome> {
        let state = self.shared.state.lock().await;
        Ok(if state.opened {
            ReadOutcome::Value(state.input.clone())
        } else {
            ReadOutcome::Unresolved
        })
    }

    async fn count(&self) -> SurfaceResult<usize> {
        Ok(usize::from(self.shared.state.lock().await.opened))
    }
}

#[async_trait]
impl InputSurface for SimulatedInput {
    async fn write(&self, text: &str) -> SurfaceResult<()> {
        let mut state = self.shared.state.lock().await;
        state.require_open("input")?;
        state.input = text.to_string();
        self.shared.on_edit(&mut state);
        Ok(())
    }

    async fn focus(&self) -> SurfaceResult<()> {
        let mut state = self.shared.state.lock().await;
        state.require_open("input")?;
        state.focused = true;
        Ok(())
    }

    async fn press(&self, key: Key) -> SurfaceResult<()> {
        let mut state = self.shared.state.lock().await;
        state.require_open("input")?;
        if !state.focused {
            return Err(SurfaceError::NotInteractable("input is not focused".to_string()));
        }

        match key {
            // The caret is always at the end of the simulated value.
            Key::End => {}
            Key::Backspace => {
                state.input.pop();
                self.shared.on_edit(&mut state);
            }
        }
        Ok(())
    }

    async fn type_text(&self, text: &str) -> SurfaceResult<()> {
        let mut state = self.shared.state.lock().await;
        state.require_open("input")?;
        if !state.focused {
            return Err(SurfaceError::NotInteractable("input is not focused".to_string()));
        }

        state.input.push_str(text);
        self.shared.on_edit(&mut state);
        Ok(())
    }
}

/// The rendered Sinhala output panel
pub struct SimulatedOutput {
    shared: Arc<Shared>,
}

#[async_trait]
impl ObservableSurface for SimulatedOutput {
    fn label(&self) -> &str {
        "output"
    }

    async fn read(&self) -> SurfaceResult<ReadOutcome> {
        let mut state = self.shared.state.lock().await;
        if !state.opened {
            return Ok(ReadOutcome::Unresolved);
        }

        if state.detached_reads > 0 {
            state.detached_reads -= 1;
            state.stats.detached_reads += 1;
            return Ok(ReadOutcome::Unresolved);
        }

        Ok(ReadOutcome::Value(state.output.clone()))
    }

    async fn count(&self) -> SurfaceResult<usize> {
        Ok(usize::from(self.shared.state.lock().await.opened))
    }
}

/// Broadcasts every simulated backend exchange to armed watches
pub struct SimulatedExchanges {
    sender: broadcast::Sender<Exchange>,
}

#[async_trait]
impl ExchangeWatcher for SimulatedExchanges {
    async fn arm(&self, matcher: &ExchangeMatcher) -> SurfaceResult<ExchangeWatch> {
        let mut receiver = self.sender.subscribe();
        let matcher = matcher.clone();

        Ok(Box::pin(async move {
            loop {
                match receiver.recv().await {
                    Ok(exchange) if matcher.matches(&exchange) => return exchange,
                    Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                    Err(broadcast::error::RecvError::Closed) => {
                        return futures::future::pending().await;
                    }
                }
            }
        }))
    }
}
