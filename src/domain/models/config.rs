use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::budget::PollBudget;
use crate::domain::errors::BudgetError;

/// Main configuration structure for Tidemark
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Page under test and WebDriver endpoint
    #[serde(default)]
    pub target: TargetConfig,

    /// Debounce window, gate ceiling and poll budgets
    #[serde(default)]
    pub timing: TimingConfig,

    /// Backend exchange the correlation gate waits for
    #[serde(default)]
    pub exchange: ExchangeConfig,

    /// Element locators for the WebDriver page
    #[serde(default)]
    pub selectors: SelectorConfig,

    /// In-process simulated page settings
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Target page configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TargetConfig {
    /// URL of the translator page
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// W3C WebDriver endpoint (chromedriver, geckodriver, selenium)
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Browser name requested in the session capabilities
    #[serde(default = "default_browser")]
    pub browser: String,

    /// Run the browser headless
    #[serde(default = "default_true")]
    pub headless: bool,

    /// How long `open` waits for the input surface to resolve
    #[serde(default = "default_open_timeout_ms")]
    pub open_timeout_ms: u64,
}

fn default_base_url() -> String {
    "https://www.swifttranslator.com/".to_string()
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_browser() -> String {
    "chrome".to_string()
}

const fn default_true() -> bool {
    true
}

const fn default_open_timeout_ms() -> u64 {
    30_000
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            webdriver_url: default_webdriver_url(),
            browser: default_browser(),
            headless: true,
            open_timeout_ms: default_open_timeout_ms(),
        }
    }
}

/// Timing configuration. All values in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct TimingConfig {
    /// Pause after an edit so the app's debounce timer can fire
    pub debounce_window_ms: u64,
    /// Ceiling on the backend exchange wait
    pub gate_ceiling_ms: u64,
    /// First phase after a value-producing edit
    pub produce_timeout_ms: u64,
    pub produce_interval_ms: u64,
    /// Second phase, after the nudge
    pub retry_timeout_ms: u64,
    pub retry_interval_ms: u64,
    /// Wait for any change after a blank edit
    pub change_timeout_ms: u64,
    pub change_interval_ms: u64,
    /// Wait for the output to empty after an explicit clear
    pub clear_timeout_ms: u64,
    pub clear_interval_ms: u64,
    /// Wait for output while typing character by character
    pub realtime_timeout_ms: u64,
    pub realtime_interval_ms: u64,
    /// Pause between the two nudge edits
    pub nudge_pause_ms: u64,
    /// Pause after each typed character
    pub keystroke_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            debounce_window_ms: 350,
            gate_ceiling_ms: 20_000,
            produce_timeout_ms: 25_000,
            produce_interval_ms: 150,
            retry_timeout_ms: 10_000,
            retry_interval_ms: 150,
            change_timeout_ms: 10_000,
            change_interval_ms: 100,
            clear_timeout_ms: 8_000,
            clear_interval_ms: 100,
            realtime_timeout_ms: 10_000,
            realtime_interval_ms: 250,
            nudge_pause_ms: 50,
            keystroke_delay_ms: 80,
        }
    }
}

impl TimingConfig {
    pub const fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_window_ms)
    }

    pub const fn gate_ceiling(&self) -> Duration {
        Duration::from_millis(self.gate_ceiling_ms)
    }

    pub const fn nudge_pause(&self) -> Duration {
        Duration::from_millis(self.nudge_pause_ms)
    }

    pub const fn keystroke_delay(&self) -> Duration {
        Duration::from_millis(self.keystroke_delay_ms)
    }

    pub fn produce_budget(&self) -> Result<PollBudget, BudgetError> {
        PollBudget::from_millis(self.produce_timeout_ms, self.produce_interval_ms)
    }

    pub fn retry_budget(&self) -> Result<PollBudget, BudgetError> {
        PollBudget::from_millis(self.retry_timeout_ms, self.retry_interval_ms)
    }

    pub fn change_budget(&self) -> Result<PollBudget, BudgetError> {
        PollBudget::from_millis(self.change_timeout_ms, self.change_interval_ms)
    }

    pub fn clear_budget(&self) -> Result<PollBudget, BudgetError> {
        PollBudget::from_millis(self.clear_timeout_ms, self.clear_interval_ms)
    }

    pub fn realtime_budget(&self) -> Result<PollBudget, BudgetError> {
        PollBudget::from_millis(self.realtime_timeout_ms, self.realtime_interval_ms)
    }
}

/// Backend exchange configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct ExchangeConfig {
    /// Case-insensitive regex matched against the request URL
    pub url_pattern: String,
    /// Status that counts as a successful exchange
    pub success_status: u16,
    /// How often the WebDriver resource-timing probe polls
    pub probe_interval_ms: u64,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            url_pattern: r"execute-api\.us-east-1\.amazonaws\.com/transliterate".to_string(),
            success_status: 200,
            probe_interval_ms: 100,
        }
    }
}

/// Element locator strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocatorStrategy {
    Css,
    Xpath,
}

impl LocatorStrategy {
    /// Strategy name on the WebDriver wire.
    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::Css => "css selector",
            Self::Xpath => "xpath",
        }
    }
}

/// How to find one element on the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locator {
    pub using: LocatorStrategy,
    pub value: String,
}

impl Locator {
    pub fn css(value: impl Into<String>) -> Self {
        Self {
            using: LocatorStrategy::Css,
            value: value.into(),
        }
    }

    pub fn xpath(value: impl Into<String>) -> Self {
        Self {
            using: LocatorStrategy::Xpath,
            value: value.into(),
        }
    }
}

/// Locators for the translator page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct SelectorConfig {
    pub input: Locator,
    pub output: Locator,
    pub language_select: Locator,
    pub clear_button: Locator,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            input: Locator::css(r#"textarea[placeholder="Input Your Singlish Text Here."]"#),
            output: Locator::xpath(
                "//div[contains(concat(' ', normalize-space(@class), ' '), ' card ')]\
                 [.//*[contains(concat(' ', normalize-space(@class), ' '), ' panel-title ') \
                 and normalize-space(.)='Sinhala']]\
                 //div[contains(concat(' ', normalize-space(@class), ' '), ' whitespace-pre-wrap ')]",
            ),
            language_select: Locator::xpath("//select[option[@value='english']]"),
            clear_button: Locator::xpath(
                "//button[contains(translate(normalize-space(.), \
                 'ABCDEFGHIJKLMNOPQRSTUVWXYZ', 'abcdefghijklmnopqrstuvwxyz'), 'clear')]",
            ),
        }
    }
}

/// Simulated page configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct SimulationConfig {
    /// Debounce the simulated app applies to edits
    pub debounce_ms: u64,
    /// Time between request and rendered response
    pub backend_latency_ms: u64,
    /// Number of computed results that are never rendered
    pub dropped_applies: u32,
    /// Number of output reads that find no element
    pub detached_reads: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            backend_latency_ms: 120,
            dropped_applies: 0,
            detached_reads: 0,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stderr only when unset
    #[serde(default)]
    pub log_dir: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
        }
    }
}
