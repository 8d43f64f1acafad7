use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::time::{sleep, Instant};
use tracing::{debug, info, instrument};

use super::client::{element_arg, WebDriverClient};
use super::errors::WebDriverError;
use super::exchange::ResourceTimingWatcher;
use super::surface::{ReadMode, WebDriverSurface};
use crate::domain::errors::{SurfaceError, SurfaceResult};
use crate::domain::models::{Config, Locator, SelectorConfig, TargetConfig, TypingLanguage, Visibility};
use crate::domain::ports::{ExchangeWatcher, InputSurface, ObservableSurface, TranslatorPage};

/// Sets a select's value the way a user choice would, firing input and change
const SELECT_SCRIPT: &str = "var el = arguments[0]; el.value = arguments[1]; \
     el.dispatchEvent(new Event('input', { bubbles: true })); \
     el.dispatchEvent(new Event('change', { bubbles: true }));";

const OPEN_POLL_INTERVAL: Duration = Duration::from_millis(250);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// `alwaysMatch` capabilities for the configured browser
pub fn capabilities(target: &TargetConfig) -> Value {
    let browser = target.browser.to_lowercase();
    match browser.as_str() {
        "chrome" | "chromium" => {
            let mut args = vec!["--window-size=1280,900"];
            if target.headless {
                args.push("--headless=new");
            }
            json!({ "browserName": "chrome", "goog:chromeOptions": { "args": args } })
        }
        "firefox" => {
            let args: Vec<&str> = if target.headless { vec!["-headless"] } else { Vec::new() };
            json!({ "browserName": "firefox", "moz:firefoxOptions": { "args": args } })
        }
        _ => json!({ "browserName": browser }),
    }
}

/// The translator page driven through a W3C WebDriver session
pub struct WebDriverPage {
    client: Arc<WebDriverClient>,
    base_url: String,
    open_timeout: Duration,
    selectors: SelectorConfig,
    input: WebDriverSurface,
    output: WebDriverSurface,
    watcher: ResourceTimingWatcher,
}

impl WebDriverPage {
    /// Page over an existing client; the caller owns session creation
    pub fn new(client: Arc<WebDriverClient>, config: &Config) -> Self {
        let selectors = config.selectors.clone();
        Self {
            input: WebDriverSurface::new(
                Arc::clone(&client),
                selectors.input.clone(),
                "input",
                ReadMode::Value,
            ),
            output: WebDriverSurface::new(
                Arc::clone(&client),
                selectors.output.clone(),
                "output",
                ReadMode::Text,
            ),
            watcher: ResourceTimingWatcher::new(
                Arc::clone(&client),
                Duration::from_millis(config.exchange.probe_interval_ms),
            ),
            base_url: config.target.base_url.clone(),
            open_timeout: Duration::from_millis(config.target.open_timeout_ms),
            selectors,
            client,
        }
    }

    /// Connect to the configured WebDriver endpoint and start a browser session
    #[instrument(skip_all, fields(webdriver = %config.target.webdriver_url, browser = %config.target.browser))]
    pub async fn connect(config: &Config) -> Result<Self, WebDriverError> {
        let client = WebDriverClient::new(&config.target.webdriver_url, REQUEST_TIMEOUT)?;
        client.new_session(capabilities(&config.target)).await?;
        info!("browser session started");
        Ok(Self::new(Arc::new(client), config))
    }

    async fn visibility(&self, locator: &Locator) -> Visibility {
        let element = match self.client.find_first(locator).await {
            Ok(Some(element)) => element,
            Ok(None) => return Visibility::Hidden,
            Err(err) => {
                debug!(error = %err, "visibility lookup failed");
                return Visibility::Unresolved;
            }
        };

        match self.client.element_displayed(&element).await {
            Ok(true) => Visibility::Visible,
            Ok(false) => Visibility::Hidden,
            Err(err) => {
                debug!(error = %err, "visibility query failed");
                Visibility::Unresolved
            }
        }
    }

    async fn required(&self, locator: &Locator, what: &str) -> SurfaceResult<String> {
        self.client
            .find_first(locator)
            .await?
            .ok_or_else(|| SurfaceError::ElementNotFound(what.to_string()))
    }
}

#[async_trait]
impl TranslatorPage for WebDriverPage {
    fn driver_name(&self) -> &'static str {
        "webdriver"
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

    #[instrument(skip_all, fields(url = %self.base_url))]
    async fn open(&self) -> SurfaceResult<()> {
        self.client.navigate(&self.base_url).await?;

        let deadline = Instant::now() + self.open_timeout;
        loop {
            if self.input.count().await? > 0 {
                debug!("input resolved");
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(SurfaceError::ElementNotFound(format!(
                    "input {:?} did not appear within {}ms",
                    self.input.locator().value,
                    self.open_timeout.as_millis()
                )));
            }
            sleep(OPEN_POLL_INTERVAL).await;
        }
    }

    async fn clear_button_visibility(&self) -> Visibility {
        self.visibility(&self.selectors.clear_button).await
    }

    async fn click_clear(&self) -> SurfaceResult<()> {
        let button = self
            .required(&self.selectors.clear_button, "clear button")
            .await?;
        self.client.element_click(&button).await?;
        Ok(())
    }

    async fn language_select_visibility(&self) -> Visibility {
        self.visibility(&self.selectors.language_select).await
    }

    async fn typing_language(&self) -> SurfaceResult<Option<TypingLanguage>> {
        let select = self
            .required(&self.selectors.language_select, "language select")
            .await?;
        let value = self.client.element_property(&select, "value").await?;
        Ok(value.as_deref().and_then(TypingLanguage::from_str))
    }

    async fn select_typing_language(&self, language: TypingLanguage) -> SurfaceResult<()> {
        let select = self
            .required(&self.selectors.language_select, "language select")
            .await?;
        self.client
            .execute(
                SELECT_SCRIPT,
                vec![element_arg(&select), json!(language.as_str())],
            )
            .await?;
        Ok(())
    }

    async fn close(&self) -> SurfaceResult<()> {
        self.client.delete_session().await?;
        Ok(())
    }
}
