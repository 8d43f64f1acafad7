use std::sync::Arc;

use async_trait::async_trait;
use tracing::trace;

use super::client::WebDriverClient;
use super::errors::WebDriverError;
use crate::domain::errors::{SurfaceError, SurfaceResult};
use crate::domain::models::{Locator, ReadOutcome};
use crate::domain::ports::{InputSurface, Key, ObservableSurface};

/// WebDriver key code for End
pub const KEY_END: &str = "\u{E010}";
/// WebDriver key code for Backspace
pub const KEY_BACKSPACE: &str = "\u{E003}";

/// Which part of the element a read returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Rendered text, for display elements
    Text,
    /// The `value` property, for form controls
    Value,
}

/// A page element located afresh on every operation
///
/// Nothing is cached between calls: the translator re-renders its output
/// panel, so element references go stale quickly.
pub struct WebDriverSurface {
    client: Arc<WebDriverClient>,
    locator: Locator,
    label: &'static str,
    mode: ReadMode,
}

impl WebDriverSurface {
    pub const fn new(
        client: Arc<WebDriverClient>,
        locator: Locator,
        label: &'static str,
        mode: ReadMode,
    ) -> Self {
        Self {
            client,
            locator,
            label,
            mode,
        }
    }

    pub const fn locator(&self) -> &Locator {
        &self.locator
    }

    async fn element(&self) -> SurfaceResult<String> {
        self.client
            .find_first(&self.locator)
            .await?
            .ok_or_else(|| SurfaceError::ElementNotFound(self.label.to_string()))
    }

    async fn read_element(&self, element: &str) -> Result<String, WebDriverError> {
        match self.mode {
            ReadMode::Text => self.client.element_text(element).await,
            ReadMode::Value => Ok(self
                .client
                .element_property(element, "value")
                .await?
                .unwrap_or_default()),
        }
    }

    async fn send_keys(&self, text: &str) -> SurfaceResult<()> {
        let element = self.element().await?;
        self.client.element_send_keys(&element, text).await?;
        Ok(())
    }
}

#[async_trait]
impl ObservableSurface for WebDriverSurface {
    fn label(&self) -> &str {
        self.label
    }

    async fn read(&self) -> SurfaceResult<ReadOutcome> {
        let element = match self.client.find_first(&self.locator).await {
            Ok(Some(element)) => element,
            Ok(None) => return Ok(ReadOutcome::Unresolved),
            Err(err) if err.is_stale() => return Ok(ReadOutcome::Unresolved),
            Err(err) => return Err(err.into()),
        };

        match self.read_element(&element).await {
            Ok(text) => Ok(ReadOutcome::Value(text)),
            Err(err) if err.is_stale() => {
                trace!(surface = self.label, "element went stale during read");
                Ok(ReadOutcome::Unresolved)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn count(&self) -> SurfaceResult<usize> {
        Ok(self.client.find_elements(&self.locator).await?.len())
    }
}

#[async_trait]
impl InputSurface for WebDriverSurface {
    async fn write(&self, text: &str) -> SurfaceResult<()> {
        let element = self.element().await?;
        self.client.element_clear(&element).await?;
        if !text.is_empty() {
            self.client.element_send_keys(&element, text).await?;
        }
        Ok(())
    }

    async fn focus(&self) -> SurfaceResult<()> {
        let element = self.element().await?;
        self.client.element_click(&element).await?;
        Ok(())
    }

    async fn press(&self, key: Key) -> SurfaceResult<()> {
        let code = match key {
            Key::End => KEY_END,
            Key::Backspace => KEY_BACKSPACE,
        };
        self.send_keys(code).await
    }

    async fn type_text(&self, text: &str) -> SurfaceResult<()> {
        self.send_keys(text).await
    }
}
