use async_trait::async_trait;

use super::exchange::ExchangeWatcher;
use super::surface::{InputSurface, ObservableSurface};
use crate::domain::errors::SurfaceResult;
use crate::domain::models::{TypingLanguage, Visibility};

/// Port trait for the element resolution layer of the translator page
///
/// Hands out the input and output surfaces and the handful of page controls
/// the session dispatches on. The engine never creates or destroys surfaces;
/// their lifetime is that of the page.
#[async_trait]
pub trait TranslatorPage: Send + Sync {
    /// Short adapter name used in reports ("webdriver", "simulated")
    fn driver_name(&self) -> &'static str;

    fn input(&self) -> &dyn InputSurface;

    fn output(&self) -> &dyn ObservableSurface;

    fn exchanges(&self) -> &dyn ExchangeWatcher;

    /// Load the page and wait until the input surface resolves
    async fn open(&self) -> SurfaceResult<()>;

    async fn clear_button_visibility(&self) -> Visibility;

    async fn click_clear(&self) -> SurfaceResult<()>;

    async fn language_select_visibility(&self) -> Visibility;

    /// Current value of the language select, `None` if it is unrecognised
    async fn typing_language(&self) -> SurfaceResult<Option<TypingLanguage>>;

    async fn select_typing_language(&self, language: TypingLanguage) -> SurfaceResult<()>;

    /// Release the underlying page session
    async fn close(&self) -> SurfaceResult<()> {
        Ok(())
    }
}
