//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that infrastructure adapters must implement:
//! - ObservableSurface / InputSurface: reading and editing page values
//! - ExchangeWatcher: observing the backend exchange behind the page
//! - TranslatorPage: element resolution for the translator page
//!
//! These traits define the contracts that keep the convergence engine
//! independent of any browser automation stack.

pub mod exchange;
pub mod page;
pub mod surface;

pub use exchange::{ExchangeWatch, ExchangeWatcher};
pub use page::TranslatorPage;
pub use surface::{InputSurface, Key, ObservableSurface};
