//! Tidemark - convergence observation and fuzzy verification
//!
//! Tidemark drives a debounced, network-backed text transformation page (a
//! Singlish to Sinhala transliterator) and decides when its output has
//! settled before judging it against expected text.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, errors and the page port traits
//! - **Service Layer** (`services`): observer, nudger, correlation gate,
//!   session, verifier and scenario runner
//! - **Infrastructure Layer** (`infrastructure`): configuration, logging,
//!   case tables, the simulated page and the WebDriver adapter
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tidemark::{CaseLoader, Config, ScenarioRunner, SimulatedPage, TranslatorSession};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let cases = CaseLoader::builtin()?;
//!     let page = Arc::new(SimulatedPage::from_cases(&config.simulation, &cases));
//!     let session = TranslatorSession::from_config(page, &config)?;
//!     let report = ScenarioRunner::new(&session).run(cases.iter(), |_| {}).await;
//!     println!("{} of {} passed", report.passed(), report.total());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{ConvergenceError, SessionError, SurfaceError};
pub use domain::models::{
    CaseGroup, CaseOutcome, CaseStatus, CaseTable, Config, LengthTier, PollBudget, ReadOutcome,
    RunReport, TestCase, WatchPredicate,
};
pub use domain::ports::{ExchangeWatcher, InputSurface, ObservableSurface, TranslatorPage};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::fixtures::CaseLoader;
pub use infrastructure::simulated::SimulatedPage;
pub use infrastructure::webdriver::WebDriverPage;
pub use services::{ConvergenceObserver, ScenarioRunner, TranslatorSession};
