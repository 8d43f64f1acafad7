//! Service layer: the convergence engine proper.
//!
//! - `observer`: phase-driven polling until a watch predicate holds
//! - `nudger`: recompute nudge applied between observation phases
//! - `correlation_gate`: debounce and backend exchange wait around an edit
//! - `session`: translator page object composing the above
//! - `verifier`, `similarity`, `tolerance`, `normalization`: fuzzy verification
//! - `scenario_runner`: sequential execution of a case table

pub mod correlation_gate;
pub mod normalization;
pub mod nudger;
pub mod observer;
pub mod scenario_runner;
pub mod session;
pub mod similarity;
pub mod tolerance;
pub mod verifier;

pub use correlation_gate::CorrelationGate;
pub use normalization::normalize;
pub use nudger::RecomputeNudger;
pub use observer::ConvergenceObserver;
pub use scenario_runner::ScenarioRunner;
pub use session::{SessionBudgets, SessionSettings, TranslatorSession};
pub use similarity::{levenshtein, score};
pub use tolerance::{classify, classify_with, threshold_for, DEFAULT_THRESHOLD};
