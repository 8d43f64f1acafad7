//! Domain models for the convergence engine.

pub mod budget;
pub mod case;
pub mod config;
pub mod exchange;
pub mod observation;
pub mod predicate;
pub mod report;
pub mod verdict;

pub use budget::PollBudget;
pub use case::{CaseCheck, CaseGroup, CaseTable, TestCase};
pub use config::{
    Config, ExchangeConfig, Locator, LocatorStrategy, LoggingConfig, SelectorConfig,
    SimulationConfig, TargetConfig, TimingConfig,
};
pub use exchange::{Exchange, ExchangeMatcher, GateReport};
pub use observation::{
    NudgeOutcome, ObservationPhase, PhaseEvent, ReadOutcome, RecoveryPolicy, TypingLanguage,
    Visibility,
};
pub use predicate::WatchPredicate;
pub use report::{CaseOutcome, CaseStatus, RunReport};
pub use verdict::{LengthTier, SimilarityVerdict};
