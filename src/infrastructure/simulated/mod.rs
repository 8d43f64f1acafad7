//! In-process translator page.
//!
//! Reproduces the debounce, backend latency and render behaviour of the
//! real page, with injectable faults, so the engine can run without a
//! browser.

pub mod page;

pub use page::{
    translations_from, SimulatedExchanges, SimulatedInput, SimulatedOutput, SimulatedPage,
    SimulationStats, EXCHANGE_URL,
};
