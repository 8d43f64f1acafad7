//! Domain layer for Tidemark
//!
//! This module contains the engine's models, errors and port traits.

pub mod errors;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use errors::{
    BudgetError, ConvergenceError, SessionError, SurfaceError, SurfaceResult,
    TimeoutDiagnostics, VerificationMismatch,
};
