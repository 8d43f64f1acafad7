//! CLI command implementations

pub mod cases;
pub mod compare;
pub mod config;
pub mod run;
