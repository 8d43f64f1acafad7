//! Infrastructure layer module
//!
//! This module contains all infrastructure adapters and external integrations:
//! - W3C WebDriver page adapter
//! - In-process simulated page
//! - Case table loading
//! - Configuration management
//! - Logging infrastructure
//!
//! Infrastructure implementations satisfy the port traits defined in the domain layer.

pub mod config;
pub mod fixtures;
pub mod logging;
pub mod simulated;
pub mod webdriver;
