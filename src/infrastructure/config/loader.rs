use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use thiserror::Error;

use crate::domain::errors::BudgetError;
use crate::domain::models::config::Config;
use crate::domain::models::ExchangeMatcher;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {name} budget: {source}")]
    InvalidBudget {
        name: &'static str,
        #[source]
        source: BudgetError,
    },

    #[error(
        "Invalid debounce window: debounce_window_ms ({0}) must be less than gate_ceiling_ms ({1})"
    )]
    DebounceNotBelowCeiling(u64, u64),

    #[error("Invalid exchange url_pattern: {0}")]
    InvalidExchangePattern(#[from] regex::Error),

    #[error("Invalid success_status: {0}. Must be an HTTP status code")]
    InvalidSuccessStatus(u16),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("{0} cannot be empty")]
    EmptyUrl(&'static str),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .tidemark/config.yaml (project config)
    /// 3. .tidemark/local.yaml (local overrides, optional)
    /// 4. Environment variables (TIDEMARK_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Self::figment()
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// The merged provider chain used by [`ConfigLoader::load`]
    pub fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".tidemark/config.yaml"))
            .merge(Yaml::file(".tidemark/local.yaml"))
            .merge(Env::prefixed("TIDEMARK_").split("__"))
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.target.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyUrl("target.base_url"));
        }
        if config.target.webdriver_url.trim().is_empty() {
            return Err(ConfigError::EmptyUrl("target.webdriver_url"));
        }

        let timing = &config.timing;
        let budgets = [
            ("produce", timing.produce_budget()),
            ("retry", timing.retry_budget()),
            ("change", timing.change_budget()),
            ("clear", timing.clear_budget()),
            ("realtime", timing.realtime_budget()),
        ];
        for (name, budget) in budgets {
            budget.map_err(|source| ConfigError::InvalidBudget { name, source })?;
        }

        if timing.debounce_window_ms >= timing.gate_ceiling_ms {
            return Err(ConfigError::DebounceNotBelowCeiling(
                timing.debounce_window_ms,
                timing.gate_ceiling_ms,
            ));
        }

        ExchangeMatcher::new(&config.exchange.url_pattern, config.exchange.success_status)?;

        if !(100..=599).contains(&config.exchange.success_status) {
            return Err(ConfigError::InvalidSuccessStatus(
                config.exchange.success_status,
            ));
        }

        if config.exchange.probe_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "exchange.probe_interval_ms must be greater than zero".to_string(),
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        for (name, locator) in [
            ("input", &config.selectors.input),
            ("output", &config.selectors.output),
            ("language_select", &config.selectors.language_select),
            ("clear_button", &config.selectors.clear_button),
        ] {
            if locator.value.trim().is_empty() {
                return Err(ConfigError::ValidationFailed(format!(
                    "selectors.{name} cannot be empty"
                )));
            }
        }

        Ok(())
    }
}
