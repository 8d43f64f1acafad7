//! Backend exchange matching and correlation gate reports.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// A completed request/response pair seen by an exchange watcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub url: String,
    /// Response status, when the transport reports one.
    pub status: Option<u16>,
}

/// Selects the backend exchange the gate waits for.
#[derive(Debug, Clone)]
pub struct ExchangeMatcher {
    url_pattern: Regex,
    success_status: u16,
}

impl ExchangeMatcher {
    /// Build a matcher from a case-insensitive URL pattern.
    pub fn new(url_pattern: &str, success_status: u16) -> Result<Self, regex::Error> {
        let url_pattern = RegexBuilder::new(url_pattern)
            .case_insensitive(true)
            .build()?;
        Ok(Self {
            url_pattern,
            success_status,
        })
    }

    pub fn url_pattern(&self) -> &str {
        self.url_pattern.as_str()
    }

    pub const fn success_status(&self) -> u16 {
        self.success_status
    }

    /// A missing status counts as success: some transports cannot report it.
    pub fn matches(&self, exchange: &Exchange) -> bool {
        self.url_pattern.is_match(&exchange.url)
            && exchange.status.is_none_or(|status| status == self.success_status)
    }
}

/// What the correlation gate observed of the backend exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum GateReport {
    /// Blank input produces no backend call, so no watch was armed.
    NotArmed,
    /// The armed watch resolved.
    Observed(Exchange),
    /// The armed watch did not resolve within the gate ceiling.
    CeilingElapsed,
    /// The watcher could not be armed; the gate fell back to the debounce wait.
    WatchUnavailable,
}

impl GateReport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotArmed => "not_armed",
            Self::Observed(_) => "observed",
            Self::CeilingElapsed => "ceiling_elapsed",
            Self::WatchUnavailable => "watch_unavailable",
        }
    }
}
