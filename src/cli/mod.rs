//! Command-line interface
//!
//! Each command lives in `commands/` with its clap arguments, its output
//! type and an `execute` function. Errors reach [`handle_error`], which
//! decides the exit status: 2 when checks did not pass, 1 otherwise.

pub mod commands;
pub mod output;
pub mod types;

use std::path::Path;

use anyhow::Result;
use thiserror::Error;

use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;

pub use output::{output, CommandOutput};
pub use types::{Cli, Commands};

/// Exit status when one or more checks did not pass
pub const EXIT_CHECKS_FAILED: i32 = 2;
/// Exit status for any other error
pub const EXIT_ERROR: i32 = 1;

/// Returned by commands whose checks did not all pass. The command has
/// already printed its report.
#[derive(Error, Debug)]
#[error("{failed} of {total} check(s) did not pass")]
pub struct ChecksFailed {
    pub failed: usize,
    pub total: usize,
}

/// Load `path` when given, otherwise the merged project configuration
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

/// Exit status for an error returned by a command
pub fn exit_code(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<ChecksFailed>().is_some() {
        EXIT_CHECKS_FAILED
    } else {
        EXIT_ERROR
    }
}

/// Report `err` on stderr and exit
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    let code = exit_code(&err);
    if json_mode {
        let body = serde_json::json!({ "error": format!("{err:#}"), "exit_code": code });
        eprintln!("{body}");
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let failed = anyhow::Error::new(ChecksFailed { failed: 1, total: 3 });
        assert_eq!(exit_code(&failed), EXIT_CHECKS_FAILED);
        assert_eq!(failed.to_string(), "1 of 3 check(s) did not pass");

        let other = anyhow::anyhow!("webdriver unreachable");
        assert_eq!(exit_code(&other), EXIT_ERROR);
    }

    #[test]
    fn test_exit_code_survives_context() {
        let err = anyhow::Error::new(ChecksFailed { failed: 2, total: 2 }).context("run");
        assert_eq!(exit_code(&err), EXIT_CHECKS_FAILED);
    }
}
