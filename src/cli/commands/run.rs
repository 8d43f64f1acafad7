//! Implementation of the `tidemark run` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use tracing::warn;

use crate::cli::output::progress::{create_spinner, ProgressBarExt};
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::cli::ChecksFailed;
use crate::domain::models::{CaseGroup, CaseStatus, CaseTable, Config, RunReport};
use crate::domain::ports::TranslatorPage;
use crate::infrastructure::fixtures::CaseLoader;
use crate::infrastructure::simulated::SimulatedPage;
use crate::infrastructure::webdriver::WebDriverPage;
use crate::services::{ScenarioRunner, SessionSettings, TranslatorSession};

/// Which page implementation the run drives
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Driver {
    /// In-process page with debounce, latency and faults from configuration
    Simulated,
    /// The configured page in a real browser over W3C WebDriver
    Webdriver,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Case table (YAML); the built-in table when omitted
    #[arg(long, value_name = "PATH")]
    pub cases: Option<PathBuf>,

    /// Page implementation to drive
    #[arg(long, value_enum, default_value = "webdriver")]
    pub driver: Driver,

    /// Only run these case ids
    #[arg(long, value_delimiter = ',', value_name = "IDS")]
    pub only: Vec<String>,

    /// Only run cases from this group (positive, negative, ui, realtime)
    #[arg(long, value_parser = parse_group)]
    pub group: Option<CaseGroup>,

    /// Also write the full report as JSON to this file
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,
}

pub(crate) fn parse_group(s: &str) -> Result<CaseGroup, String> {
    CaseGroup::from_str(s).ok_or_else(|| {
        format!("unknown group '{s}' (expected positive, negative, ui or realtime)")
    })
}

#[derive(Debug, serde::Serialize)]
pub struct RunOutput {
    pub report: RunReport,
}

impl CommandOutput for RunOutput {
    fn to_human(&self) -> String {
        let report = &self.report;
        let mut lines = vec![TableFormatter::new().format_report(report)];
        lines.push(format!(
            "\n{} passed, {} failed, {} errored of {} ({} driver, run {})",
            report.passed(),
            report.count(CaseStatus::Failed),
            report.count(CaseStatus::Errored),
            report.total(),
            report.driver,
            report.run_id
        ));
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.report).unwrap_or_default()
    }
}

async fn open_page(
    driver: Driver,
    config: &Config,
    table: &CaseTable,
) -> Result<Arc<dyn TranslatorPage>> {
    Ok(match driver {
        Driver::Simulated => Arc::new(SimulatedPage::from_cases(&config.simulation, table)),
        Driver::Webdriver => Arc::new(
            WebDriverPage::connect(config)
                .await
                .with_context(|| {
                    format!(
                        "Failed to start a browser session at {}",
                        config.target.webdriver_url
                    )
                })?,
        ),
    })
}

pub async fn execute(args: RunArgs, config: &Config, json_mode: bool) -> Result<()> {
    let table = CaseLoader::load(args.cases.as_deref()).context("Failed to load case table")?;
    let selected: Vec<_> = table.select(args.group, &args.only).collect();
    if selected.is_empty() {
        bail!("No cases match the given filters");
    }

    // Resolved first so a bad configuration never leaves a browser session behind.
    let settings =
        SessionSettings::from_config(config).context("Invalid session configuration")?;
    let page = open_page(args.driver, config, &table).await?;
    let session = TranslatorSession::with_settings(page, settings);

    let spinner = (!json_mode).then(|| create_spinner(selected.len() as u64));
    let report = ScenarioRunner::new(&session)
        .run(selected.iter().copied(), |outcome| {
            if let Some(spinner) = &spinner {
                spinner.inc(1);
                spinner.set_message(format!("{} {}", outcome.id, outcome.status));
            }
        })
        .await;

    if let Err(err) = session.close().await {
        warn!(error = %err, "failed to close page");
    }

    if let Some(spinner) = spinner {
        if report.all_passed() {
            spinner.finish_success("all checks passed");
        } else {
            spinner.finish_error("some checks did not pass");
        }
    }

    if let Some(path) = &args.report {
        let body = serde_json::to_vec_pretty(&report).context("Failed to serialize report")?;
        tokio::fs::write(path, body)
            .await
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
    }

    let failed = report.total() - report.passed();
    let total = report.total();
    output(&RunOutput { report }, json_mode);

    if failed > 0 {
        return Err(ChecksFailed { failed, total }.into());
    }
    Ok(())
}
