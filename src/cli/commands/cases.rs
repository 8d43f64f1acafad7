//! Implementation of the `tidemark cases` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use super::run::parse_group;
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::{CaseGroup, TestCase};
use crate::infrastructure::fixtures::CaseLoader;

#[derive(Args, Debug)]
pub struct CasesArgs {
    /// Case table (YAML); the built-in table when omitted
    #[arg(long, value_name = "PATH")]
    pub cases: Option<PathBuf>,

    /// Only list cases from this group
    #[arg(long, value_parser = parse_group)]
    pub group: Option<CaseGroup>,
}

#[derive(Debug, Serialize)]
pub struct CaseListing {
    pub group: CaseGroup,
    #[serde(flatten)]
    pub case: TestCase,
}

#[derive(Debug, Serialize)]
pub struct CasesOutput {
    pub cases: Vec<CaseListing>,
}

impl CommandOutput for CasesOutput {
    fn to_human(&self) -> String {
        if self.cases.is_empty() {
            return "No cases found.".to_string();
        }
        let table = TableFormatter::new()
            .format_cases(self.cases.iter().map(|listing| (listing.group, &listing.case)));
        format!("{table}\n\n{} case(s)", self.cases.len())
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: CasesArgs, json_mode: bool) -> Result<()> {
    let table = CaseLoader::load(args.cases.as_deref()).context("Failed to load case table")?;
    let cases = table
        .select(args.group, &[])
        .map(|(group, case)| CaseListing {
            group,
            case: case.clone(),
        })
        .collect();

    output(&CasesOutput { cases }, json_mode);
    Ok(())
}
