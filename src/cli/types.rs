//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::commands::{
    cases::CasesArgs, compare::CompareArgs, config::ConfigArgs, run::RunArgs,
};

#[derive(Parser, Debug)]
#[command(name = "tidemark")]
#[command(
    about = "Tidemark - convergence observation and fuzzy verification for debounced translators",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Load configuration from this file only, instead of .tidemark/
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the case table against a translator page
    Run(RunArgs),

    /// Score a received string against an expected one
    Compare(CompareArgs),

    /// List the cases in a case table
    Cases(CasesArgs),

    /// Show the effective configuration
    Config(ConfigArgs),
}
