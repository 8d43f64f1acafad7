//! Tidemark CLI entry point.

use anyhow::{Context, Result};
use clap::Parser;

use tidemark::cli::{self, Cli, Commands};
use tidemark::infrastructure::logging::{LogConfig, LoggerImpl};

async fn run(cli: Cli) -> Result<()> {
    let config = cli::load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    let _logger = LoggerImpl::init(&LogConfig::from(&config.logging))
        .context("Failed to initialize logging")?;

    match cli.command {
        Commands::Run(args) => cli::commands::run::execute(args, &config, cli.json).await,
        Commands::Compare(args) => cli::commands::compare::execute(args, cli.json).await,
        Commands::Cases(args) => cli::commands::cases::execute(args, cli.json).await,
        Commands::Config(args) => cli::commands::config::execute(args, &config, cli.json).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(err) = run(cli).await {
        cli::handle_error(err, json);
    }
}
