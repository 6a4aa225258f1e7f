//! Capital.com scanner and quote streamer.

mod cli;

use anyhow::{Context, Result};
use capital_config::load_config;
use capital_monitor::setup_logging;
use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = load_config(&cli.config);

    // Setup logging; the CLI level wins over the configured one
    let logging = loaded
        .as_ref()
        .map(|config| config.logging.clone())
        .unwrap_or_default();
    let log_level = cli
        .log_level
        .as_ref()
        .map(cli::LogLevel::as_str)
        .unwrap_or(&logging.level);
    setup_logging(log_level, cli.json_logs || logging.is_json());

    let config = loaded
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    // Execute command
    match cli.command {
        Commands::Scan(args) => cli::commands::scan::run(args, &config).await,
        Commands::Stream(args) => cli::commands::stream::run(args, &config).await,
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config, &config).await,
    }
}
