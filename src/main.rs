//! KPI engine CLI entry point.

use clap::Parser;

use kpi_engine::cli::{commands, handle_error, Cli, Commands};
use kpi_engine::infrastructure::config::ConfigLoader;
use kpi_engine::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ConfigLoader::load() {
        Ok(config) => config,
        Err(err) => handle_error(err, cli.json),
    };

    let _logger = match LoggerImpl::init(&LogConfig::from(&config.logging)) {
        Ok(logger) => logger,
        Err(err) => handle_error(err, cli.json),
    };

    let result = match cli.command {
        Commands::Init(args) => commands::init::execute(args, &config, cli.json).await,
        Commands::Seed => commands::seed::execute(&config, cli.json).await,
        Commands::Snapshot(args) => commands::snapshot::execute(args, &config, cli.json).await,
    };

    if let Err(err) = result {
        handle_error(err, cli.json);
    }
}
