//! Support analytics CLI application.

mod cli;

use analytics_config::{load_config_optional, AppConfig};
use analytics_monitor::setup_logging;
use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, Kind};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // These two report on the file themselves
    let config = match &cli.command {
        Commands::ValidateConfig | Commands::InitConfig(_) => AppConfig::default(),
        _ => load_config_optional(&cli.config)?,
    };

    // Setup logging
    let log_level = cli
        .log_level
        .map(|l| l.as_str().to_string())
        .unwrap_or_else(|| config.logging.level.clone());
    let json_logs = cli.json_logs || config.logging.format == "json";
    let _guard = setup_logging(&log_level, json_logs, config.logging.file.as_deref());

    // Execute command
    match cli.command {
        Commands::Calls(args) => cli::commands::report::run(Kind::Calls, args, &config).await,
        Commands::Tickets(args) => cli::commands::report::run(Kind::Tickets, args, &config).await,
        Commands::Cache(args) => cli::commands::cache::run(args, &config).await,
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config).await,
        Commands::InitConfig(args) => cli::commands::init_config::run(args).await,
    }
}
