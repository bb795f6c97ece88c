//! CLI definitions.

pub mod commands;
mod services;

pub use services::{build_service, open_store};

use analytics_core::types::parse_day_key;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "analytics")]
#[command(author, version, about = "Day-bucketed support analytics for Zendesk tickets and calls")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level (defaults to logging.level from the config file)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Which analytics cache a command works on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    Calls,
    Tickets,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Call analytics over a rolling window
    Calls(ReportArgs),
    /// Ticket analytics over a rolling window
    Tickets(ReportArgs),
    /// Inspect or clear an analytics cache
    Cache(CacheArgs),
    /// Validate configuration
    ValidateConfig,
    /// Write the default configuration
    InitConfig(InitConfigArgs),
}

#[derive(clap::Args)]
pub struct ReportArgs {
    /// Number of days ending today
    #[arg(short, long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..=366))]
    pub days: u32,

    /// Ignore cached entries and refetch every day
    #[arg(short, long)]
    pub force_refresh: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Save the JSON report to a file
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Save the chart series to a CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Read day payloads from a JSON fixture instead of Zendesk
    #[arg(long)]
    pub fixture: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct CacheArgs {
    /// Cache to operate on
    #[arg(short, long, value_enum)]
    pub kind: Kind,

    #[command(subcommand)]
    pub action: CacheAction,
}

#[derive(Subcommand)]
pub enum CacheAction {
    /// Show entry counts and freshness
    Stats,
    /// Remove one day's entry
    Clear {
        /// Day to remove (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,
    },
    /// Remove every entry
    ClearAll,
}

#[derive(clap::Args)]
pub struct InitConfigArgs {
    /// Where to write the file (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    parse_day_key(s).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_report_args() {
        let cli = Cli::try_parse_from(["analytics", "calls", "--days", "30", "--force-refresh"]).unwrap();
        match cli.command {
            Commands::Calls(args) => {
                assert_eq!(args.days, 30);
                assert!(args.force_refresh);
                assert_eq!(args.output, OutputFormat::Text);
            }
            _ => panic!("expected calls"),
        }
    }

    #[test]
    fn test_rejects_zero_days() {
        assert!(Cli::try_parse_from(["analytics", "tickets", "--days", "0"]).is_err());
    }

    #[test]
    fn test_parse_cache_clear() {
        let cli = Cli::try_parse_from([
            "analytics", "cache", "--kind", "tickets", "clear", "--date", "2025-10-08",
        ])
        .unwrap();
        match cli.command {
            Commands::Cache(CacheArgs {
                kind: Kind::Tickets,
                action: CacheAction::Clear { date },
            }) => assert_eq!(date, NaiveDate::from_ymd_opt(2025, 10, 8).unwrap()),
            _ => panic!("expected cache clear"),
        }
        assert!(Cli::try_parse_from([
            "analytics", "cache", "--kind", "calls", "clear", "--date", "08/10/2025",
        ])
        .is_err());
    }
}
