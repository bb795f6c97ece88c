//! Calls and tickets report commands.

use analytics_config::AppConfig;
use anyhow::{Context, Result};
use tracing::info;

use crate::cli::{build_service, Kind, OutputFormat, ReportArgs};

pub async fn run(kind: Kind, args: ReportArgs, config: &AppConfig) -> Result<()> {
    info!(
        ?kind,
        days = args.days,
        force_refresh = args.force_refresh,
        "Building analytics report"
    );

    let service = build_service(kind, config, args.fixture.as_deref())?;
    let report = service
        .report(args.days, args.force_refresh)
        .await
        .context("Failed to load analytics window")?;

    match args.output {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Text => println!("{}", report.summary()),
    }

    if let Some(save_path) = &args.save {
        std::fs::write(save_path, report.to_json()?)
            .with_context(|| format!("Failed to write {}", save_path.display()))?;
        info!("Report saved to {:?}", save_path);
    }

    if let Some(csv_path) = &args.csv {
        std::fs::write(csv_path, report.series_to_csv()?)
            .with_context(|| format!("Failed to write {}", csv_path.display()))?;
        info!("Chart series saved to {:?}", csv_path);
    }

    Ok(())
}
