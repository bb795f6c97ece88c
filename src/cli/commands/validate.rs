//! Validate configuration command.

use analytics_config::load_config;
use anyhow::Result;
use std::path::Path;

pub async fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    match load_config(config_path) {
        Ok(config) => {
            println!("Configuration is valid!");
            println!();
            println!("App: {}", config.app.name);
            println!("Environment: {}", config.app.environment);
            println!("Log level: {}", config.logging.level);
            println!("Zendesk subdomain: {}", config.zendesk.subdomain);
            println!("Token variable: {}", config.zendesk.api_token_env);
            println!("Ticket cache: {}", config.cache.ticket_path().display());
            println!("Call cache: {}", config.cache.call_path().display());
            println!(
                "Freshness: {}s historical, {}s today",
                config.cache.staleness_threshold_secs, config.cache.today_window_secs
            );
            println!("On fetch error: {:?}", config.cache.on_fetch_error);
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
