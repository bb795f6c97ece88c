//! Wiring from configuration to cache services.

use analytics_aggregate::MetricSchema;
use analytics_cache::{AnalyticsCacheService, DayCacheStore};
use analytics_config::AppConfig;
use analytics_core::traits::{Clock, DayFetcher, SystemClock};
use analytics_core::types::{CallDayMetrics, TicketDayMetrics};
use analytics_source::{CallDayFetcher, FixtureSource, TicketDayFetcher, ZendeskClient};
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use super::Kind;

/// Open the cache file for `kind` as configured.
pub fn open_store(kind: Kind, config: &AppConfig, clock: Arc<dyn Clock>) -> DayCacheStore {
    let path = match kind {
        Kind::Calls => config.cache.call_path(),
        Kind::Tickets => config.cache.ticket_path(),
    };
    DayCacheStore::open(path, clock).with_policy(config.cache.freshness_policy())
}

/// Build the cache service for `kind`.
///
/// With a fixture the service reads from that file into an in-memory store,
/// so fixture days never reach the Zendesk cache file and cached Zendesk
/// days never stand in for fixture data. Otherwise it talks to Zendesk using
/// the token named by `zendesk.api_token_env`.
pub fn build_service(
    kind: Kind,
    config: &AppConfig,
    fixture: Option<&Path>,
) -> Result<AnalyticsCacheService> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let (fetcher, store, fetch_delay): (Arc<dyn DayFetcher>, DayCacheStore, Duration) =
        match fixture {
            Some(path) => {
                let empty = match kind {
                    Kind::Calls => CallDayMetrics::default().to_payload(),
                    Kind::Tickets => TicketDayMetrics::default().to_payload(),
                };
                let source = FixtureSource::from_path(path)
                    .with_context(|| format!("Failed to load fixture {}", path.display()))?
                    .with_empty(empty);
                info!(path = %path.display(), days = source.len(), "Using fixture source");

                let store = DayCacheStore::in_memory(clock.clone())
                    .with_policy(config.cache.freshness_policy());
                (Arc::new(source), store, Duration::ZERO)
            }
            None => {
                let client = Arc::new(zendesk_client(config)?);
                let fetcher: Arc<dyn DayFetcher> = match kind {
                    Kind::Calls => Arc::new(CallDayFetcher::new(
                        client,
                        config.zendesk.call_classifier,
                    )),
                    Kind::Tickets => Arc::new(TicketDayFetcher::new(client)),
                };
                let store = open_store(kind, config, clock.clone());
                (fetcher, store, config.cache.fetch_delay())
            }
        };

    let schema = match kind {
        Kind::Calls => MetricSchema::calls(),
        Kind::Tickets => MetricSchema::tickets(),
    };

    Ok(AnalyticsCacheService::new(schema, store, fetcher, clock)
        .with_fetch_delay(fetch_delay)
        .with_failure_mode(config.cache.on_fetch_error))
}

fn zendesk_client(config: &AppConfig) -> Result<ZendeskClient> {
    let env_var = &config.zendesk.api_token_env;
    let token = std::env::var(env_var).with_context(|| {
        format!("Zendesk API token not set; export {} or pass --fixture", env_var)
    })?;

    ZendeskClient::new(config.zendesk.client_config(token))
        .context("Failed to create Zendesk client")
}
