//! Cached analytics over rolling windows.

use analytics_aggregate::{AnalyticsReport, MetricSchema};
use analytics_core::error::{AnalyticsError, FetchError};
use analytics_core::traits::{Clock, DayFetcher};
use analytics_core::types::{rolling_window, DayPayload, DayRecord, RecordOrigin};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::freshness::FreshnessDecision;
use crate::store::{CacheStats, DayCacheStore};

/// What to do when fetching one day of a window fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchFailureMode {
    /// Use the fetcher's zeroed payload for that day and keep going
    #[default]
    Substitute,
    /// Fail the whole window
    Abort,
}

/// Serves per-day analytics from a [`DayCacheStore`], fetching on miss.
pub struct AnalyticsCacheService {
    schema: MetricSchema,
    store: Mutex<DayCacheStore>,
    fetcher: Arc<dyn DayFetcher>,
    clock: Arc<dyn Clock>,
    fetch_delay: Duration,
    failure_mode: FetchFailureMode,
}

impl AnalyticsCacheService {
    /// Create a service with no fetch delay.
    ///
    /// Freshness follows the store's [`FreshnessPolicy`](crate::FreshnessPolicy).
    pub fn new(
        schema: MetricSchema,
        store: DayCacheStore,
        fetcher: Arc<dyn DayFetcher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            schema,
            store: Mutex::new(store),
            fetcher,
            clock,
            fetch_delay: Duration::ZERO,
            failure_mode: FetchFailureMode::default(),
        }
    }

    /// Pause between upstream fetches within a window.
    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = delay;
        self
    }

    /// Set how per-day fetch failures are handled.
    pub fn with_failure_mode(mut self, mode: FetchFailureMode) -> Self {
        self.failure_mode = mode;
        self
    }

    /// Payload for one date, from the cache when fresh, otherwise fetched and stored.
    pub async fn get_day(
        &self,
        date: NaiveDate,
        force_refresh: bool,
    ) -> Result<DayRecord, FetchError> {
        let now = self.clock.now();
        let today = self.clock.today();

        let (cached, policy) = {
            let store = self.store.lock().unwrap();
            (store.entry(date).cloned(), store.policy())
        };

        let decision = policy.decide(
            date,
            today,
            cached.as_ref().map(|e| e.cached_at),
            now,
            force_refresh,
        );

        if let (FreshnessDecision::ServeCached, Some(entry)) = (decision, cached) {
            debug!(kind = %self.schema.kind, %date, "Serving cached day");
            return Ok(DayRecord::new(date, entry.data, RecordOrigin::Cached));
        }

        debug!(
            kind = %self.schema.kind,
            %date,
            decision = ?decision,
            fetcher = self.fetcher.name(),
            "Fetching day"
        );
        let payload = self.fetcher.fetch_day(date).await?;

        self.store.lock().unwrap().set(date, payload.clone());

        Ok(DayRecord::new(date, payload, RecordOrigin::Fetched))
    }

    /// Day records for the `days` dates ending today, oldest first.
    pub async fn load_window(
        &self,
        days: u32,
        force_refresh: bool,
    ) -> Result<Vec<DayRecord>, AnalyticsError> {
        let today = self.clock.today();
        self.load_window_ending(today, days, force_refresh).await
    }

    async fn load_window_ending(
        &self,
        today: NaiveDate,
        days: u32,
        force_refresh: bool,
    ) -> Result<Vec<DayRecord>, AnalyticsError> {
        if days == 0 {
            return Err(AnalyticsError::Validation(
                "window must cover at least one day".to_string(),
            ));
        }

        let dates = rolling_window(today, days);
        let mut records = Vec::with_capacity(dates.len());

        for (i, date) in dates.iter().copied().enumerate() {
            let record = match self.get_day(date, force_refresh).await {
                Ok(record) => record,
                Err(e) => match self.failure_mode {
                    FetchFailureMode::Abort => return Err(e.into()),
                    FetchFailureMode::Substitute => {
                        warn!(
                            kind = %self.schema.kind,
                            %date,
                            error = %e,
                            "Fetch failed, substituting empty day"
                        );
                        DayRecord::new(date, self.fetcher.empty_payload(), RecordOrigin::Substituted)
                    }
                },
            };

            let hit_upstream = !record.is_cache_hit();
            records.push(record);

            if hit_upstream && i + 1 < dates.len() && !self.fetch_delay.is_zero() {
                tokio::time::sleep(self.fetch_delay).await;
            }
        }

        let hits = records.iter().filter(|r| r.is_cache_hit()).count();
        info!(
            kind = %self.schema.kind,
            days,
            cache_hits = hits,
            fetched = records.len() - hits,
            "Loaded analytics window"
        );

        Ok(records)
    }

    /// Load a window and aggregate it.
    pub async fn report(
        &self,
        days: u32,
        force_refresh: bool,
    ) -> Result<AnalyticsReport, AnalyticsError> {
        let today = self.clock.today();
        let records = self.load_window_ending(today, days, force_refresh).await?;
        Ok(AnalyticsReport::build(
            &self.schema,
            records,
            today,
            self.clock.now(),
        ))
    }

    /// Cached payload for a date without consulting freshness.
    pub fn cached(&self, date: NaiveDate) -> Option<DayPayload> {
        self.store.lock().unwrap().get(date).cloned()
    }

    pub fn stats(&self) -> CacheStats {
        self.store.lock().unwrap().stats()
    }

    pub fn clear(&self, date: NaiveDate) {
        self.store.lock().unwrap().clear(date);
    }

    pub fn clear_all(&self) {
        self.store.lock().unwrap().clear_all();
    }
}
