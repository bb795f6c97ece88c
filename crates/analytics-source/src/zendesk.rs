//! Zendesk day fetchers for ticket and call analytics.

use analytics_core::error::FetchError;
use analytics_core::traits::DayFetcher;
use analytics_core::types::{format_day_key, CallDayMetrics, DayPayload, TicketDayMetrics};
use async_trait::async_trait;
use chrono::{DateTime, Days, Local, NaiveDate, TimeZone};
use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::classify::{CallClassifier, TalkCall};

/// Upper bound on incremental export pages read for a single day.
const MAX_CALL_PAGES: usize = 50;

/// Zendesk API configuration.
#[derive(Debug, Clone)]
pub struct ZendeskConfig {
    pub subdomain: String,
    pub email: String,
    pub api_token: String,
    pub timeout: Duration,
    base_url: Option<String>,
}

impl ZendeskConfig {
    /// Create config for `https://{subdomain}.zendesk.com`.
    pub fn new(subdomain: String, email: String, api_token: String) -> Self {
        Self {
            subdomain,
            email,
            api_token,
            timeout: Duration::from_secs(30),
            base_url: None,
        }
    }

    /// Point the client at another host, e.g. a proxy.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}.zendesk.com", self.subdomain),
        }
    }

    fn validate(&self) -> Result<(), FetchError> {
        if self.base_url.is_none() && self.subdomain.trim().is_empty() {
            return Err(FetchError::Configuration("Zendesk subdomain not set".into()));
        }
        if self.email.trim().is_empty() {
            return Err(FetchError::Configuration("Zendesk email not set".into()));
        }
        if self.api_token.trim().is_empty() {
            return Err(FetchError::Configuration("Zendesk API token not set".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct SearchCountResponse {
    count: u64,
}

#[derive(Debug, Deserialize)]
struct TalkCallsPage {
    #[serde(default)]
    calls: Vec<TalkCall>,
    next_page: Option<String>,
    end_time: Option<i64>,
}

/// Zendesk REST client.
pub struct ZendeskClient {
    config: ZendeskConfig,
    client: Client,
}

impl ZendeskClient {
    /// Create a new client.
    pub fn new(config: ZendeskConfig) -> Result<Self, FetchError> {
        config.validate()?;

        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::Connection(e.to_string()))?;

        Ok(Self { config, client })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let resp = self
            .client
            .get(url)
            .basic_auth(format!("{}/token", self.config.email), Some(&self.config.api_token))
            .query(params)
            .send()
            .await
            .map_err(|e| FetchError::Connection(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let retry_after = resp
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok());
            let text = resp.text().await.unwrap_or_default();
            return Err(status_error(status, retry_after, text));
        }

        resp.json().await.map_err(|e| FetchError::Parse(e.to_string()))
    }

    /// Number of search results for a query.
    pub async fn search_count(&self, query: &str) -> Result<u64, FetchError> {
        let url = format!("{}/api/v2/search/count", self.config.base_url());
        let data: SearchCountResponse = self
            .get_json(&url, &[("query", query.to_string())])
            .await?;
        debug!(query, count = data.count, "Zendesk search count");
        Ok(data.count)
    }

    async fn calls_page(&self, url: &str, start_time: Option<i64>) -> Result<TalkCallsPage, FetchError> {
        match start_time {
            Some(ts) => self.get_json(url, &[("start_time", ts.to_string())]).await,
            None => self.get_json(url, &[]).await,
        }
    }

    /// Tally every call created inside `[start, end)`.
    ///
    /// Fails rather than returning a partial day when the export still has
    /// pages left after [`MAX_CALL_PAGES`].
    async fn call_metrics(
        &self,
        start: i64,
        end: i64,
        classifier: CallClassifier,
    ) -> Result<CallDayMetrics, FetchError> {
        let mut metrics = CallDayMetrics::default();
        let mut url = format!(
            "{}/api/v2/channels/voice/stats/incremental/calls",
            self.config.base_url()
        );
        let mut start_time = Some(start);

        for page_no in 0..MAX_CALL_PAGES {
            let page = self.calls_page(&url, start_time).await?;
            let mut past_end = false;

            for call in &page.calls {
                let Some(ts) = call.created_at.as_deref().and_then(parse_timestamp) else {
                    continue;
                };
                if ts >= end {
                    past_end = true;
                    continue;
                }
                if ts >= start {
                    classifier.tally(&mut metrics, call);
                }
            }

            debug!(page = page_no, calls = page.calls.len(), "Talk incremental page");

            let exhausted = page.calls.is_empty() || page.end_time.map_or(false, |t| t >= end);
            match page.next_page {
                Some(next) if !past_end && !exhausted => {
                    url = next;
                    start_time = None;
                }
                _ => return Ok(metrics),
            }
        }

        Err(FetchError::Incomplete(format!(
            "Talk export still paging after {} pages",
            MAX_CALL_PAGES
        )))
    }
}

fn status_error(status: StatusCode, retry_after: Option<u64>, body: String) -> FetchError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            FetchError::Authentication(format!("{}: {}", status, body))
        }
        StatusCode::TOO_MANY_REQUESTS => FetchError::RateLimited {
            retry_after_secs: retry_after.unwrap_or(60),
        },
        _ => FetchError::Api {
            status: status.as_u16(),
            message: body,
        },
    }
}

fn parse_timestamp(s: &str) -> Option<i64> {
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.timestamp())
}

/// Unix bounds `[start, end)` of a local calendar day.
fn local_day_bounds(date: NaiveDate) -> Result<(i64, i64), FetchError> {
    let start_of = |d: NaiveDate| {
        d.and_hms_opt(0, 0, 0)
            .and_then(|naive| Local.from_local_datetime(&naive).earliest())
            .map(|dt| dt.timestamp())
            .ok_or_else(|| FetchError::Parse(format!("no local midnight for {}", d)))
    };
    let next = date
        .checked_add_days(Days::new(1))
        .ok_or_else(|| FetchError::Parse(format!("date out of range: {}", date)))?;
    Ok((start_of(date)?, start_of(next)?))
}

/// One search count and the ticket metric it fills.
struct TicketQuery {
    query: String,
    apply: fn(&mut TicketDayMetrics, u64),
}

/// Search queries for one day of ticket metrics.
fn ticket_queries(date: NaiveDate) -> [TicketQuery; 5] {
    let day = format_day_key(date);
    [
        TicketQuery {
            query: format!("type:ticket created:{}", day),
            apply: |m, n| m.total_tickets = n,
        },
        TicketQuery {
            query: format!("type:ticket solved:{}", day),
            apply: |m, n| m.solved_tickets = n,
        },
        TicketQuery {
            query: format!("type:ticket created:{} via:voice", day),
            apply: |m, n| m.voice_tickets = n,
        },
        TicketQuery {
            query: format!("type:ticket created:{} satisfaction:good", day),
            apply: |m, n| m.satisfaction_good = n,
        },
        TicketQuery {
            query: format!("type:ticket created:{} satisfaction:bad", day),
            apply: |m, n| m.satisfaction_bad = n,
        },
    ]
}

/// Ticket metrics from the search count API.
pub struct TicketDayFetcher {
    client: Arc<ZendeskClient>,
}

impl TicketDayFetcher {
    pub fn new(client: Arc<ZendeskClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DayFetcher for TicketDayFetcher {
    async fn fetch_day(&self, date: NaiveDate) -> Result<DayPayload, FetchError> {
        let mut metrics = TicketDayMetrics::default();

        for TicketQuery { query, apply } in ticket_queries(date) {
            let count = self.client.search_count(&query).await?;
            apply(&mut metrics, count);
        }

        Ok(metrics.to_payload())
    }

    fn empty_payload(&self) -> DayPayload {
        TicketDayMetrics::default().to_payload()
    }

    fn name(&self) -> &str {
        "Zendesk Tickets"
    }
}

/// Call metrics from the Talk incremental calls export.
pub struct CallDayFetcher {
    client: Arc<ZendeskClient>,
    classifier: CallClassifier,
}

impl CallDayFetcher {
    pub fn new(client: Arc<ZendeskClient>, classifier: CallClassifier) -> Self {
        Self { client, classifier }
    }
}

#[async_trait]
impl DayFetcher for CallDayFetcher {
    async fn fetch_day(&self, date: NaiveDate) -> Result<DayPayload, FetchError> {
        let (start, end) = local_day_bounds(date)?;
        let metrics = self.client.call_metrics(start, end, self.classifier).await?;
        Ok(metrics.to_payload())
    }

    fn empty_payload(&self) -> DayPayload {
        CallDayMetrics::default().to_payload()
    }

    fn name(&self) -> &str {
        "Zendesk Talk"
    }
}
