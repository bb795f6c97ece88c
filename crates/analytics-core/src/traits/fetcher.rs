//! Data fetcher trait definitions.

use crate::error::FetchError;
use crate::types::DayPayload;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Trait for sources that compute the analytics payload for one day.
///
/// The cache layer only calls this on a miss or a stale entry; it never
/// knows how a payload is produced.
#[async_trait]
pub trait DayFetcher: Send + Sync {
    /// Fetch the payload for a calendar date.
    ///
    /// # Arguments
    /// * `date` - The local calendar date to compute
    ///
    /// # Returns
    /// The payload for that date, or the error that prevented computing it
    async fn fetch_day(&self, date: NaiveDate) -> Result<DayPayload, FetchError>;

    /// Payload that stands in for a day whose fetch failed.
    fn empty_payload(&self) -> DayPayload {
        DayPayload::new()
    }

    /// Get the fetcher name.
    fn name(&self) -> &str;
}
