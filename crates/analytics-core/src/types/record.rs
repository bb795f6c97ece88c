//! Per-day results handed from the cache layer to aggregation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::DayPayload;

/// Where a day's payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordOrigin {
    /// Served from the cache store
    Cached,
    /// Fetched from the data source and written back
    Fetched,
    /// Fetch failed; a zeroed payload stands in and was not cached
    Substituted,
}

/// One day of analytics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub payload: DayPayload,
    pub origin: RecordOrigin,
}

impl DayRecord {
    /// Create a new record.
    pub fn new(date: NaiveDate, payload: DayPayload, origin: RecordOrigin) -> Self {
        Self {
            date,
            payload,
            origin,
        }
    }

    /// Whether the payload was served without touching the data source.
    pub fn is_cache_hit(&self) -> bool {
        self.origin == RecordOrigin::Cached
    }
}
