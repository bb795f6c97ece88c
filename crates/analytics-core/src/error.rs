//! Error types for the analytics system.

use chrono::NaiveDate;
use thiserror::Error;

/// Top-level analytics error.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Cache store errors.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache serialization failed: {0}")]
    Serialization(String),

    #[error("Invalid day key: {0}")]
    InvalidDate(String),
}

/// Data fetch errors raised by a [`DayFetcher`](crate::traits::DayFetcher).
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("No data available for {0}")]
    NoData(NaiveDate),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limited: retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Incomplete data: {0}")]
    Incomplete(String),
}

/// Result type alias for analytics operations.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
