//! Day-bucketed analytics cache.
//!
//! One JSON file per cache holds a payload per calendar date. Past days are
//! served until they pass the staleness threshold; today's entry goes stale
//! after a much shorter window because the day is still filling up.

mod freshness;
mod service;
mod store;

pub use freshness::{FreshnessDecision, FreshnessPolicy, RefetchReason};
pub use service::{AnalyticsCacheService, FetchFailureMode};
pub use store::{CacheEntry, CacheStats, DayCacheStore, CACHE_FORMAT_VERSION};
