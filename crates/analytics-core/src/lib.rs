//! Core types and traits for day-bucketed support analytics.
//!
//! This crate provides the foundational building blocks including:
//! - Day keys and rolling date windows
//! - Per-day analytics payloads (opaque and typed)
//! - Core traits for data fetchers and clocks

pub mod types;
pub mod traits;
pub mod error;

pub use error::{AnalyticsError, AnalyticsResult};
pub use types::*;
pub use traits::*;
