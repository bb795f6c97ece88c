//! Core traits for the analytics system.

mod clock;
mod fetcher;

pub use clock::{Clock, ManualClock, SystemClock};
pub use fetcher::DayFetcher;
