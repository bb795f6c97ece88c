//! Core data types for the analytics system.

mod day;
mod metrics;
mod payload;
mod record;

pub use day::{format_day_key, parse_day_key, rolling_window, DAY_KEY_FORMAT};
pub use metrics::{CallDayMetrics, TicketDayMetrics};
pub use payload::DayPayload;
pub use record::{DayRecord, RecordOrigin};
