//! Window summaries, chart series and reports over per-day analytics.

mod number;
mod report;
mod schema;
mod series;
mod summary;

pub use report::AnalyticsReport;
pub use schema::{ChartMetric, MetricSchema, RatioScale, RatioSpec};
pub use series::{day_label, ChartSeries, Series};
pub use summary::WindowSummary;
