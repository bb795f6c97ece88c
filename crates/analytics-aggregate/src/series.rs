//! Chart-ready series.

use analytics_core::types::DayRecord;
use chrono::NaiveDate;
use serde::Serialize;

use crate::number::serialize_numbers;
use crate::schema::MetricSchema;

/// Human-readable label for a day relative to `today`.
///
/// `"Today"`, `"Yesterday"`, otherwise e.g. `"Wed, Oct 8"`.
pub fn day_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "Today".to_string()
    } else if today.pred_opt() == Some(date) {
        "Yesterday".to_string()
    } else {
        date.format("%a, %b %-d").to_string()
    }
}

/// One plotted metric, one point per day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub field: String,
    #[serde(serialize_with = "serialize_numbers")]
    pub data: Vec<f64>,
}

/// Day categories plus one series per chart metric.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ChartSeries {
    pub categories: Vec<String>,
    pub series: Vec<Series>,
}

impl ChartSeries {
    /// Build chart data in chronological order.
    pub fn build(records: &[DayRecord], schema: &MetricSchema, today: NaiveDate) -> Self {
        let mut ordered: Vec<&DayRecord> = records.iter().collect();
        ordered.sort_by_key(|r| r.date);

        let categories = ordered.iter().map(|r| day_label(r.date, today)).collect();

        let series = schema
            .charts
            .iter()
            .map(|metric| Series {
                name: metric.label.clone(),
                field: metric.field.clone(),
                data: ordered
                    .iter()
                    .map(|r| r.payload.metric_or_zero(&metric.field))
                    .collect(),
            })
            .collect();

        Self { categories, series }
    }

    /// Look up a series by payload field.
    pub fn series(&self, field: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.field == field)
    }
}
