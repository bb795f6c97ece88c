//! Window summary statistics.

use analytics_core::types::DayRecord;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::number::{round_to, serialize_number_map};
use crate::schema::{MetricSchema, RatioScale};

/// Prefix for per-day averages in the flattened output.
pub const AVERAGE_PREFIX: &str = "average_daily_";

/// Totals, averages and derived ratios over a window of days.
///
/// Payload field names only ever appear as keys inside `totals`,
/// `averages` and `ratios`, so they cannot shadow the window fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct WindowSummary {
    /// Number of days in the window
    pub days: usize,
    /// First date in the window
    pub start_date: Option<NaiveDate>,
    /// Last date in the window
    pub end_date: Option<NaiveDate>,
    /// Sum of every numeric field across the window
    #[serde(serialize_with = "serialize_number_map")]
    pub totals: BTreeMap<String, f64>,
    /// `average_daily_<field>` = total / days
    #[serde(serialize_with = "serialize_number_map")]
    pub averages: BTreeMap<String, f64>,
    /// Ratios derived from the totals
    #[serde(serialize_with = "serialize_number_map")]
    pub ratios: BTreeMap<String, f64>,
}

impl WindowSummary {
    /// Summarize a window of day records.
    pub fn compute(records: &[DayRecord], schema: &MetricSchema) -> Self {
        let mut totals: BTreeMap<String, f64> = BTreeMap::new();
        let mut start_date = None;
        let mut end_date = None;

        for record in records {
            for (field, value) in record.payload.numeric_fields() {
                // Ratios are recomputed from totals, never summed
                if schema.is_ratio(field) {
                    continue;
                }
                *totals.entry(field.to_string()).or_insert(0.0) += value;
            }

            if start_date.map_or(true, |d| record.date < d) {
                start_date = Some(record.date);
            }
            if end_date.map_or(true, |d| record.date > d) {
                end_date = Some(record.date);
            }
        }

        // Schema fields absent from every payload still report zero
        for ratio in &schema.ratios {
            totals.entry(ratio.numerator.clone()).or_insert(0.0);
            for field in &ratio.denominator {
                totals.entry(field.clone()).or_insert(0.0);
            }
        }
        for chart in &schema.charts {
            totals.entry(chart.field.clone()).or_insert(0.0);
        }

        let days = records.len();
        let averages = totals
            .iter()
            .map(|(field, total)| {
                let avg = if days > 0 {
                    round_to(total / days as f64, 1)
                } else {
                    0.0
                };
                (format!("{}{}", AVERAGE_PREFIX, field), avg)
            })
            .collect();

        let ratios = schema
            .ratios
            .iter()
            .map(|spec| {
                let numerator = totals.get(&spec.numerator).copied().unwrap_or(0.0);
                let denominator: f64 = spec
                    .denominator
                    .iter()
                    .map(|f| totals.get(f).copied().unwrap_or(0.0))
                    .sum();

                let value = if denominator == 0.0 {
                    0.0
                } else {
                    match spec.scale {
                        RatioScale::Percent => round_to(numerator / denominator * 100.0, 0),
                        RatioScale::Plain => round_to(numerator / denominator, 1),
                    }
                };
                (spec.name.clone(), value)
            })
            .collect();

        Self {
            days,
            start_date,
            end_date,
            totals,
            averages,
            ratios,
        }
    }

    /// Window total for a field, zero if absent.
    pub fn total(&self, field: &str) -> f64 {
        self.totals.get(field).copied().unwrap_or(0.0)
    }

    /// Daily average for a field, zero if absent.
    pub fn average(&self, field: &str) -> f64 {
        self.averages
            .get(&format!("{}{}", AVERAGE_PREFIX, field))
            .copied()
            .unwrap_or(0.0)
    }

    /// Derived ratio, zero if absent.
    pub fn ratio(&self, name: &str) -> f64 {
        self.ratios.get(name).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics_core::types::{DayPayload, RecordOrigin};
    use serde_json::json;

    fn record(date: &str, payload: DayPayload) -> DayRecord {
        DayRecord::new(date.parse().unwrap(), payload, RecordOrigin::Fetched)
    }

    #[test]
    fn test_two_day_call_window() {
        let records = vec![
            record(
                "2025-10-08",
                DayPayload::new().with("total_calls", 10).with("answered_calls", 8),
            ),
            record(
                "2025-10-09",
                DayPayload::new().with("total_calls", 20).with("answered_calls", 15),
            ),
        ];

        let summary = WindowSummary::compute(&records, &MetricSchema::calls());

        assert_eq!(summary.days, 2);
        assert_eq!(summary.total("total_calls"), 30.0);
        assert_eq!(summary.total("answered_calls"), 23.0);
        assert_eq!(summary.ratio("overall_answer_rate"), 77.0);
        assert_eq!(summary.average("total_calls"), 15.0);
        assert_eq!(summary.average("answered_calls"), 11.5);
        assert_eq!(summary.start_date, "2025-10-08".parse::<NaiveDate>().ok());
        assert_eq!(summary.end_date, "2025-10-09".parse::<NaiveDate>().ok());

        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["totals"]["total_calls"], json!(30));
        assert_eq!(value["totals"]["answered_calls"], json!(23));
        assert_eq!(value["averages"]["average_daily_answered_calls"], json!(11.5));
        assert_eq!(value["ratios"]["overall_answer_rate"], json!(77));
        assert_eq!(value["start_date"], json!("2025-10-08"));
    }

    #[test]
    fn test_zero_calls_gives_zero_rate() {
        let records = vec![
            record("2025-10-08", DayPayload::new().with("total_calls", 0)),
            record("2025-10-09", DayPayload::new()),
        ];

        let summary = WindowSummary::compute(&records, &MetricSchema::calls());
        assert_eq!(summary.ratio("overall_answer_rate"), 0.0);
        assert_eq!(summary.ratio("average_call_duration_secs"), 0.0);
        assert!(summary.ratios.values().all(|v| v.is_finite()));
    }

    #[test]
    fn test_empty_window() {
        let summary = WindowSummary::compute(&[], &MetricSchema::tickets());
        assert_eq!(summary.days, 0);
        assert_eq!(summary.start_date, None);
        assert_eq!(summary.total("total_tickets"), 0.0);
        assert_eq!(summary.average("total_tickets"), 0.0);
        assert_eq!(summary.ratio("resolution_rate"), 0.0);
    }

    #[test]
    fn test_sums_unknown_fields_and_skips_text() {
        let records = vec![
            record(
                "2025-10-08",
                DayPayload::new().with("escalations", 2).with("note", "busy"),
            ),
            record("2025-10-09", DayPayload::new().with("escalations", 3)),
        ];

        let summary = WindowSummary::compute(&records, &MetricSchema::bare("custom"));
        assert_eq!(summary.total("escalations"), 5.0);
        assert!(!summary.totals.contains_key("note"));
    }

    #[test]
    fn test_payload_ratio_fields_are_recomputed() {
        let records = vec![
            record(
                "2025-10-08",
                DayPayload::new()
                    .with("total_calls", 4)
                    .with("answered_calls", 1)
                    .with("overall_answer_rate", 25),
            ),
            record(
                "2025-10-09",
                DayPayload::new()
                    .with("total_calls", 4)
                    .with("answered_calls", 3)
                    .with("overall_answer_rate", 75),
            ),
        ];

        let summary = WindowSummary::compute(&records, &MetricSchema::calls());
        assert!(!summary.totals.contains_key("overall_answer_rate"));
        assert_eq!(summary.ratio("overall_answer_rate"), 50.0);
    }

    #[test]
    fn test_satisfaction_score_uses_both_ratings() {
        let records = vec![record(
            "2025-10-08",
            DayPayload::new()
                .with("satisfaction_good", 9)
                .with("satisfaction_bad", 1),
        )];

        let summary = WindowSummary::compute(&records, &MetricSchema::tickets());
        assert_eq!(summary.ratio("satisfaction_score"), 90.0);
    }

    #[test]
    fn test_payload_fields_cannot_shadow_window_fields() {
        let records = vec![
            record(
                "2025-10-08",
                DayPayload::new().with("total_calls", 3).with("days", 7),
            ),
            record(
                "2025-10-09",
                DayPayload::new().with("total_calls", 5).with("days", 7),
            ),
        ];

        let summary = WindowSummary::compute(&records, &MetricSchema::calls());
        let json = serde_json::to_string(&summary).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(json.matches("\"days\":").count(), 2);
        assert_eq!(value["days"], json!(2));
        assert_eq!(value["totals"]["days"], json!(14));
        assert_eq!(value["averages"]["average_daily_days"], json!(7));
    }
}
