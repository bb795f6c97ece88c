//! Analytics report generation.

use analytics_core::error::AnalyticsError;
use analytics_core::types::{format_day_key, DayRecord};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::number::display;
use crate::schema::{MetricSchema, RatioScale};
use crate::series::{day_label, ChartSeries};
use crate::summary::WindowSummary;

const RULE: &str = "═══════════════════════════════════════════════════════════\n";
const THIN_RULE: &str = "───────────────────────────────────────────────────────────\n";

/// Complete analytics report for a rolling window.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    /// Analytics kind, e.g. `calls`
    pub kind: String,
    /// When the report was assembled
    pub generated_at: DateTime<Utc>,
    /// Date the labels are relative to
    pub today: NaiveDate,
    /// Window totals and rates
    pub summary: WindowSummary,
    /// Chart-ready series
    pub chart: ChartSeries,
    /// Per-day records, oldest first
    pub days: Vec<DayRecord>,
    #[serde(skip)]
    schema: MetricSchema,
}

impl AnalyticsReport {
    /// Aggregate a window of day records.
    pub fn build(
        schema: &MetricSchema,
        mut records: Vec<DayRecord>,
        today: NaiveDate,
        generated_at: DateTime<Utc>,
    ) -> Self {
        records.sort_by_key(|r| r.date);
        let summary = WindowSummary::compute(&records, schema);
        let chart = ChartSeries::build(&records, schema, today);

        Self {
            kind: schema.kind.clone(),
            generated_at,
            today,
            summary,
            chart,
            days: records,
            schema: schema.clone(),
        }
    }

    /// Number of days served from the cache.
    pub fn cache_hits(&self) -> usize {
        self.days.iter().filter(|r| r.is_cache_hit()).count()
    }

    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let mut s = String::new();

        s.push_str(RULE);
        s.push_str(&format!(
            "{:^59}\n",
            format!("{} ANALYTICS ({} DAYS)", self.kind.to_uppercase(), self.summary.days)
        ));
        s.push_str(RULE);
        s.push('\n');

        s.push_str("WINDOW\n");
        s.push_str(THIN_RULE);
        let range = match (self.summary.start_date, self.summary.end_date) {
            (Some(start), Some(end)) => format!("{} → {}", format_day_key(start), format_day_key(end)),
            _ => "empty".to_string(),
        };
        s.push_str(&format!("  {:<28}{}\n", "Dates:", range));
        s.push_str(&format!(
            "  {:<28}{}/{}\n",
            "Served from cache:",
            self.cache_hits(),
            self.days.len()
        ));
        s.push('\n');

        s.push_str("TOTALS\n");
        s.push_str(THIN_RULE);
        for (field, total) in &self.summary.totals {
            s.push_str(&format!(
                "  {:<28}{:>10}   (avg {}/day)\n",
                format!("{}:", title_case(field)),
                display(*total),
                display(self.summary.average(field))
            ));
        }
        s.push('\n');

        if !self.summary.ratios.is_empty() {
            s.push_str("RATES\n");
            s.push_str(THIN_RULE);
            for spec in &self.schema.ratios {
                let value = self.summary.ratio(&spec.name);
                let suffix = match spec.scale {
                    RatioScale::Percent => "%",
                    RatioScale::Plain => "",
                };
                s.push_str(&format!(
                    "  {:<28}{:>10}{}\n",
                    format!("{}:", title_case(&spec.name)),
                    display(value),
                    suffix
                ));
            }
            s.push('\n');
        }

        if !self.schema.charts.is_empty() {
            s.push_str("DAILY BREAKDOWN\n");
            s.push_str(THIN_RULE);
            s.push_str(&format!("  {:<14}", "Day"));
            for metric in &self.schema.charts {
                s.push_str(&format!("{:>12}", metric.label));
            }
            s.push('\n');
            for record in &self.days {
                s.push_str(&format!("  {:<14}", day_label(record.date, self.today)));
                for metric in &self.schema.charts {
                    s.push_str(&format!(
                        "{:>12}",
                        display(record.payload.metric_or_zero(&metric.field))
                    ));
                }
                s.push('\n');
            }
            s.push('\n');
        }

        s.push_str(RULE);

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export the chart series to CSV, one row per day.
    pub fn series_to_csv(&self) -> Result<String, AnalyticsError> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        let mut header = vec!["date".to_string(), "label".to_string()];
        header.extend(self.schema.charts.iter().map(|m| m.field.clone()));
        writer
            .write_record(&header)
            .map_err(|e| AnalyticsError::Serialization(e.to_string()))?;

        for record in &self.days {
            let mut row = vec![format_day_key(record.date), day_label(record.date, self.today)];
            row.extend(
                self.schema
                    .charts
                    .iter()
                    .map(|m| display(record.payload.metric_or_zero(&m.field))),
            );
            writer
                .write_record(&row)
                .map_err(|e| AnalyticsError::Serialization(e.to_string()))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| AnalyticsError::Serialization(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| AnalyticsError::Serialization(e.to_string()))
    }
}

/// `answered_calls` → `Answered Calls`
fn title_case(field: &str) -> String {
    field
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
