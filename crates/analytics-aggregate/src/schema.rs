//! Metric schemas: which ratios to derive and which fields to chart.

use serde::{Deserialize, Serialize};

/// How a derived ratio is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioScale {
    /// `round(100 * numerator / denominator)`
    Percent,
    /// `numerator / denominator`, one decimal place
    Plain,
}

/// A ratio derived from window totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioSpec {
    pub name: String,
    pub numerator: String,
    /// Fields summed to form the denominator
    pub denominator: Vec<String>,
    pub scale: RatioScale,
}

impl RatioSpec {
    /// Percentage of one field over another.
    pub fn percent(name: &str, numerator: &str, denominator: &str) -> Self {
        Self {
            name: name.to_string(),
            numerator: numerator.to_string(),
            denominator: vec![denominator.to_string()],
            scale: RatioScale::Percent,
        }
    }

    /// Plain quotient of one field over another.
    pub fn plain(name: &str, numerator: &str, denominator: &str) -> Self {
        Self {
            name: name.to_string(),
            numerator: numerator.to_string(),
            denominator: vec![denominator.to_string()],
            scale: RatioScale::Plain,
        }
    }

    /// Add another field to the denominator.
    pub fn plus_denominator(mut self, field: &str) -> Self {
        self.denominator.push(field.to_string());
        self
    }
}

/// A field plotted as a chart series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartMetric {
    pub field: String,
    pub label: String,
}

impl ChartMetric {
    pub fn new(field: &str, label: &str) -> Self {
        Self {
            field: field.to_string(),
            label: label.to_string(),
        }
    }
}

/// Describes how one kind of analytics is summarized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSchema {
    /// Short name, e.g. `calls`
    pub kind: String,
    pub ratios: Vec<RatioSpec>,
    pub charts: Vec<ChartMetric>,
}

impl MetricSchema {
    /// Schema with no derived ratios or charts. Totals and averages still apply.
    pub fn bare(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            ratios: Vec::new(),
            charts: Vec::new(),
        }
    }

    /// Voice channel analytics.
    pub fn calls() -> Self {
        Self {
            kind: "calls".to_string(),
            ratios: vec![
                RatioSpec::percent("overall_answer_rate", "answered_calls", "total_calls"),
                RatioSpec::percent("callback_rate", "callbacks", "total_calls"),
                RatioSpec::plain(
                    "average_call_duration_secs",
                    "total_duration_secs",
                    "answered_calls",
                ),
            ],
            charts: vec![
                ChartMetric::new("total_calls", "Total Calls"),
                ChartMetric::new("answered_calls", "Answered"),
                ChartMetric::new("unanswered_calls", "Unanswered"),
                ChartMetric::new("callbacks", "Callbacks"),
            ],
        }
    }

    /// Ticket analytics.
    pub fn tickets() -> Self {
        Self {
            kind: "tickets".to_string(),
            ratios: vec![
                RatioSpec::percent("resolution_rate", "solved_tickets", "total_tickets"),
                RatioSpec::percent("voice_ticket_share", "voice_tickets", "total_tickets"),
                RatioSpec::percent("satisfaction_score", "satisfaction_good", "satisfaction_good")
                    .plus_denominator("satisfaction_bad"),
            ],
            charts: vec![
                ChartMetric::new("total_tickets", "Total Tickets"),
                ChartMetric::new("solved_tickets", "Solved"),
                ChartMetric::new("voice_tickets", "Voice"),
            ],
        }
    }

    /// Builder-style ratio.
    pub fn with_ratio(mut self, ratio: RatioSpec) -> Self {
        self.ratios.push(ratio);
        self
    }

    /// Builder-style chart metric.
    pub fn with_chart(mut self, metric: ChartMetric) -> Self {
        self.charts.push(metric);
        self
    }

    /// Whether a field name is shadowed by a derived ratio.
    pub fn is_ratio(&self, field: &str) -> bool {
        self.ratios.iter().any(|r| r.name == field)
    }
}
