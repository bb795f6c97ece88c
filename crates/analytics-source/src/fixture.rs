//! Offline day source backed by a JSON document.

use analytics_core::error::FetchError;
use analytics_core::traits::DayFetcher;
use analytics_core::types::DayPayload;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::path::Path;

/// Serves payloads from a `{ "<YYYY-MM-DD>": { ...metrics } }` document.
///
/// Dates absent from the document fail with [`FetchError::NoData`].
pub struct FixtureSource {
    days: BTreeMap<NaiveDate, DayPayload>,
    empty: DayPayload,
}

impl FixtureSource {
    /// Load a fixture file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FetchError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| FetchError::Configuration(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }

    /// Parse a fixture document.
    pub fn from_json(content: &str) -> Result<Self, FetchError> {
        let days: BTreeMap<NaiveDate, DayPayload> =
            serde_json::from_str(content).map_err(|e| FetchError::Parse(e.to_string()))?;
        Ok(Self::from_days(days))
    }

    /// Build from in-memory payloads.
    pub fn from_days(days: BTreeMap<NaiveDate, DayPayload>) -> Self {
        Self {
            days,
            empty: DayPayload::new(),
        }
    }

    /// Payload used in place of a failed day.
    pub fn with_empty(mut self, empty: DayPayload) -> Self {
        self.empty = empty;
        self
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

#[async_trait]
impl DayFetcher for FixtureSource {
    async fn fetch_day(&self, date: NaiveDate) -> Result<DayPayload, FetchError> {
        self.days.get(&date).cloned().ok_or(FetchError::NoData(date))
    }

    fn empty_payload(&self) -> DayPayload {
        self.empty.clone()
    }

    fn name(&self) -> &str {
        "Fixture"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics_core::types::CallDayMetrics;
    use std::io::Write;

    const FIXTURE: &str = r#"{
        "2025-10-08": { "total_calls": 10, "answered_calls": 8 },
        "2025-10-09": { "total_calls": 20, "answered_calls": 15 }
    }"#;

    #[tokio::test]
    async fn test_serves_known_days() {
        let source = FixtureSource::from_json(FIXTURE).unwrap();
        let payload = source
            .fetch_day(NaiveDate::from_ymd_opt(2025, 10, 9).unwrap())
            .await
            .unwrap();

        assert_eq!(source.len(), 2);
        assert_eq!(payload.metric("answered_calls"), Some(15.0));
    }

    #[tokio::test]
    async fn test_unknown_day_is_no_data() {
        let source = FixtureSource::from_json(FIXTURE).unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();

        assert!(matches!(source.fetch_day(date).await, Err(FetchError::NoData(d)) if d == date));
    }

    #[test]
    fn test_from_path_and_empty_payload() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FIXTURE.as_bytes()).unwrap();

        let source = FixtureSource::from_path(file.path())
            .unwrap()
            .with_empty(CallDayMetrics::default().to_payload());

        assert_eq!(source.empty_payload().metric("total_calls"), Some(0.0));
    }

    #[test]
    fn test_bad_documents() {
        assert!(matches!(
            FixtureSource::from_json("[1, 2]"),
            Err(FetchError::Parse(_))
        ));
        assert!(matches!(
            FixtureSource::from_path("/nonexistent/fixture.json"),
            Err(FetchError::Configuration(_))
        ));
    }
}
