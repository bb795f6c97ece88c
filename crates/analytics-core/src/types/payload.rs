//! Opaque per-day analytics payloads.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Analytics result for a single calendar day.
///
/// A payload is a JSON object of named metrics. Only numeric fields take
/// part in aggregation; everything else is carried through as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayPayload(Map<String, Value>);

impl DayPayload {
    /// Create an empty payload.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a field.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    /// Raw field access.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Numeric value of a field, if the field exists and is a number.
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.0.get(name).and_then(Value::as_f64)
    }

    /// Numeric value of a field, treating missing or non-numeric as zero.
    pub fn metric_or_zero(&self, name: &str) -> f64 {
        self.metric(name).unwrap_or(0.0)
    }

    /// Iterate over the numeric fields in key order.
    pub fn numeric_fields(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0
            .iter()
            .filter_map(|(k, v)| v.as_f64().map(|n| (k.as_str(), n)))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the payload has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode the payload into a typed metrics struct.
    pub fn to_typed<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.0.clone()))
    }
}

impl From<Map<String, Value>> for DayPayload {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metric_access() {
        let payload = DayPayload::new()
            .with("total_calls", 10)
            .with("answer_rate", 80.5)
            .with("note", "quiet day");

        assert_eq!(payload.metric("total_calls"), Some(10.0));
        assert_eq!(payload.metric("answer_rate"), Some(80.5));
        assert_eq!(payload.metric("note"), None);
        assert_eq!(payload.metric_or_zero("missing"), 0.0);
        assert_eq!(payload.len(), 3);
    }

    #[test]
    fn test_numeric_fields_skip_strings() {
        let payload = DayPayload::new()
            .with("b", 2)
            .with("a", 1)
            .with("label", "x");

        let fields: Vec<(&str, f64)> = payload.numeric_fields().collect();
        assert_eq!(fields, vec![("a", 1.0), ("b", 2.0)]);
    }

    #[test]
    fn test_transparent_serialization() {
        let payload = DayPayload::new().with("total_calls", 3);
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value, json!({ "total_calls": 3 }));

        let back: DayPayload = serde_json::from_value(value).unwrap();
        assert_eq!(back, payload);
    }
}
