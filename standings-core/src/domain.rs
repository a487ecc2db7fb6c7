//! Domain types: raw time points, time series, and the per-entity metrics record.
//!
//! Raw points arrive from an external JSON endpoint and are not trusted:
//! values may be missing, non-numeric, or non-finite. Deserialization is
//! lenient so that one malformed point never rejects a whole payload; the
//! sanitizer drops what cannot be used.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One observation of an entity's tracked value at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    /// ISO-8601 timestamp as sent by the producer. Not validated.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: String,
    /// `None` when the producer sent a missing, null, or non-numeric value.
    #[serde(default, deserialize_with = "lenient_value")]
    pub value: Option<f64>,
}

/// Ordered sequence of points for one entity. Order is trusted, never re-sorted.
pub type TimeSeries = Vec<TimePoint>;

impl TimePoint {
    pub fn new(timestamp: impl Into<String>, value: f64) -> Self {
        Self {
            timestamp: timestamp.into(),
            value: Some(value),
        }
    }

    /// A point whose value could not be read.
    pub fn missing(timestamp: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            value: None,
        }
    }

    /// Build a point from an arbitrary JSON value.
    ///
    /// Anything that is not an object still yields a point (with no value),
    /// so the raw point count of a series is preserved.
    pub fn from_json(raw: &Value) -> Self {
        match raw {
            Value::Object(map) => Self {
                timestamp: map.get("timestamp").map(timestamp_text).unwrap_or_default(),
                value: map.get("value").and_then(Value::as_f64),
            },
            _ => Self::missing(""),
        }
    }

    /// Parse the timestamp as RFC 3339, if it is one.
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Build a series from an arbitrary JSON value. Non-arrays yield an empty series.
pub fn series_from_json(raw: &Value) -> TimeSeries {
    match raw {
        Value::Array(items) => items.iter().map(TimePoint::from_json).collect(),
        _ => Vec::new(),
    }
}

fn timestamp_text(raw: &Value) -> String {
    match raw {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(timestamp_text(&raw))
}

fn lenient_value<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(raw.as_f64())
}

/// Risk/return statistics for one entity, computed from one series snapshot.
///
/// Every numeric field is finite. Percentages are expressed as percent
/// (`12.5` means 12.5%), ratios are dimensionless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    pub entity_id: String,
    /// Signed percentage change from first to last clean value.
    pub total_return: f64,
    /// Largest peak-to-trough decline, as a non-negative percentage.
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    pub calmar_ratio: f64,
    /// Last clean value (0 if none).
    pub current_value: f64,
    /// First clean value (0 if none).
    pub starting_value: f64,
}

impl MetricsRecord {
    /// Record with every ratio and return zeroed, carrying only the endpoints.
    pub fn zeroed(entity_id: &str, starting_value: f64, current_value: f64) -> Self {
        Self {
            entity_id: entity_id.to_string(),
            total_return: 0.0,
            max_drawdown: 0.0,
            sharpe_ratio: 0.0,
            sortino_ratio: 0.0,
            calmar_ratio: 0.0,
            current_value: finite_or_zero(current_value),
            starting_value: finite_or_zero(starting_value),
        }
    }

    /// True when every numeric field is finite.
    pub fn is_finite(&self) -> bool {
        [
            self.total_return,
            self.max_drawdown,
            self.sharpe_ratio,
            self.sortino_ratio,
            self.calmar_ratio,
            self.current_value,
            self.starting_value,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Replace a non-finite number with 0.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserialize_numeric_value() {
        let p: TimePoint =
            serde_json::from_value(json!({"timestamp": "2024-03-01T00:00:00Z", "value": 101.5}))
                .unwrap();
        assert_eq!(p.value, Some(101.5));
        assert_eq!(p.timestamp, "2024-03-01T00:00:00Z");
    }

    #[test]
    fn deserialize_string_value_is_none() {
        let p: TimePoint =
            serde_json::from_value(json!({"timestamp": "t", "value": "bad"})).unwrap();
        assert_eq!(p.value, None);
    }

    #[test]
    fn deserialize_missing_fields() {
        let p: TimePoint = serde_json::from_value(json!({})).unwrap();
        assert_eq!(p.value, None);
        assert_eq!(p.timestamp, "");
    }

    #[test]
    fn deserialize_null_value_is_none() {
        let p: TimePoint = serde_json::from_value(json!({"timestamp": "t", "value": null})).unwrap();
        assert_eq!(p.value, None);
    }

    #[test]
    fn from_json_non_object_keeps_a_point() {
        let series = series_from_json(&json!([{"timestamp": "a", "value": 1.0}, 42, "x"]));
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].value, Some(1.0));
        assert_eq!(series[1].value, None);
        assert_eq!(series[2].value, None);
    }

    #[test]
    fn from_json_non_array_is_empty() {
        assert!(series_from_json(&json!(null)).is_empty());
        assert!(series_from_json(&json!({"value": 1})).is_empty());
    }

    #[test]
    fn numeric_timestamp_is_stringified() {
        let p = TimePoint::from_json(&json!({"timestamp": 1700000000, "value": 5}));
        assert_eq!(p.timestamp, "1700000000");
        assert_eq!(p.value, Some(5.0));
    }

    #[test]
    fn parsed_timestamp_rfc3339() {
        let p = TimePoint::new("2024-03-01T12:30:00+02:00", 1.0);
        let dt = p.parsed_timestamp().unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-03-01T10:30:00+00:00");
        assert!(TimePoint::new("yesterday", 1.0).parsed_timestamp().is_none());
    }

    #[test]
    fn zeroed_guards_endpoints() {
        let r = MetricsRecord::zeroed("A", f64::NAN, f64::INFINITY);
        assert_eq!(r.starting_value, 0.0);
        assert_eq!(r.current_value, 0.0);
        assert!(r.is_finite());
    }

    #[test]
    fn finite_or_zero_passes_finite() {
        assert_eq!(finite_or_zero(-3.5), -3.5);
        assert_eq!(finite_or_zero(f64::NEG_INFINITY), 0.0);
        assert_eq!(finite_or_zero(f64::NAN), 0.0);
    }
}
