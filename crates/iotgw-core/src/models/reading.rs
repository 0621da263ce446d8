//! Sensor reading model

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Well-known field names
pub mod fields {
    pub const TEMPERATURE: &str = "temperature";
    pub const HUMIDITY: &str = "humidity";
    pub const PRESSURE: &str = "pressure";
    pub const SPEED: &str = "speed";
    pub const RPM: &str = "rpm";
    pub const FUEL: &str = "fuel";
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";
}

/// A set of named numeric sensor values plus an optional capture time.
///
/// A field that is not present is unknown, not zero. Readings are built
/// once (via [`SensorReading::with`]) and then only read.
///
/// On the wire a reading is a flat JSON object:
///
/// ```json
/// { "speed": 10.0, "rpm": 20.0, "timestamp": "2024-05-01T12:00:00Z" }
/// ```
///
/// `null` values are accepted on input and treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "ReadingRepr", into = "ReadingRepr")]
pub struct SensorReading {
    values: BTreeMap<String, f64>,
    timestamp: Option<DateTime<Utc>>,
}

impl SensorReading {
    /// Create an empty reading
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field value
    pub fn with(mut self, field: impl Into<String>, value: f64) -> Self {
        self.values.insert(field.into(), value);
        self
    }

    /// Set the capture timestamp
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Value of a field, `None` if unknown
    pub fn get(&self, field: &str) -> Option<f64> {
        self.values.get(field).copied()
    }

    /// Capture timestamp, if recorded
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    /// Known fields in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Names of the known fields
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of known fields
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no field is known
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// JSON object with only the known fields (and timestamp if set)
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[derive(Serialize, Deserialize)]
struct ReadingRepr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<DateTime<Utc>>,
    #[serde(flatten)]
    values: BTreeMap<String, Option<f64>>,
}

impl From<ReadingRepr> for SensorReading {
    fn from(repr: ReadingRepr) -> Self {
        Self {
            values: repr
                .values
                .into_iter()
                .filter_map(|(k, v)| v.map(|v| (k, v)))
                .collect(),
            timestamp: repr.timestamp,
        }
    }
}

impl From<SensorReading> for ReadingRepr {
    fn from(reading: SensorReading) -> Self {
        Self {
            timestamp: reading.timestamp,
            values: reading
                .values
                .into_iter()
                .map(|(k, v)| (k, Some(v)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_absent_field_is_unknown() {
        let reading = SensorReading::new().with(fields::SPEED, 0.0);
        assert_eq!(reading.get(fields::SPEED), Some(0.0));
        assert_eq!(reading.get(fields::RPM), None);
        assert_eq!(reading.len(), 1);
    }

    #[test]
    fn test_null_values_are_dropped_on_input() {
        let reading: SensorReading = serde_json::from_str(
            r#"{"temperature": 21.5, "humidity": null, "timestamp": "2024-05-01T12:00:00Z"}"#,
        )
        .unwrap();

        assert_eq!(reading.get(fields::TEMPERATURE), Some(21.5));
        assert_eq!(reading.get(fields::HUMIDITY), None);
        assert_eq!(reading.len(), 1);
        assert!(reading.timestamp().is_some());
    }

    #[test]
    fn test_serializes_known_fields_only() {
        let reading = SensorReading::new()
            .with(fields::RPM, 20.0)
            .with(fields::SPEED, 10.0);

        assert_eq!(
            reading.to_json(),
            serde_json::json!({"rpm": 20.0, "speed": 10.0})
        );
    }
}
