//! Threshold checks over a reading

use iotgw_core::{fields, SensorReading};
use serde::{Deserialize, Serialize};

/// Temperature above this is flagged
pub const HIGH_TEMPERATURE: f64 = 35.0;
/// Relative humidity above this is flagged
pub const HIGH_HUMIDITY: f64 = 80.0;

/// Result of [`analyze`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Issue labels, empty when nothing was flagged
    pub issues: Vec<String>,
    /// Human-readable verdict
    pub message: String,
}

impl Analysis {
    pub fn normal(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Flag out-of-range values. Absent fields are never flagged.
pub fn analyze(reading: &SensorReading) -> Analysis {
    let mut issues = Vec::new();
    if reading
        .get(fields::TEMPERATURE)
        .is_some_and(|t| t > HIGH_TEMPERATURE)
    {
        issues.push("High temperature".to_string());
    }
    if reading
        .get(fields::HUMIDITY)
        .is_some_and(|h| h > HIGH_HUMIDITY)
    {
        issues.push("High humidity".to_string());
    }

    let message = if issues.is_empty() {
        "Sensor values are normal.".to_string()
    } else {
        format!("Issues detected: {}", issues.join(", "))
    };

    Analysis { issues, message }
}
