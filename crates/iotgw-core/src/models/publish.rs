//! Publish request and outcome models

use serde::{Deserialize, Serialize};

use super::{Platform, SensorReading};

/// Request to publish one reading to an IoT platform.
///
/// Every field is optional on the wire so that an incomplete request can be
/// answered with [`PublishOutcome::NeedsElicitation`] instead of a parse
/// error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublishRequest {
    /// Target platform
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    /// URL, broker host:port, or channel id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Platform token or API key
    #[serde(default, alias = "api_key", skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
    /// Reading to publish
    #[serde(default, alias = "sensor_data", skip_serializing_if = "Option::is_none")]
    pub payload: Option<SensorReading>,
}

impl PublishRequest {
    /// Create a complete request without credential
    pub fn new(platform: Platform, target: impl Into<String>, payload: SensorReading) -> Self {
        Self {
            platform: Some(platform),
            target: Some(target.into()),
            credential: None,
            payload: Some(payload),
        }
    }

    /// Add a credential
    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }
}

/// Result of a publish attempt that did not fail at the sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PublishOutcome {
    /// Required request fields are absent
    NeedsElicitation {
        /// Names of the absent fields, in declaration order
        missing_fields: Vec<String>,
    },
    /// Sink accepted the reading
    Success {
        /// Platform that was published to
        platform: Platform,
        /// Confirmation returned by the sink
        message: String,
    },
    /// No sink is registered for the platform
    UnsupportedPlatform {
        /// The platform that could not be routed
        platform: Platform,
    },
}

impl PublishOutcome {
    /// True for [`PublishOutcome::Success`]
    pub fn is_success(&self) -> bool {
        matches!(self, PublishOutcome::Success { .. })
    }
}
