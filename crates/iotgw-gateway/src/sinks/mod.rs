//! Built-in platform sinks
//!
//! Each sink turns `(target, credential, payload)` into a normalized
//! [`SendRequest`] and hands it to a [`Transmitter`]. Wire I/O lives behind
//! the transmitter; the default [`DryRunTransmitter`] only logs the request.

mod mqtt;
mod rest;
mod thingsboard;
mod thingspeak;

pub use mqtt::MqttSink;
pub use rest::RestSink;
pub use thingsboard::ThingsBoardSink;
pub use thingspeak::ThingSpeakSink;

use async_trait::async_trait;
use iotgw_core::{SensorReading, SinkError};
use serde::Serialize;

/// How a send request reaches its platform
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "transport", rename_all = "lowercase")]
pub enum SendTransport {
    /// HTTP request
    Http {
        method: String,
        url: String,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        headers: Vec<(String, String)>,
    },
    /// MQTT publish
    Mqtt {
        broker: String,
        topic: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        username: Option<String>,
    },
}

/// Normalized outbound request produced by a sink
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SendRequest {
    /// Platform name
    pub platform: String,
    /// Addressing
    #[serde(flatten)]
    pub transport: SendTransport,
    /// JSON body / MQTT payload
    pub body: serde_json::Value,
}

/// Performs the wire I/O for a [`SendRequest`]
#[async_trait]
pub trait Transmitter: Send + Sync {
    async fn transmit(&self, request: &SendRequest) -> Result<(), SinkError>;
}

/// Transmitter that logs each request and reports success
#[derive(Debug, Clone, Default)]
pub struct DryRunTransmitter;

#[async_trait]
impl Transmitter for DryRunTransmitter {
    async fn transmit(&self, request: &SendRequest) -> Result<(), SinkError> {
        match &request.transport {
            SendTransport::Http { method, url, .. } => tracing::info!(
                platform = %request.platform,
                %method,
                %url,
                body = %request.body,
                "Dry run: HTTP send"
            ),
            SendTransport::Mqtt { broker, topic, .. } => tracing::info!(
                platform = %request.platform,
                %broker,
                %topic,
                body = %request.body,
                "Dry run: MQTT publish"
            ),
        }
        Ok(())
    }
}

/// Confirmation text returned by every built-in sink
fn confirmation(platform: &str, target: &str, payload: &SensorReading) -> String {
    format!(
        "Published to {} at {}: {}",
        platform,
        target,
        payload.to_json()
    )
}

/// Prefix `http://` when the target carries no scheme
fn with_http_scheme(target: &str) -> String {
    if target.contains("://") {
        target.to_string()
    } else {
        format!("http://{}", target)
    }
}
