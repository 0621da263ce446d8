//! PlatformSink trait - the point where telemetry leaves the gateway

use async_trait::async_trait;

use crate::error::SinkError;
use crate::models::SensorReading;

/// Outbound transmission to one IoT platform
///
/// Implementations perform (or delegate) the actual send and return a
/// human-readable confirmation. The gateway never retries a failed send;
/// the error is handed back to the caller as-is.
#[async_trait]
pub trait PlatformSink: Send + Sync {
    /// Platform name this sink serves (e.g., "thingsboard")
    fn name(&self) -> &str;

    /// Send a reading to `target`
    ///
    /// # Arguments
    /// * `target` - URL, broker address or channel id, platform-specific
    /// * `credential` - Token or API key, if the caller supplied one
    /// * `payload` - The reading to transmit
    async fn send(
        &self,
        target: &str,
        credential: Option<&str>,
        payload: &SensorReading,
    ) -> Result<String, SinkError>;
}
