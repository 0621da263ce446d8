//! MQTT broker publish

use std::sync::Arc;

use async_trait::async_trait;
use iotgw_core::{PlatformSink, SensorReading, SinkError};

use super::{confirmation, SendRequest, SendTransport, Transmitter};

/// Topic every custom MQTT publish goes to
pub const TELEMETRY_TOPIC: &str = "v1/devices/me/telemetry";

const DEFAULT_MQTT_PORT: u16 = 1883;

/// Publishes the reading to broker `target` (`host` or `host:port`) on
/// [`TELEMETRY_TOPIC`]. The credential, if any, is the MQTT username.
pub struct MqttSink {
    transmitter: Arc<dyn Transmitter>,
}

impl MqttSink {
    pub fn new(transmitter: Arc<dyn Transmitter>) -> Self {
        Self { transmitter }
    }

    fn broker_address(target: &str) -> Result<String, SinkError> {
        let trimmed = target
            .trim()
            .trim_start_matches("mqtt://")
            .trim_start_matches("tcp://")
            .trim_end_matches('/');
        if trimmed.is_empty() || trimmed.contains('/') {
            return Err(SinkError::InvalidTarget(format!(
                "{}: expected broker host[:port]",
                target
            )));
        }

        match trimmed.rsplit_once(':') {
            Some((host, port)) if !host.is_empty() && !host.ends_with(':') => {
                port.parse::<u16>().map_err(|_| {
                    SinkError::InvalidTarget(format!("{}: invalid port '{}'", target, port))
                })?;
                Ok(trimmed.to_string())
            }
            Some(_) => Err(SinkError::InvalidTarget(format!(
                "{}: expected broker host[:port]",
                target
            ))),
            None => Ok(format!("{}:{}", trimmed, DEFAULT_MQTT_PORT)),
        }
    }

    fn prepare(
        target: &str,
        credential: Option<&str>,
        payload: &SensorReading,
    ) -> Result<SendRequest, SinkError> {
        Ok(SendRequest {
            platform: "custom_mqtt".to_string(),
            transport: SendTransport::Mqtt {
                broker: Self::broker_address(target)?,
                topic: TELEMETRY_TOPIC.to_string(),
                username: credential.map(str::to_string),
            },
            body: payload.to_json(),
        })
    }
}

#[async_trait]
impl PlatformSink for MqttSink {
    fn name(&self) -> &str {
        "custom_mqtt"
    }

    async fn send(
        &self,
        target: &str,
        credential: Option<&str>,
        payload: &SensorReading,
    ) -> Result<String, SinkError> {
        let request = Self::prepare(target, credential, payload)?;
        self.transmitter.transmit(&request).await?;
        Ok(confirmation(self.name(), target, payload))
    }
}
