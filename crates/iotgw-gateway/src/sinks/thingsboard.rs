//! ThingsBoard device telemetry over HTTP

use std::sync::Arc;

use async_trait::async_trait;
use iotgw_core::{PlatformSink, SensorReading, SinkError};

use super::{confirmation, with_http_scheme, SendRequest, SendTransport, Transmitter};

/// Publishes to the ThingsBoard device HTTP API.
///
/// With a credential, `target` is the server base URL and the credential is
/// the device access token. Without one, `target` is used as the full
/// telemetry URL (token already embedded).
pub struct ThingsBoardSink {
    transmitter: Arc<dyn Transmitter>,
}

impl ThingsBoardSink {
    pub fn new(transmitter: Arc<dyn Transmitter>) -> Self {
        Self { transmitter }
    }

    fn prepare(target: &str, credential: Option<&str>, payload: &SensorReading) -> SendRequest {
        let base = with_http_scheme(target.trim_end_matches('/'));
        let url = match credential {
            Some(token) => format!("{}/api/v1/{}/telemetry", base, token),
            None => base,
        };

        let values = payload
            .iter()
            .map(|(field, value)| (field.to_string(), serde_json::json!(value)))
            .collect::<serde_json::Map<_, _>>();
        let body = match payload.timestamp() {
            Some(ts) => serde_json::json!({ "ts": ts.timestamp_millis(), "values": values }),
            None => serde_json::Value::Object(values),
        };

        SendRequest {
            platform: "thingsboard".to_string(),
            transport: SendTransport::Http {
                method: "POST".to_string(),
                url,
                headers: Vec::new(),
            },
            body,
        }
    }
}

#[async_trait]
impl PlatformSink for ThingsBoardSink {
    fn name(&self) -> &str {
        "thingsboard"
    }

    async fn send(
        &self,
        target: &str,
        credential: Option<&str>,
        payload: &SensorReading,
    ) -> Result<String, SinkError> {
        let request = Self::prepare(target, credential, payload);
        self.transmitter.transmit(&request).await?;
        Ok(confirmation(self.name(), target, payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_token_builds_device_url() {
        let reading = SensorReading::new().with("temperature", 21.0);
        let request =
            ThingsBoardSink::prepare("https://demo.thingsboard.io/", Some("A1B2"), &reading);

        match request.transport {
            SendTransport::Http { url, method, .. } => {
                assert_eq!(url, "https://demo.thingsboard.io/api/v1/A1B2/telemetry");
                assert_eq!(method, "POST");
            }
            other => panic!("Expected HTTP transport, got {:?}", other),
        }
        assert_eq!(request.body, serde_json::json!({"temperature": 21.0}));
    }

    #[test]
    fn test_without_token_target_is_full_url() {
        let reading = SensorReading::new().with("rpm", 900.0);
        let request =
            ThingsBoardSink::prepare("tb.local/api/v1/TOKEN/telemetry", None, &reading);

        match request.transport {
            SendTransport::Http { url, .. } => {
                assert_eq!(url, "http://tb.local/api/v1/TOKEN/telemetry")
            }
            other => panic!("Expected HTTP transport, got {:?}", other),
        }
    }

    #[test]
    fn test_timestamped_reading_uses_ts_values_body() {
        let ts = chrono::Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let reading = SensorReading::new().with("fuel", 5.0).with_timestamp(ts);
        let request = ThingsBoardSink::prepare("http://tb.local", Some("T"), &reading);

        assert_eq!(
            request.body,
            serde_json::json!({"ts": ts.timestamp_millis(), "values": {"fuel": 5.0}})
        );
    }
}
