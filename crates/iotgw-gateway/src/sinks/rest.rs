//! Generic REST endpoint

use std::sync::Arc;

use async_trait::async_trait;
use iotgw_core::{PlatformSink, SensorReading, SinkError};
use url::Url;

use super::{confirmation, with_http_scheme, SendRequest, SendTransport, Transmitter};

/// POSTs the reading as a JSON object to `target`, with an optional bearer
/// token taken from the credential.
pub struct RestSink {
    transmitter: Arc<dyn Transmitter>,
}

impl RestSink {
    pub fn new(transmitter: Arc<dyn Transmitter>) -> Self {
        Self { transmitter }
    }

    fn prepare(
        target: &str,
        credential: Option<&str>,
        payload: &SensorReading,
    ) -> Result<SendRequest, SinkError> {
        let url = Url::parse(&with_http_scheme(target))
            .map_err(|e| SinkError::InvalidTarget(format!("{}: {}", target, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SinkError::InvalidTarget(format!(
                "{}: unsupported scheme '{}'",
                target,
                url.scheme()
            )));
        }

        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        if let Some(token) = credential {
            headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
        }

        Ok(SendRequest {
            platform: "custom_rest".to_string(),
            transport: SendTransport::Http {
                method: "POST".to_string(),
                url: url.to_string(),
                headers,
            },
            body: payload.to_json(),
        })
    }
}

#[async_trait]
impl PlatformSink for RestSink {
    fn name(&self) -> &str {
        "custom_rest"
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
