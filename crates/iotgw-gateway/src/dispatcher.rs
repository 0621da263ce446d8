//! Publish routing
//!
//! The dispatcher owns one sink per built-in platform plus a table of
//! caller-registered sinks keyed by platform name. Routing is a match over
//! [`Platform`]; only [`Platform::Custom`] consults the table.

use std::collections::HashMap;
use std::sync::Arc;

use iotgw_core::{
    GatewayResult, Platform, PlatformSink, PublishOutcome, PublishRequest, SensorReading,
};
use tracing::{debug, info, warn};

use crate::sinks::{
    DryRunTransmitter, MqttSink, RestSink, ThingSpeakSink, ThingsBoardSink, Transmitter,
};

/// Routes publish requests to platform sinks
pub struct PublishDispatcher {
    thingsboard: Arc<dyn PlatformSink>,
    thingspeak: Arc<dyn PlatformSink>,
    custom_rest: Arc<dyn PlatformSink>,
    custom_mqtt: Arc<dyn PlatformSink>,
    /// Registered sinks by lowercased platform name
    custom: HashMap<String, Arc<dyn PlatformSink>>,
}

impl PublishDispatcher {
    /// Dispatcher whose built-in sinks only log what they would send
    pub fn new() -> Self {
        Self::with_transmitter(Arc::new(DryRunTransmitter))
    }

    /// Dispatcher whose built-in sinks share `transmitter`
    pub fn with_transmitter(transmitter: Arc<dyn Transmitter>) -> Self {
        Self {
            thingsboard: Arc::new(ThingsBoardSink::new(transmitter.clone())),
            thingspeak: Arc::new(ThingSpeakSink::new(transmitter.clone())),
            custom_rest: Arc::new(RestSink::new(transmitter.clone())),
            custom_mqtt: Arc::new(MqttSink::new(transmitter)),
            custom: HashMap::new(),
        }
    }

    /// Register a sink under its own name.
    ///
    /// A built-in platform name replaces that built-in sink; any other name
    /// becomes routable as [`Platform::Custom`].
    pub fn register_sink(&mut self, sink: Arc<dyn PlatformSink>) {
        let platform = Platform::from(sink.name());
        info!(platform = %platform, "Registering platform sink");
        match platform {
            Platform::ThingsBoard => self.thingsboard = sink,
            Platform::ThingSpeak => self.thingspeak = sink,
            Platform::CustomRest => self.custom_rest = sink,
            Platform::CustomMqtt => self.custom_mqtt = sink,
            Platform::Custom(name) => {
                if self.custom.insert(name.clone(), sink).is_some() {
                    warn!(platform = %name, "Replaced previously registered sink");
                }
            }
        }
    }

    /// Builder-style [`register_sink`](Self::register_sink)
    pub fn with_sink(mut self, sink: Arc<dyn PlatformSink>) -> Self {
        self.register_sink(sink);
        self
    }

    /// All routable platforms: built-ins first, then registered names sorted
    pub fn platforms(&self) -> Vec<Platform> {
        let mut custom: Vec<_> = self.custom.keys().cloned().collect();
        custom.sort();
        Platform::BUILTIN
            .into_iter()
            .chain(custom.into_iter().map(Platform::Custom))
            .collect()
    }

    /// Sink that serves `platform`, if any
    pub fn sink_for(&self, platform: &Platform) -> Option<&Arc<dyn PlatformSink>> {
        match platform {
            Platform::ThingsBoard => Some(&self.thingsboard),
            Platform::ThingSpeak => Some(&self.thingspeak),
            Platform::CustomRest => Some(&self.custom_rest),
            Platform::CustomMqtt => Some(&self.custom_mqtt),
            Platform::Custom(name) => self.custom.get(name),
        }
    }

    /// Validate and route one publish request.
    ///
    /// Missing fields and unknown platforms are normal outcomes; only a sink
    /// failure is an error, carrying the sink's message unchanged. Nothing
    /// is retried.
    pub async fn publish(&self, request: PublishRequest) -> GatewayResult<PublishOutcome> {
        let (platform, target, payload) = match Self::complete_fields(&request) {
            Ok(fields) => fields,
            Err(missing_fields) => {
                debug!(missing = ?missing_fields, "Publish request incomplete");
                return Ok(PublishOutcome::NeedsElicitation { missing_fields });
            }
        };

        let Some(sink) = self.sink_for(platform) else {
            warn!(platform = %platform, "No sink registered for platform");
            return Ok(PublishOutcome::UnsupportedPlatform {
                platform: platform.clone(),
            });
        };

        debug!(platform = %platform, target = %target, fields = payload.len(), "Publishing reading");
        let message = sink
            .send(target, request.credential.as_deref(), payload)
            .await
            .map_err(|e| {
                warn!(platform = %platform, error = %e, "Sink failed");
                e.into_gateway_error(platform.as_str())
            })?;

        info!(platform = %platform, target = %target, "Published reading");
        Ok(PublishOutcome::Success {
            platform: platform.clone(),
            message,
        })
    }

    /// The three routed fields, or the names of the absent ones in order
    fn complete_fields(
        request: &PublishRequest,
    ) -> Result<(&Platform, &str, &SensorReading), Vec<String>> {
        let platform = request
            .platform
            .as_ref()
            .filter(|p| !p.as_str().is_empty());
        let target = request
            .target
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());

        match (platform, target, &request.payload) {
            (Some(platform), Some(target), Some(payload)) => Ok((platform, target, payload)),
            (platform, target, payload) => {
                let mut missing = Vec::new();
                if platform.is_none() {
                    missing.push("platform".to_string());
                }
                if target.is_none() {
                    missing.push("target".to_string());
                }
                if payload.is_none() {
                    missing.push("payload".to_string());
                }
                Err(missing)
            }
        }
    }
}

impl Default for PublishDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::testing::RecordingTransmitter;
    use crate::sinks::SendTransport;
    use pretty_assertions::assert_eq;

    fn reading() -> SensorReading {
        SensorReading::new().with("temperature", 21.5)
    }

    #[tokio::test]
    async fn test_missing_fields_reported_in_order() {
        let dispatcher = PublishDispatcher::new();
        let outcome = dispatcher.publish(PublishRequest::default()).await.unwrap();

        assert_eq!(
            outcome,
            PublishOutcome::NeedsElicitation {
                missing_fields: vec![
                    "platform".to_string(),
                    "target".to_string(),
                    "payload".to_string()
                ]
            }
        );
    }

    #[tokio::test]
    async fn test_blank_target_counts_as_missing() {
        let dispatcher = PublishDispatcher::new();
        let request = PublishRequest::new(Platform::CustomRest, "   ", reading());

        assert_eq!(
            dispatcher.publish(request).await.unwrap(),
            PublishOutcome::NeedsElicitation {
                missing_fields: vec!["target".to_string()]
            }
        );
    }

    #[tokio::test]
    async fn test_blank_platform_counts_as_missing() {
        let dispatcher = PublishDispatcher::new();
        let request: PublishRequest = serde_json::from_value(serde_json::json!({
            "platform": "  ",
            "target": "http://tb.local",
            "payload": {"temperature": 21.5}
        }))
        .unwrap();

        assert_eq!(
            dispatcher.publish(request).await.unwrap(),
            PublishOutcome::NeedsElicitation {
                missing_fields: vec!["platform".to_string()]
            }
        );
    }

    #[tokio::test]
    async fn test_builtin_sink_receives_transmitted_request() {
        let transmitter = Arc::new(RecordingTransmitter::default());
        let dispatcher = PublishDispatcher::with_transmitter(transmitter.clone());

        let request = PublishRequest::new(Platform::CustomMqtt, "broker.local", reading());
        let outcome = dispatcher.publish(request).await.unwrap();
        assert!(outcome.is_success());

        let sent = transmitter.sent.lock();
        assert_eq!(sent.len(), 1);
        assert!(matches!(sent[0].transport, SendTransport::Mqtt { .. }));
    }

    #[tokio::test]
    async fn test_transmitter_failure_is_sink_error() {
        let transmitter = Arc::new(RecordingTransmitter {
            fail_with: Some("connection reset".to_string()),
            ..Default::default()
        });
        let dispatcher = PublishDispatcher::with_transmitter(transmitter);

        let request = PublishRequest::new(Platform::ThingsBoard, "http://tb.local", reading())
            .with_credential("T");
        let err = dispatcher.publish(request).await.unwrap_err();

        assert_eq!(err.status_code(), 502);
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn test_platforms_lists_builtins_first() {
        let dispatcher = PublishDispatcher::new();
        assert_eq!(dispatcher.platforms(), Platform::BUILTIN.to_vec());
    }
}
