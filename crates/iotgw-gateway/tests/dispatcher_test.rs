//! PublishDispatcher routing tests
//!
//! Run with: cargo test -p iotgw-gateway --test dispatcher_test

use std::sync::Arc;

use async_trait::async_trait;
use iotgw_gateway::{
    GatewayError, Platform, PlatformSink, PublishDispatcher, PublishOutcome, PublishRequest,
    SendRequest, SensorReading, SinkError, Transmitter,
};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;

/// Sink that records every call
#[derive(Default)]
struct RecordingSink {
    name: String,
    calls: Mutex<Vec<(String, Option<String>)>>,
}

impl RecordingSink {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl PlatformSink for RecordingSink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(
        &self,
        target: &str,
        credential: Option<&str>,
        _payload: &SensorReading,
    ) -> Result<String, SinkError> {
        self.calls
            .lock()
            .push((target.to_string(), credential.map(str::to_string)));
        Ok(format!("recorded by {}", self.name))
    }
}

struct FailingTransmitter;

#[async_trait]
impl Transmitter for FailingTransmitter {
    async fn transmit(&self, _request: &SendRequest) -> Result<(), SinkError> {
        Err(SinkError::Transmission("HTTP 401 Unauthorized".to_string()))
    }
}

fn reading() -> SensorReading {
    SensorReading::new()
        .with("temperature", 23.5)
        .with("humidity", 41.0)
}

#[tokio::test]
async fn test_thingsboard_success_message() {
    let dispatcher = PublishDispatcher::new();
    let request = PublishRequest::new(
        Platform::ThingsBoard,
        "https://demo.thingsboard.io",
        reading(),
    )
    .with_credential("DEVICE_TOKEN");

    match dispatcher.publish(request).await.unwrap() {
        PublishOutcome::Success { platform, message } => {
            assert_eq!(platform, Platform::ThingsBoard);
            assert!(message.contains("thingsboard"));
            assert!(message.contains("https://demo.thingsboard.io"));
            assert!(message.contains("23.5"));
        }
        other => panic!("Expected success, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_target_only() {
    let dispatcher = PublishDispatcher::new();
    let request: PublishRequest = serde_json::from_value(serde_json::json!({
        "platform": "custom_rest",
        "sensor_data": {"temperature": 20.0}
    }))
    .unwrap();

    assert_eq!(
        dispatcher.publish(request).await.unwrap(),
        PublishOutcome::NeedsElicitation {
            missing_fields: vec!["target".to_string()]
        }
    );
}

#[tokio::test]
async fn test_thingspeak_without_key_is_sink_failure() {
    let dispatcher = PublishDispatcher::new();
    let request = PublishRequest::new(Platform::ThingSpeak, "123456", reading());

    match dispatcher.publish(request).await {
        Err(GatewayError::Sink { platform, message }) => {
            assert_eq!(platform, "thingspeak");
            assert!(message.contains("Missing credential"));
        }
        other => panic!("Expected sink failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_registered_custom_sink_receives_request() {
    let sink = Arc::new(RecordingSink::named("Azure_IoT"));
    let dispatcher = PublishDispatcher::new().with_sink(sink.clone());

    let request = PublishRequest::new(Platform::from("azure_iot"), "hub.example.net", reading())
        .with_credential("sas");
    let outcome = dispatcher.publish(request).await.unwrap();

    assert_eq!(
        outcome,
        PublishOutcome::Success {
            platform: Platform::Custom("azure_iot".to_string()),
            message: "recorded by Azure_IoT".to_string(),
        }
    );
    assert_eq!(
        sink.calls.lock().clone(),
        vec![("hub.example.net".to_string(), Some("sas".to_string()))]
    );
    assert!(dispatcher
        .platforms()
        .contains(&Platform::Custom("azure_iot".to_string())));
}

#[tokio::test]
async fn test_unregistered_platform_is_unsupported() {
    let dispatcher = PublishDispatcher::new();
    let request = PublishRequest::new(Platform::from("aws_iot"), "x", reading());

    assert_eq!(
        dispatcher.publish(request).await.unwrap(),
        PublishOutcome::UnsupportedPlatform {
            platform: Platform::Custom("aws_iot".to_string())
        }
    );
}

#[tokio::test]
async fn test_registering_builtin_name_overrides_builtin() {
    let sink = Arc::new(RecordingSink::named("thingspeak"));
    let dispatcher = PublishDispatcher::new().with_sink(sink.clone());

    // The replacement does not require a key
    let request = PublishRequest::new(Platform::ThingSpeak, "42", reading());
    assert!(dispatcher.publish(request).await.unwrap().is_success());
    assert_eq!(sink.calls.lock().len(), 1);
}

#[tokio::test]
async fn test_transmitter_error_surfaces_verbatim() {
    let dispatcher = PublishDispatcher::with_transmitter(Arc::new(FailingTransmitter));
    let request = PublishRequest::new(Platform::CustomRest, "http://ingest.local/data", reading());

    let err = dispatcher.publish(request).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Sink 'custom_rest' failed: Transmission failed: HTTP 401 Unauthorized"
    );
}
