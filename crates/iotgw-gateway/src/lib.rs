//! iotgw-gateway - Deciding how and where telemetry leaves the gateway
//!
//! This crate ties readings, targets and platforms together:
//!
//! - [`ProtocolProber`] actively probes an endpoint for HTTP/REST, OpenAPI,
//!   MQTT, MQTT-over-TLS and CoAP listeners
//! - [`PublishDispatcher`] validates a publish request and routes it to the
//!   sink registered for its platform
//! - [`SampleStore`] keeps manually sampled readings for the process lifetime
//! - [`analysis`] flags out-of-range readings
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                       PublishDispatcher                          │
//! │  structural check ──► Platform match ──► PlatformSink::send       │
//! │                                                                  │
//! │     ┌─────────────┐ ┌────────────┐ ┌────────────┐ ┌───────────┐  │
//! │     │ ThingsBoard │ │ ThingSpeak │ │ custom_rest│ │custom_mqtt│  │
//! │     └──────┬──────┘ └─────┬──────┘ └─────┬──────┘ └─────┬─────┘  │
//! │            └──────────────┴──────┬───────┴──────────────┘        │
//! │                          Transmitter (SendRequest)               │
//! │                                                                  │
//! │   + registered custom sinks (by platform name)                   │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use iotgw_gateway::{PublishDispatcher, ProtocolProber, ProbeConfig};
//!
//! let prober = ProtocolProber::new(ProbeConfig::default())?;
//! let found = prober.discover("http://device.local").await;
//!
//! let dispatcher = PublishDispatcher::new();
//! let outcome = dispatcher.publish(request).await?;
//! ```

pub mod analysis;
pub mod dispatcher;
pub mod prober;
pub mod sinks;
pub mod store;

pub use analysis::{analyze, Analysis};
pub use dispatcher::PublishDispatcher;
pub use prober::{endpoint_host, ProbeConfig, ProtocolProber};
pub use sinks::{DryRunTransmitter, SendRequest, SendTransport, Transmitter};
pub use store::{FieldStats, SampleAck, SampleStore, SampleSummary, DEFAULT_SAMPLE_CAPACITY};

// Re-export core types for convenience
pub use iotgw_core::{
    DiscoveryResult, GatewayError, GatewayResult, Platform, PlatformSink, ProtocolTag,
    PublishOutcome, PublishRequest, SensorReading, SinkError,
};
