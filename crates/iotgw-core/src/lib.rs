//! iotgw-core - Core types and traits for the unified telemetry gateway
//!
//! This crate provides the value types that flow through the gateway
//! (readings, frames, publish requests, discovery results), the
//! [`PlatformSink`] abstraction that outbound transmission hides behind,
//! and the task-based [`CompletenessChecker`].
//!
//! # Pipeline
//!
//! ```text
//!  bus frame ──► FrameDecoder ──┐
//!                               ├─► SensorReading ──► PublishDispatcher ──► PlatformSink
//!  manual sample ───────────────┘                            ▲
//!                                                            │
//!                             ProtocolProber ── DiscoveryResult
//! ```

pub mod elicitation;
pub mod error;
pub mod models;
pub mod sink;

pub use elicitation::{CompletenessChecker, ElicitationReport, TaskRequirement, TaskRequirements};
pub use error::{GatewayError, GatewayResult, SinkError};
pub use models::*;
pub use sink::PlatformSink;
