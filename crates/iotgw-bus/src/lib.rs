//! iotgw-bus - Framed-bus ingestion for the telemetry gateway
//!
//! This crate reads frames from a CAN-style bus and decodes them into
//! sensor readings.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                  BusReader                    │
//! │  one outstanding receive at a time            │
//! │                                              │
//! │   ┌───────────────┐      ┌───────────────┐   │
//! │   │ BusTransport  │ ───► │ FrameDecoder  │   │
//! │   │(SocketCAN/mock)│      │ (id → fields) │   │
//! │   └───────────────┘      └───────────────┘   │
//! └──────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod decoder;
pub mod error;
pub mod reader;
pub mod transport;

pub use config::{BusConfig, FrameMap, MockBusConfig, SocketCanConfig, TransportConfig};
pub use decoder::{DecodedFrame, FrameDecoder};
pub use error::BusError;
pub use reader::{BusRead, BusReader};
pub use transport::mock::MockBus;
pub use transport::{create_bus, BusTransport};

pub use iotgw_core::{Frame, GatewayError, GatewayResult, SensorReading};
