//! Transport layer for bus traffic
//!
//! This module provides transport adapters for receiving frames:
//! - SocketCAN adapter for raw CAN (Linux only)
//! - Mock adapter for testing
//!
//! # Example
//!
//! ```ignore
//! use iotgw_bus::transport::create_bus;
//! use iotgw_bus::config::TransportConfig;
//!
//! let config = TransportConfig::Mock(Default::default());
//! let bus = create_bus(&config).await?;
//! let frame = bus.receive(Duration::from_secs(2)).await?;
//! ```

mod adapter;
pub mod mock;

#[cfg(all(target_os = "linux", feature = "socketcan"))]
pub mod socketcan;

pub use adapter::BusTransport;

use std::sync::Arc;

use crate::config::TransportConfig;
use crate::error::BusError;

/// Create a bus transport based on configuration
pub async fn create_bus(config: &TransportConfig) -> Result<Arc<dyn BusTransport>, BusError> {
    match config {
        #[cfg(all(target_os = "linux", feature = "socketcan"))]
        TransportConfig::SocketCan(cfg) => {
            let adapter = socketcan::SocketCanBus::new(cfg)?;
            Ok(Arc::new(adapter))
        }
        #[cfg(not(all(target_os = "linux", feature = "socketcan")))]
        TransportConfig::SocketCan(_) => Err(BusError::Unsupported(
            "SocketCAN requires Linux and the 'socketcan' feature".to_string(),
        )),
        TransportConfig::Mock(cfg) => {
            let adapter = mock::MockBus::from_config(cfg)?;
            Ok(Arc::new(adapter))
        }
    }
}
