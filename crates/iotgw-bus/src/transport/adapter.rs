//! Bus transport trait

use std::time::Duration;

use async_trait::async_trait;
use iotgw_core::Frame;

use crate::error::BusError;

/// Transport-agnostic source of bus frames
///
/// Abstracts the underlying bus (SocketCAN, mock, ...). Callers that share
/// one transport must not receive concurrently; [`BusReader`](crate::BusReader)
/// enforces that.
#[async_trait]
pub trait BusTransport: Send + Sync {
    /// Wait for the next frame
    ///
    /// # Arguments
    /// * `timeout` - Maximum time to wait
    ///
    /// # Returns
    /// `Ok(None)` if no frame arrived before the timeout
    async fn receive(&self, timeout: Duration) -> Result<Option<Frame>, BusError>;

    /// Name of the underlying interface (e.g., "vcan0", "mock")
    fn interface(&self) -> &str;
}
