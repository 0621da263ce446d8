//! Mock bus transport for testing

use std::time::Duration;

use async_trait::async_trait;
use iotgw_core::Frame;
use tokio::sync::{mpsc, Mutex};

use super::BusTransport;
use crate::config::MockBusConfig;
use crate::error::BusError;

/// In-memory bus: frames injected with [`MockBus::inject`] are received in order
pub struct MockBus {
    latency: Duration,
    tx: mpsc::UnboundedSender<Frame>,
    rx: Mutex<mpsc::UnboundedReceiver<Frame>>,
}

impl Default for MockBus {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBus {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            latency: Duration::ZERO,
            tx,
            rx: Mutex::new(rx),
        }
    }

    /// Create a mock bus preloaded with the configured frames
    pub fn from_config(config: &MockBusConfig) -> Result<Self, BusError> {
        let mut bus = Self::new();
        bus.latency = Duration::from_millis(config.latency_ms);

        for info in &config.frames {
            let frame =
                Frame::try_from(info).map_err(|e| BusError::InvalidConfig(e.to_string()))?;
            bus.inject(frame);
        }

        Ok(bus)
    }

    /// Put a frame on the bus (simulates a node transmitting)
    pub fn inject(&self, frame: Frame) {
        // Receiver lives as long as self
        let _ = self.tx.send(frame);
    }
}

#[async_trait]
impl BusTransport for MockBus {
    async fn receive(&self, timeout: Duration) -> Result<Option<Frame>, BusError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let mut rx = self.rx.lock().await;
        match tokio::time::timeout(timeout, rx.recv()).await {
            Ok(Some(frame)) => {
                tracing::debug!(?frame, "Mock bus: frame received");
                Ok(Some(frame))
            }
            Ok(None) => Err(BusError::ConnectionClosed),
            Err(_) => Ok(None),
        }
    }

    fn interface(&self) -> &str {
        "mock"
    }
}
