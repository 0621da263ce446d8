//! Raw SocketCAN adapter

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use iotgw_core::Frame;
use parking_lot::Mutex;
use socketcan::{CanFrame, CanSocket, EmbeddedFrame, Frame as _, Socket};

use crate::config::SocketCanConfig;
use crate::error::BusError;
use crate::transport::BusTransport;

/// Poll interval while waiting on the non-blocking socket
const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Raw CAN socket bound to one interface
pub struct SocketCanBus {
    interface: String,
    socket: Arc<Mutex<CanSocket>>,
}

impl SocketCanBus {
    pub fn new(config: &SocketCanConfig) -> Result<Self, BusError> {
        let socket = CanSocket::open(&config.interface).map_err(|e| {
            BusError::ConnectionFailed(format!(
                "Failed to open raw CAN socket on {}: {}",
                config.interface, e
            ))
        })?;

        socket
            .set_nonblocking(true)
            .map_err(|e| BusError::InvalidConfig(format!("Failed to set non-blocking: {}", e)))?;

        tracing::info!(interface = %config.interface, "Opened SocketCAN bus");

        Ok(Self {
            interface: config.interface.clone(),
            socket: Arc::new(Mutex::new(socket)),
        })
    }
}

#[async_trait]
impl BusTransport for SocketCanBus {
    async fn receive(&self, timeout: Duration) -> Result<Option<Frame>, BusError> {
        let socket = self.socket.clone();

        tokio::task::spawn_blocking(move || read_until(&socket, timeout))
            .await
            .map_err(|e| BusError::ReceiveFailed(format!("Receive task join error: {}", e)))?
    }

    fn interface(&self) -> &str {
        &self.interface
    }
}

/// Read data frames until one arrives or `timeout` elapses.
fn read_until(socket: &Mutex<CanSocket>, timeout: Duration) -> Result<Option<Frame>, BusError> {
    let deadline = Instant::now() + timeout;
    let socket = socket.lock();

    loop {
        if Instant::now() >= deadline {
            return Ok(None);
        }

        match socket.read_frame() {
            Ok(CanFrame::Data(frame)) => {
                let frame = Frame::new(frame.raw_id(), frame.data())
                    .map_err(|e| BusError::ReceiveFailed(e.to_string()))?;
                tracing::debug!(?frame, "CAN frame received");
                return Ok(Some(frame));
            }
            Ok(CanFrame::Remote(_)) => {}
            Ok(CanFrame::Error(_)) => {
                tracing::warn!("CAN error frame received");
            }
            Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                return Err(BusError::ReceiveFailed(format!("SocketCAN read error: {}", e)));
            }
        }
    }
}
