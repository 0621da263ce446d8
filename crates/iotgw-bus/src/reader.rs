//! BusReader - serialized access to the shared bus handle

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use iotgw_core::{FrameInfo, GatewayResult, SensorReading};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use crate::config::BusConfig;
use crate::decoder::{DecodedFrame, FrameDecoder};
use crate::transport::{create_bus, BusTransport};

/// Result of one bus read
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BusRead {
    /// No frame within the deadline
    Timeout,
    /// A frame was received and decoded
    Received {
        /// Raw frame
        frame: FrameInfo,
        /// Decoded content
        decoded: DecodedFrame,
        /// Reading derived from the frame, stamped with the receive time
        #[serde(skip_serializing_if = "Option::is_none")]
        reading: Option<SensorReading>,
        /// Human-readable summary
        summary: String,
        /// When the frame was received
        received_at: DateTime<Utc>,
    },
}

/// Owns the bus transport for the process lifetime and decodes what it reads.
///
/// Only one receive is outstanding at a time so concurrent callers never
/// interleave frames.
pub struct BusReader {
    transport: Arc<dyn BusTransport>,
    decoder: FrameDecoder,
    default_timeout: Duration,
    read_lock: Mutex<()>,
}

impl BusReader {
    pub fn new(transport: Arc<dyn BusTransport>, decoder: FrameDecoder) -> Self {
        Self {
            transport,
            decoder,
            default_timeout: Duration::from_millis(10_000),
            read_lock: Mutex::new(()),
        }
    }

    /// Open the configured transport and build the decoder
    pub async fn open(config: &BusConfig) -> GatewayResult<Self> {
        let decoder = FrameDecoder::from_map(&config.frames)?;
        let transport = create_bus(&config.transport).await?;

        tracing::info!(interface = %transport.interface(), "Bus reader ready");

        Ok(Self::new(transport, decoder).with_default_timeout(Duration::from_millis(
            config.default_timeout_ms,
        )))
    }

    /// Set the timeout used when [`read`](Self::read) is given none
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Interface name of the underlying transport
    pub fn interface(&self) -> &str {
        self.transport.interface()
    }

    /// Receive and decode the next frame.
    ///
    /// A timeout is a normal [`BusRead::Timeout`]; a frame too short for its
    /// identifier fails this call only.
    #[instrument(skip(self), fields(interface = %self.transport.interface()))]
    pub async fn read(&self, timeout: Option<Duration>) -> GatewayResult<BusRead> {
        let timeout = timeout.unwrap_or(self.default_timeout);

        let frame = {
            let _guard = self.read_lock.lock().await;
            self.transport.receive(timeout).await?
        };

        let Some(frame) = frame else {
            debug!(timeout_ms = timeout.as_millis() as u64, "Bus read timed out");
            return Ok(BusRead::Timeout);
        };

        let received_at = Utc::now();
        let decoded = self.decoder.decode(&frame)?;
        let reading = decoded
            .to_reading()
            .map(|r| r.with_timestamp(received_at));

        Ok(BusRead::Received {
            frame: FrameInfo::from(&frame),
            summary: decoded.to_string(),
            decoded,
            reading,
            received_at,
        })
    }
}
