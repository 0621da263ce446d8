//! Bus frame model

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// Maximum payload of a classic CAN data frame
pub const MAX_FRAME_LEN: usize = 8;

/// One unit of bus traffic: an arbitration identifier and up to 8 bytes
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame {
    id: u32,
    len: u8,
    data: [u8; MAX_FRAME_LEN],
}

impl Frame {
    /// Create a frame, rejecting payloads longer than [`MAX_FRAME_LEN`]
    pub fn new(id: u32, payload: &[u8]) -> Result<Self, GatewayError> {
        if payload.len() > MAX_FRAME_LEN {
            return Err(GatewayError::InvalidFrame(format!(
                "payload of {} bytes exceeds {} for id 0x{:X}",
                payload.len(),
                MAX_FRAME_LEN,
                id
            )));
        }

        let mut data = [0u8; MAX_FRAME_LEN];
        data[..payload.len()].copy_from_slice(payload);

        Ok(Self {
            id,
            len: payload.len() as u8,
            data,
        })
    }

    /// Arbitration identifier
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Payload bytes
    pub fn data(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }

    /// Payload length (DLC)
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// True for a zero-length payload
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("id", &format_args!("0x{:03X}", self.id))
            .field("data", &self.data())
            .finish()
    }
}

/// Serializable view of a frame, used by the API and mock bus config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameInfo {
    /// Identifier in hex (e.g., "0x100")
    pub id: String,
    /// Payload bytes
    pub data: Vec<u8>,
}

impl From<&Frame> for FrameInfo {
    fn from(frame: &Frame) -> Self {
        Self {
            id: format!("0x{:03X}", frame.id()),
            data: frame.data().to_vec(),
        }
    }
}

impl TryFrom<&FrameInfo> for Frame {
    type Error = GatewayError;

    fn try_from(info: &FrameInfo) -> Result<Self, Self::Error> {
        let id = parse_frame_id(&info.id)?;
        Frame::new(id, &info.data)
    }
}

/// Parse a frame identifier from string (supports hex with 0x prefix)
pub fn parse_frame_id(s: &str) -> Result<u32, GatewayError> {
    let s = s.trim();
    let (digits, radix) = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (s, 10),
    };

    u32::from_str_radix(digits, radix)
        .map_err(|e| GatewayError::InvalidFrame(format!("invalid frame id '{}': {}", s, e)))
}
