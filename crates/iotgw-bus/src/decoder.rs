//! Frame decoding - arbitration-ID multiplexed sensor values
//!
//! The identifier of a frame selects how its payload is read:
//!
//! | id (default) | layout                                   |
//! |--------------|------------------------------------------|
//! | `0x100`      | byte 0 speed, byte 1 rpm, byte 2 fuel    |
//! | `0x101`      | byte 0 speed                             |
//! | `0x102`      | byte 0 rpm                               |
//! | `0x103`      | byte 0 fuel                              |
//!
//! Any other identifier is [`DecodedFrame::Unrecognized`].

use std::fmt;

use iotgw_core::models::fields;
use iotgw_core::{parse_frame_id, Frame, GatewayError, GatewayResult, SensorReading};
use serde::{Deserialize, Serialize};

use crate::config::FrameMap;

/// Payload bytes needed by the composite frame
const COMPOSITE_LEN: usize = 3;

/// Semantic content of one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecodedFrame {
    /// One named field
    SingleValue { field: String, value: f64 },
    /// Speed, rpm and fuel in one frame
    CompositeReading { speed: f64, rpm: f64, fuel: f64 },
    /// Identifier not in the frame map
    Unrecognized { id: u32 },
}

impl DecodedFrame {
    /// Convert to a reading; `Unrecognized` has no reading
    pub fn to_reading(&self) -> Option<SensorReading> {
        match self {
            DecodedFrame::SingleValue { field, value } => {
                Some(SensorReading::new().with(field.clone(), *value))
            }
            DecodedFrame::CompositeReading { speed, rpm, fuel } => Some(
                SensorReading::new()
                    .with(fields::SPEED, *speed)
                    .with(fields::RPM, *rpm)
                    .with(fields::FUEL, *fuel),
            ),
            DecodedFrame::Unrecognized { .. } => None,
        }
    }
}

impl fmt::Display for DecodedFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodedFrame::SingleValue { field, value } => match field.as_str() {
                fields::SPEED => write!(f, "Speed is {}", value),
                fields::RPM => write!(f, "RPM is {}", value),
                fields::FUEL => write!(f, "Fuel level is {}", value),
                other => write!(f, "{} is {}", other, value),
            },
            DecodedFrame::CompositeReading { speed, rpm, fuel } => {
                write!(f, "speed={} rpm={} fuel={}", speed, rpm, fuel)
            }
            DecodedFrame::Unrecognized { id } => write!(f, "Invalid CAN Frame 0x{:03X}", id),
        }
    }
}

/// Decodes frames according to a [`FrameMap`]
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    composite_id: u32,
    single: [(u32, &'static str); 3],
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self {
            composite_id: 0x100,
            single: [
                (0x101, fields::SPEED),
                (0x102, fields::RPM),
                (0x103, fields::FUEL),
            ],
        }
    }
}

impl FrameDecoder {
    /// Build a decoder from a configured frame map
    pub fn from_map(map: &FrameMap) -> GatewayResult<Self> {
        let parse = |s: &str| parse_frame_id(s).map_err(|e| GatewayError::Config(e.to_string()));

        Ok(Self {
            composite_id: parse(&map.composite)?,
            single: [
                (parse(&map.speed)?, fields::SPEED),
                (parse(&map.rpm)?, fields::RPM),
                (parse(&map.fuel)?, fields::FUEL),
            ],
        })
    }

    /// Decode one frame.
    ///
    /// Fails with [`GatewayError::MalformedFrame`] when the payload is
    /// shorter than the layout the identifier selects.
    pub fn decode(&self, frame: &Frame) -> GatewayResult<DecodedFrame> {
        let data = frame.data();

        if frame.id() == self.composite_id {
            if data.len() < COMPOSITE_LEN {
                return Err(malformed(frame, COMPOSITE_LEN));
            }
            return Ok(DecodedFrame::CompositeReading {
                speed: f64::from(data[0]),
                rpm: f64::from(data[1]),
                fuel: f64::from(data[2]),
            });
        }

        if let Some((_, field)) = self.single.iter().find(|(id, _)| *id == frame.id()) {
            let value = data.first().ok_or_else(|| malformed(frame, 1))?;
            return Ok(DecodedFrame::SingleValue {
                field: field.to_string(),
                value: f64::from(*value),
            });
        }

        Ok(DecodedFrame::Unrecognized { id: frame.id() })
    }
}

fn malformed(frame: &Frame, expected: usize) -> GatewayError {
    GatewayError::MalformedFrame {
        id: frame.id(),
        expected,
        actual: frame.len(),
    }
}
