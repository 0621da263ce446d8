//! Bus configuration
//!
//! Transport selection, frame identifier layout and receive defaults.

use iotgw_core::FrameInfo;
use serde::{Deserialize, Serialize};

/// Configuration for the bus reader
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusConfig {
    /// Transport configuration
    #[serde(default)]
    pub transport: TransportConfig,
    /// Frame identifier layout
    #[serde(default)]
    pub frames: FrameMap,
    /// Receive timeout used when the caller gives none (milliseconds)
    #[serde(default = "default_read_timeout_ms")]
    pub default_timeout_ms: u64,
}

fn default_read_timeout_ms() -> u64 {
    10_000
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            transport: TransportConfig::default(),
            frames: FrameMap::default(),
            default_timeout_ms: default_read_timeout_ms(),
        }
    }
}

// =============================================================================
// Transport Configuration
// =============================================================================

/// Transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransportConfig {
    /// Raw SocketCAN (Linux only)
    SocketCan(SocketCanConfig),
    /// Mock transport for testing and demos
    Mock(MockBusConfig),
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::Mock(MockBusConfig::default())
    }
}

/// SocketCAN configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocketCanConfig {
    /// CAN interface name (e.g., "can0", "vcan0")
    #[serde(default = "default_interface")]
    pub interface: String,
}

fn default_interface() -> String {
    "vcan0".to_string()
}

impl Default for SocketCanConfig {
    fn default() -> Self {
        Self {
            interface: default_interface(),
        }
    }
}

/// Mock transport configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MockBusConfig {
    /// Frames queued on the bus at startup, delivered in order
    #[serde(default)]
    pub frames: Vec<FrameInfo>,
    /// Simulated latency per receive in milliseconds
    #[serde(default)]
    pub latency_ms: u64,
}

// =============================================================================
// Frame Layout
// =============================================================================

/// Arbitration identifiers and what they carry.
///
/// Identifiers are hex strings (e.g., "0x100") as in CAN database tooling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameMap {
    /// Composite frame: byte 0 speed, byte 1 rpm, byte 2 fuel
    #[serde(default = "default_composite_id")]
    pub composite: String,
    /// Single-value speed frame (byte 0)
    #[serde(default = "default_speed_id")]
    pub speed: String,
    /// Single-value rpm frame (byte 0)
    #[serde(default = "default_rpm_id")]
    pub rpm: String,
    /// Single-value fuel level frame (byte 0)
    #[serde(default = "default_fuel_id")]
    pub fuel: String,
}

fn default_composite_id() -> String {
    "0x100".to_string()
}

fn default_speed_id() -> String {
    "0x101".to_string()
}

fn default_rpm_id() -> String {
    "0x102".to_string()
}

fn default_fuel_id() -> String {
    "0x103".to_string()
}

impl Default for FrameMap {
    fn default() -> Self {
        Self {
            composite: default_composite_id(),
            speed: default_speed_id(),
            rpm: default_rpm_id(),
            fuel: default_fuel_id(),
        }
    }
}
