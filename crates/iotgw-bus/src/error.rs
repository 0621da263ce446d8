//! Bus transport errors

use iotgw_core::GatewayError;
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum BusError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Receive failed: {0}")]
    ReceiveFailed(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Transport not supported: {0}")]
    Unsupported(String),
}

impl From<BusError> for GatewayError {
    fn from(err: BusError) -> Self {
        match err {
            BusError::InvalidConfig(msg) => GatewayError::Config(msg),
            other => GatewayError::Bus(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_maps_to_config_error() {
        let err: GatewayError = BusError::InvalidConfig("no interface".to_string()).into();
        assert!(matches!(err, GatewayError::Config(_)));
    }

    #[test]
    fn test_closed_bus_maps_to_bus_error() {
        let err: GatewayError = BusError::ConnectionClosed.into();
        assert_eq!(err.to_string(), "Bus error: Connection closed");
        assert_eq!(err.status_code(), 503);
    }
}
