//! Common error types for the gateway

use thiserror::Error;

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors that can occur while decoding, routing or publishing telemetry
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Frame payload is too short for the layout its identifier selects
    #[error("Malformed frame 0x{id:03X}: expected at least {expected} bytes, got {actual}")]
    MalformedFrame {
        /// Arbitration identifier of the offending frame
        id: u32,
        /// Minimum payload length for this identifier
        expected: usize,
        /// Payload length actually received
        actual: usize,
    },

    /// Frame could not be constructed (payload longer than a classic CAN frame)
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    /// Platform sink rejected or failed the send
    #[error("Sink '{platform}' failed: {message}")]
    Sink {
        /// Platform name the sink serves
        platform: String,
        /// Failure message, verbatim from the sink
        message: String,
    },

    /// Bus transport error
    #[error("Bus error: {0}")]
    Bus(String),

    /// No bus is configured for this gateway
    #[error("No bus configured")]
    BusUnavailable,

    /// Invalid parameter or request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            GatewayError::MalformedFrame { .. } => 422,
            GatewayError::InvalidFrame(_) => 400,
            GatewayError::Sink { .. } => 502,
            GatewayError::Bus(_) => 503,
            GatewayError::BusUnavailable => 503,
            GatewayError::InvalidRequest(_) => 400,
            GatewayError::Config(_) => 500,
            GatewayError::Internal(_) => 500,
        }
    }
}

/// Error returned by a [`PlatformSink`](crate::PlatformSink)
#[derive(Debug, Clone, Error)]
pub enum SinkError {
    /// A credential the platform needs was not supplied
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// Target address is not usable for this platform
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    /// Payload field the platform has no slot for
    #[error("Unmapped field: {0}")]
    UnmappedField(String),

    /// Transmission failed
    #[error("Transmission failed: {0}")]
    Transmission(String),
}

impl SinkError {
    /// Attach the platform name, producing the gateway-level error
    pub fn into_gateway_error(self, platform: &str) -> GatewayError {
        GatewayError::Sink {
            platform: platform.to_string(),
            message: self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_frame_message() {
        let err = GatewayError::MalformedFrame {
            id: 0x100,
            expected: 3,
            actual: 2,
        };
        assert_eq!(
            err.to_string(),
            "Malformed frame 0x100: expected at least 3 bytes, got 2"
        );
        assert_eq!(err.status_code(), 422);
    }

    #[test]
    fn test_sink_error_is_surfaced_verbatim() {
        let err = SinkError::Transmission("broker refused".to_string())
            .into_gateway_error("custom_mqtt");
        match &err {
            GatewayError::Sink { platform, message } => {
                assert_eq!(platform, "custom_mqtt");
                assert_eq!(message, "Transmission failed: broker refused");
            }
            other => panic!("Expected Sink, got {:?}", other),
        }
        assert_eq!(err.status_code(), 502);
    }
}
