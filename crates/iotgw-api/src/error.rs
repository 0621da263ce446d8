//! API error types and conversions

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use iotgw_core::GatewayError;
use serde::Serialize;
use thiserror::Error;

/// API error type that converts to HTTP responses
#[derive(Debug, Error)]
pub enum ApiError {
    /// 400 Bad Request
    #[error("{0}")]
    BadRequest(String),
    /// 404 Not Found
    #[error("{0}")]
    NotFound(String),
    /// 422 Unprocessable Entity (frame did not match its layout)
    #[error("{0}")]
    Unprocessable(String),
    /// 502 Bad Gateway (platform sink failed)
    #[error("{0}")]
    BadGateway(String),
    /// 503 Service Unavailable (bus missing or failing)
    #[error("{0}")]
    ServiceUnavailable(String),
    /// 500 Internal Server Error
    #[error("{0}")]
    Internal(String),
}

/// Standard error response format
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::Unprocessable(_) => (StatusCode::UNPROCESSABLE_ENTITY, "malformed_frame"),
            ApiError::BadGateway(_) => (StatusCode::BAD_GATEWAY, "sink_failure"),
            ApiError::ServiceUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable")
            }
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.parts();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(error = error_type, %message, "API error");
        } else {
            tracing::debug!(error = error_type, %message, "API client error");
        }

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        let message = err.to_string();
        match err.status_code() {
            400 => ApiError::BadRequest(message),
            422 => ApiError::Unprocessable(message),
            502 => ApiError::BadGateway(message),
            503 => ApiError::ServiceUnavailable(message),
            _ => ApiError::Internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_errors_keep_status() {
        let sink = ApiError::from(GatewayError::Sink {
            platform: "thingspeak".to_string(),
            message: "Missing credential: key".to_string(),
        });
        assert_eq!(sink.parts().0, StatusCode::BAD_GATEWAY);
        assert_eq!(
            sink.to_string(),
            "Sink 'thingspeak' failed: Missing credential: key"
        );

        let bus = ApiError::from(GatewayError::BusUnavailable);
        assert_eq!(bus.parts().0, StatusCode::SERVICE_UNAVAILABLE);

        let frame = ApiError::from(GatewayError::MalformedFrame {
            id: 0x100,
            expected: 3,
            actual: 1,
        });
        assert_eq!(frame.parts().0, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
