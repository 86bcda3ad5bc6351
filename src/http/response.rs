//! Error responses.
//!
//! # Responsibilities
//! - Map gateway errors to HTTP status codes
//! - Render failures as `{ "success": false, "message": ... }`
//!
//! # Design Decisions
//! - Messages come from `GatewayError::public_message`; local paths and
//!   internal causes stay in the logs
//! - Deadline expiry maps to 504, an unreachable peer to 503

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::gateway::{GatewayError, TransactionFailure};

/// Structured failure body.
#[derive(Debug, Serialize)]
pub struct FailureBody {
    pub success: bool,
    pub message: String,
}

impl FailureBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Errors returned by route handlers.
#[derive(Debug)]
pub enum ApiError {
    InvalidBody,
    PayloadTooLarge,
    NotFound,
    Gateway(GatewayError),
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        ApiError::Gateway(err)
    }
}

fn gateway_status(err: &GatewayError) -> StatusCode {
    match err.cause() {
        Some(TransactionFailure::DeadlineExceeded { .. }) => StatusCode::GATEWAY_TIMEOUT,
        Some(TransactionFailure::Remote { code: tonic::Code::Unavailable, .. }) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        Some(TransactionFailure::InvalidRequest(_)) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidBody => (StatusCode::BAD_REQUEST, "Invalid body arguments".to_string()),
            ApiError::PayloadTooLarge => {
                (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large".to_string())
            }
            ApiError::NotFound => (StatusCode::NOT_FOUND, "404 Error: API not found".to_string()),
            ApiError::Gateway(err) => (gateway_status(&err), err.public_message()),
        };
        (status, Json(FailureBody::new(message))).into_response()
    }
}
