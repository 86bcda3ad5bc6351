//! Request handling.
//!
//! # Responsibilities
//! - Request ID header name (set by `SetRequestIdLayer`, UUID v4)
//! - Body shape shared by the query and invoke routes

use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

/// Header carrying the per-request correlation id.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Body of `POST /gateway/query` and `POST /gateway/invoke`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TransactionBody {
    /// Contract function name.
    pub func: String,
    /// Contract function arguments.
    pub args: Vec<String>,
}

/// Read the request id, if one was assigned.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}
