//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (deadlines > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use crate::config::schema::GatewayConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{field} must be greater than zero")]
    ZeroDuration { field: &'static str },

    #[error("peer.endpoint '{endpoint}' is not a valid address: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("{field} '{value}' is not a socket address")]
    InvalidSocketAddress { field: &'static str, value: String },

    #[error("server.request_timeout ({}s) must exceed the invoke deadlines ({}s)", .request.as_secs(), .invoke.as_secs())]
    RequestTimeoutTooShort { request: Duration, invoke: Duration },
}

/// Peer endpoint as a URI; `https://` is implied when no scheme is given.
pub fn endpoint_uri(endpoint: &str) -> String {
    if endpoint.contains("://") {
        endpoint.to_string()
    } else {
        format!("https://{}", endpoint)
    }
}

pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let required: [(&'static str, bool); 8] = [
        ("peer.endpoint", config.peer.endpoint.trim().is_empty()),
        ("peer.name_override", config.peer.name_override.trim().is_empty()),
        ("peer.msp_id", config.peer.msp_id.trim().is_empty()),
        ("contract.channel", config.contract.channel.trim().is_empty()),
        ("contract.name", config.contract.name.trim().is_empty()),
        ("credentials.tls_root_cert", config.credentials.tls_root_cert.as_os_str().is_empty()),
        ("credentials.cert_dir", config.credentials.cert_dir.as_os_str().is_empty()),
        ("credentials.key_dir", config.credentials.key_dir.as_os_str().is_empty()),
    ];
    errors.extend(
        required
            .iter()
            .filter(|(_, empty)| *empty)
            .map(|(field, _)| ValidationError::Empty(*field)),
    );

    if !config.peer.endpoint.trim().is_empty() {
        match url::Url::parse(&endpoint_uri(&config.peer.endpoint)) {
            Ok(url) if url.host_str().is_none() => errors.push(ValidationError::InvalidEndpoint {
                endpoint: config.peer.endpoint.clone(),
                reason: "missing host".to_string(),
            }),
            Ok(_) => {}
            Err(e) => errors.push(ValidationError::InvalidEndpoint {
                endpoint: config.peer.endpoint.clone(),
                reason: e.to_string(),
            }),
        }
    }

    let durations = [
        ("deadlines.evaluate", config.deadlines.evaluate),
        ("deadlines.endorse", config.deadlines.endorse),
        ("deadlines.submit", config.deadlines.submit),
        ("deadlines.commit_status", config.deadlines.commit_status),
        ("peer.connect_timeout", config.peer.connect_timeout),
        ("server.request_timeout", config.server.request_timeout),
    ];
    errors.extend(
        durations
            .iter()
            .filter(|(_, d)| d.is_zero())
            .map(|(field, _)| ValidationError::ZeroDuration { field: *field }),
    );

    let invoke = config.deadlines.invoke_total();
    if !config.server.request_timeout.is_zero() && config.server.request_timeout <= invoke {
        errors.push(ValidationError::RequestTimeoutTooShort {
            request: config.server.request_timeout,
            invoke,
        });
    }

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidSocketAddress {
            field: "server.bind_address",
            value: config.server.bind_address.clone(),
        });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidSocketAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
