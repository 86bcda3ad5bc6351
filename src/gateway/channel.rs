//! TLS channel to the gateway peer.
//!
//! # Responsibilities
//! - Validate the TLS root certificate before use
//! - Pin the expected server name (`peer.name_override`), since the peer
//!   certificate subject often differs from the reachable hostname
//! - Open the channel lazily (default) or eagerly
//!
//! A lazy channel performs the TLS handshake on the first call; a failed
//! handshake surfaces as an `Unavailable` status on that call.

use tonic::transport::{Certificate, Channel, ClientTlsConfig, Endpoint};

use crate::config::validation::endpoint_uri;
use crate::config::PeerConfig;
use crate::gateway::error::{GatewayError, GatewayResult};
use crate::net::install_crypto_provider;

/// Parse PEM certificates, requiring at least one.
pub fn validate_root_certificate(pem: &[u8]) -> GatewayResult<usize> {
    let certs = rustls_pemfile::certs(&mut &pem[..])
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            GatewayError::ConnectionSetup(format!("TLS root certificate is not valid PEM: {}", e))
        })?;

    if certs.is_empty() {
        return Err(GatewayError::ConnectionSetup(
            "TLS root certificate file contains no certificates".to_string(),
        ));
    }
    Ok(certs.len())
}

/// Build the peer endpoint with TLS credentials applied.
pub fn endpoint(peer: &PeerConfig, tls_root_cert: &[u8]) -> GatewayResult<Endpoint> {
    validate_root_certificate(tls_root_cert)?;

    let uri = endpoint_uri(&peer.endpoint);
    if uri.starts_with("http://") {
        return Err(GatewayError::ConnectionSetup(format!(
            "peer endpoint {} must use TLS",
            peer.endpoint
        )));
    }

    install_crypto_provider();
    let tls = ClientTlsConfig::new()
        .ca_certificate(Certificate::from_pem(tls_root_cert))
        .domain_name(peer.name_override.clone());

    let endpoint = Endpoint::from_shared(uri)
        .map_err(|e| {
            GatewayError::ConnectionSetup(format!("invalid peer endpoint {}: {}", peer.endpoint, e))
        })?
        .tls_config(tls)
        .map_err(|e| GatewayError::ConnectionSetup(format!("TLS configuration rejected: {}", e)))?
        .connect_timeout(peer.connect_timeout);

    Ok(endpoint)
}

/// Open the channel to the peer.
pub async fn connect(peer: &PeerConfig, tls_root_cert: &[u8]) -> GatewayResult<Channel> {
    let endpoint = endpoint(peer, tls_root_cert)?;

    if !peer.connect_eagerly {
        tracing::debug!(endpoint = %peer.endpoint, "Peer channel created (lazy)");
        return Ok(endpoint.connect_lazy());
    }

    let channel = endpoint.connect().await.map_err(|e| {
        GatewayError::ConnectionSetup(format!("cannot reach peer {}: {}", peer.endpoint, e))
    })?;
    tracing::info!(
        endpoint = %peer.endpoint,
        name_override = %peer.name_override,
        "Peer channel connected"
    );
    Ok(channel)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_CA: &str = include_str!("../../tests/fixtures/tls/ca.crt");

    #[test]
    fn test_root_certificate_accepted() {
        assert_eq!(validate_root_certificate(TEST_CA.as_bytes()).unwrap(), 1);
    }

    #[test]
    fn test_garbage_root_certificate_rejected() {
        let err = validate_root_certificate(b"not a certificate").unwrap_err();
        assert!(matches!(err, GatewayError::ConnectionSetup(_)));
    }

    #[test]
    fn test_plaintext_endpoint_rejected() {
        let peer = PeerConfig {
            endpoint: "http://localhost:7051".to_string(),
            ..PeerConfig::default()
        };
        let err = endpoint(&peer, TEST_CA.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("must use TLS"));
    }

    #[tokio::test]
    async fn test_lazy_channel_does_not_dial() {
        // Nothing listens on this port; a lazy channel must still be created.
        let peer = PeerConfig {
            endpoint: "127.0.0.1:1".to_string(),
            ..PeerConfig::default()
        };
        assert!(connect(&peer, TEST_CA.as_bytes()).await.is_ok());
    }

    #[tokio::test]
    async fn test_eager_channel_reports_unreachable_peer() {
        let peer = PeerConfig {
            endpoint: "127.0.0.1:1".to_string(),
            connect_eagerly: true,
            connect_timeout: std::time::Duration::from_millis(500),
            ..PeerConfig::default()
        };
        let err = connect(&peer, TEST_CA.as_bytes()).await.unwrap_err();
        assert!(matches!(err, GatewayError::ConnectionSetup(_)));
    }
}
