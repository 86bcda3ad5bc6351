//! TLS configuration and certificate loading for the REST listener.

use std::path::Path;

use axum_server::tls_rustls::RustlsConfig;

use crate::config::TlsConfig;

/// Install ring as the process-wide rustls provider.
///
/// Both ring (tonic) and aws-lc-rs (axum-server) are linked, so rustls cannot
/// pick one itself. Idempotent; a provider installed earlier wins.
pub fn install_crypto_provider() {
    rustls::crypto::ring::default_provider().install_default().ok();
}

/// Load TLS configuration from certificate and key files.
pub async fn load_tls_config(config: &TlsConfig) -> Result<RustlsConfig, std::io::Error> {
    install_crypto_provider();
    require_file(&config.cert_path, "Certificate")?;
    require_file(&config.key_path, "Private key")?;

    RustlsConfig::from_pem_file(&config.cert_path, &config.key_path).await
}

fn require_file(path: &Path, what: &str) -> Result<(), std::io::Error> {
    if path.is_file() {
        return Ok(());
    }
    Err(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        format!("{} file not found: {}", what, path.display()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crypto_provider_installed_once() {
        install_crypto_provider();
        install_crypto_provider();
        assert!(rustls::crypto::CryptoProvider::get_default().is_some());
    }

    #[tokio::test]
    async fn test_missing_certificate() {
        let config = TlsConfig {
            cert_path: "/nonexistent/server.crt".into(),
            key_path: "/nonexistent/server.key".into(),
        };
        let err = load_tls_config(&config).await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
        assert!(err.to_string().starts_with("Certificate file not found"));
    }
}
