//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::gateway::error::Phase;

/// Root configuration for the gateway service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// REST listener settings.
    pub server: ServerConfig,

    /// Remote peer endpoint and organization.
    pub peer: PeerConfig,

    /// Credential locations.
    pub credentials: CredentialConfig,

    /// Channel and contract the REST routes are bound to.
    pub contract: ContractConfig,

    /// Per-phase transaction deadlines.
    pub deadlines: DeadlineConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    #[default]
    Production,
}

/// REST listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    pub environment: Environment,

    /// Whole-request timeout. Must exceed the sum of the invoke deadlines.
    #[serde(with = "crate::config::period")]
    pub request_timeout: Duration,

    /// Maximum accepted request body size.
    pub body_limit_bytes: usize,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            environment: Environment::Production,
            request_timeout: Duration::from_secs(90),
            body_limit_bytes: 1024 * 1024,
            tls: None,
        }
    }
}

/// TLS configuration for the REST listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: PathBuf,

    /// Path to private key file (PEM).
    pub key_path: PathBuf,
}

/// Peer connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PeerConfig {
    /// Gateway peer address, with or without scheme (e.g., "localhost:7051").
    pub endpoint: String,

    /// TLS server name expected in the peer certificate
    /// (e.g., "peer0.org1.example.com").
    pub name_override: String,

    /// MSP id of the client organization.
    pub msp_id: String,

    #[serde(with = "crate::config::period")]
    pub connect_timeout: Duration,

    /// Connect at startup instead of on first request.
    pub connect_eagerly: bool,
}

impl Default for PeerConfig {
    fn default() -> Self {
        Self {
            endpoint: "localhost:7051".to_string(),
            name_override: "peer0.org1.example.com".to_string(),
            msp_id: "Org1MSP".to_string(),
            connect_timeout: Duration::from_secs(5),
            connect_eagerly: false,
        }
    }
}

/// Credential file locations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CredentialConfig {
    /// TLS CA certificate of the peer (PEM file).
    pub tls_root_cert: PathBuf,

    /// Directory holding exactly one X.509 certificate.
    pub cert_dir: PathBuf,

    /// Directory holding exactly one private key.
    pub key_dir: PathBuf,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        let user = PathBuf::from(
            "crypto/peerOrganizations/org1.example.com/users/User1@org1.example.com/msp",
        );
        Self {
            tls_root_cert: PathBuf::from(
                "crypto/peerOrganizations/org1.example.com/peers/peer0.org1.example.com/tls/ca.crt",
            ),
            cert_dir: user.join("signcerts"),
            key_dir: user.join("keystore"),
        }
    }
}

/// Channel and contract used by the REST routes.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractConfig {
    pub channel: String,
    pub name: String,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            channel: "mychannel".to_string(),
            name: "basic".to_string(),
        }
    }
}

/// Deadline applied to each transaction phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DeadlineConfig {
    /// Read-only evaluation.
    #[serde(with = "crate::config::period")]
    pub evaluate: Duration,

    /// Endorsement gathering.
    #[serde(with = "crate::config::period")]
    pub endorse: Duration,

    /// Ordering-service acceptance.
    #[serde(with = "crate::config::period")]
    pub submit: Duration,

    /// Waiting for final commitment.
    #[serde(with = "crate::config::period")]
    pub commit_status: Duration,
}

impl DeadlineConfig {
    pub fn for_phase(&self, phase: Phase) -> Duration {
        match phase {
            Phase::Evaluate => self.evaluate,
            Phase::Endorse => self.endorse,
            Phase::Submit => self.submit,
            Phase::CommitStatus => self.commit_status,
        }
    }

    /// Upper bound for a complete invoke.
    pub fn invoke_total(&self) -> Duration {
        self.endorse + self.submit + self.commit_status
    }
}

impl Default for DeadlineConfig {
    fn default() -> Self {
        Self {
            evaluate: Duration::from_secs(5),
            endorse: Duration::from_secs(15),
            submit: Duration::from_secs(10),
            commit_status: Duration::from_secs(60),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_deadlines() {
        let deadlines = DeadlineConfig::default();
        assert_eq!(deadlines.for_phase(Phase::Evaluate), Duration::from_secs(5));
        assert_eq!(deadlines.for_phase(Phase::Endorse), Duration::from_secs(15));
        assert_eq!(deadlines.for_phase(Phase::Submit), Duration::from_secs(10));
        assert_eq!(deadlines.for_phase(Phase::CommitStatus), Duration::from_secs(60));
        assert!(ServerConfig::default().request_timeout > deadlines.invoke_total());
    }

    #[test]
    fn test_minimal_config() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [peer]
            endpoint = "peer0.org1.example.com:7051"

            [deadlines]
            commit_status = "2 min"
            "#,
        )
        .unwrap();

        assert_eq!(config.peer.endpoint, "peer0.org1.example.com:7051");
        assert_eq!(config.peer.msp_id, "Org1MSP");
        assert_eq!(config.deadlines.commit_status, Duration::from_secs(120));
        assert_eq!(config.deadlines.evaluate, Duration::from_secs(5));
        assert_eq!(config.contract.channel, "mychannel");
        assert_eq!(config.server.environment, Environment::Production);
    }
}
