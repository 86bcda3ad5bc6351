//! Environment variable overrides.
//!
//! Applied on top of the file (or defaults) so container deployments can
//! configure the gateway without a config file. Empty values are ignored.

use std::path::PathBuf;
use std::time::Duration;

use crate::config::loader::ConfigError;
use crate::config::period::parse_period;
use crate::config::schema::{Environment, GatewayConfig, TlsConfig};

pub const PEER_ENDPOINT: &str = "FABRIC_PEER_ENDPOINT";
pub const PEER_NAME_OVERRIDE: &str = "FABRIC_PEER_NAME_OVERRIDE";
pub const MSP_ID: &str = "FABRIC_MSP_ID";
pub const TLS_ROOT_CERT: &str = "FABRIC_TLS_ROOT_CERT";
pub const CERT_DIR: &str = "FABRIC_CERT_DIR";
pub const KEY_DIR: &str = "FABRIC_KEY_DIR";
pub const CHANNEL: &str = "FABRIC_CHANNEL";
pub const CONTRACT: &str = "FABRIC_CONTRACT";
pub const EVALUATE_TIMEOUT: &str = "FABRIC_EVALUATE_TIMEOUT";
pub const ENDORSE_TIMEOUT: &str = "FABRIC_ENDORSE_TIMEOUT";
pub const SUBMIT_TIMEOUT: &str = "FABRIC_SUBMIT_TIMEOUT";
pub const COMMIT_STATUS_TIMEOUT: &str = "FABRIC_COMMIT_STATUS_TIMEOUT";
pub const BIND_ADDRESS: &str = "GATEWAY_BIND_ADDRESS";
pub const ENVIRONMENT: &str = "GATEWAY_ENV";
pub const SERVER_TLS_CERT: &str = "GATEWAY_TLS_CERT_PATH";
pub const SERVER_TLS_KEY: &str = "GATEWAY_TLS_KEY_PATH";
pub const LOG_LEVEL: &str = "GATEWAY_LOG_LEVEL";

/// Apply overrides from the process environment.
pub fn apply_env_overrides(config: &mut GatewayConfig) -> Result<(), ConfigError> {
    apply_overrides(config, |key| std::env::var(key).ok())
}

/// Apply overrides from an arbitrary lookup.
pub fn apply_overrides<F>(config: &mut GatewayConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    let period = |key: &'static str| -> Result<Option<Duration>, ConfigError> {
        get(key)
            .map(|v| {
                parse_period(&v).map_err(|e| ConfigError::Env {
                    key,
                    message: e.to_string(),
                })
            })
            .transpose()
    };

    if let Some(v) = get(PEER_ENDPOINT) {
        config.peer.endpoint = v;
    }
    if let Some(v) = get(PEER_NAME_OVERRIDE) {
        config.peer.name_override = v;
    }
    if let Some(v) = get(MSP_ID) {
        config.peer.msp_id = v;
    }
    if let Some(v) = get(TLS_ROOT_CERT) {
        config.credentials.tls_root_cert = PathBuf::from(v);
    }
    if let Some(v) = get(CERT_DIR) {
        config.credentials.cert_dir = PathBuf::from(v);
    }
    if let Some(v) = get(KEY_DIR) {
        config.credentials.key_dir = PathBuf::from(v);
    }
    if let Some(v) = get(CHANNEL) {
        config.contract.channel = v;
    }
    if let Some(v) = get(CONTRACT) {
        config.contract.name = v;
    }

    if let Some(d) = period(EVALUATE_TIMEOUT)? {
        config.deadlines.evaluate = d;
    }
    if let Some(d) = period(ENDORSE_TIMEOUT)? {
        config.deadlines.endorse = d;
    }
    if let Some(d) = period(SUBMIT_TIMEOUT)? {
        config.deadlines.submit = d;
    }
    if let Some(d) = period(COMMIT_STATUS_TIMEOUT)? {
        config.deadlines.commit_status = d;
    }

    if let Some(v) = get(BIND_ADDRESS) {
        config.server.bind_address = v;
    }
    if let Some(v) = get(ENVIRONMENT) {
        config.server.environment = match v.to_ascii_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "production" | "prod" => Environment::Production,
            _ => {
                return Err(ConfigError::Env {
                    key: ENVIRONMENT,
                    message: format!("unknown environment '{}'", v),
                })
            }
        };
    }
    match (get(SERVER_TLS_CERT), get(SERVER_TLS_KEY)) {
        (Some(cert), Some(key)) => {
            config.server.tls = Some(TlsConfig {
                cert_path: PathBuf::from(cert),
                key_path: PathBuf::from(key),
            });
        }
        (None, None) => {}
        _ => {
            return Err(ConfigError::Env {
                key: SERVER_TLS_CERT,
                message: format!("{} and {} must be set together", SERVER_TLS_CERT, SERVER_TLS_KEY),
            })
        }
    }
    if let Some(v) = get(LOG_LEVEL) {
        config.observability.log_level = v;
    }

    Ok(())
}
