//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, period.rs for durations)
//!     → env.rs (FABRIC_* / GATEWAY_* overrides)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the session is built from it once
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod env;
pub mod loader;
pub mod period;
pub mod schema;
pub mod validation;

pub use loader::{load, load_config, ConfigError};
pub use schema::{
    ContractConfig, CredentialConfig, DeadlineConfig, Environment, GatewayConfig, LogFormat,
    ObservabilityConfig, PeerConfig, ServerConfig, TlsConfig,
};
