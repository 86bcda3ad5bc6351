//! Ledger gateway client subsystem.
//!
//! # Data Flow
//! ```text
//! CredentialConfig
//!     → credentials.rs (first file per directory, read once)
//!     → identity.rs (MSP id + certificate) / signer.rs (P-256 key)
//!     → channel.rs (TLS channel, server-name override)
//!     → session.rs (identity + signer + transport + deadlines)
//!     → contract.rs (resolve network/contract, dispatch phases)
//!     → transaction.rs (query / invoke / get_block, decode + parse)
//!     → caller
//! ```
//!
//! # Security Constraints
//! - Private keys are never logged; `Debug` output is redacted
//! - The peer channel always uses TLS
//! - Every remote phase has a deadline

pub mod channel;
pub mod contract;
pub mod credentials;
pub mod error;
pub mod identity;
pub mod proposal;
pub mod session;
pub mod signer;
pub mod transaction;
pub mod transport;

pub use contract::{Contract, Network};
pub use credentials::CredentialBundle;
pub use error::{DecodeError, GatewayError, GatewayResult, Phase, TransactionFailure};
pub use identity::Identity;
pub use session::Session;
pub use signer::Signer;
pub use transaction::{get_block, invoke, query};
pub use transport::{GatewayTransport, GrpcTransport};
