//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → tls.rs (optional rustls handshake via axum-server)
//!     → Hand off to HTTP layer
//! ```
//!
//! TLS is optional for the REST listener; the peer channel (see
//! `gateway::channel`) always uses TLS.

pub mod tls;

pub use tls::install_crypto_provider;
