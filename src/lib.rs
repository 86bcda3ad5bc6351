//! Fabric Gateway client library and REST service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http (query / invoke routes)
//!                         │
//!                         ▼
//!                     gateway::transaction ──▶ Session ──▶ Network ──▶ Contract
//!                                                                        │
//!                                              protos (prost) ◀──────────┤
//!                                                                        ▼
//!                                              transport (tonic, TLS) ──▶ Peer
//!
//!     Cross-cutting: config, observability, lifecycle, net (listener TLS)
//! ```

pub mod config;
pub mod gateway;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod protos;

pub use config::GatewayConfig;
pub use gateway::{GatewayError, Session};
pub use http::GatewayServer;
