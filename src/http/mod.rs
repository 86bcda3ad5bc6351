//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum router, request ID, timeout, body limit)
//!     → request.rs (body shape {func, args})
//!     → gateway::transaction (query / invoke on the configured contract)
//!     → response.rs (JSON result or {success: false, message})
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{TransactionBody, X_REQUEST_ID};
pub use response::ApiError;
pub use server::{AppState, GatewayServer};
