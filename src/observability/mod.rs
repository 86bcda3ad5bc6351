//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (transaction counters, latency histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured fields (channel, contract, method, tx_id) on every event
//! - Request ID set by the HTTP layer and propagated on responses
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
