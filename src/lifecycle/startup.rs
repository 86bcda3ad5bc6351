//! Startup orchestration.
//!
//! # Design Decisions
//! - Fail fast: credential, key and channel errors abort startup
//! - The listener binds last, so traffic only arrives once the session is ready

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::GatewayConfig;
use crate::gateway::{GatewayError, Session};
use crate::http::GatewayServer;
use crate::lifecycle::{signals, Shutdown};
use crate::net::tls::load_tls_config;
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to create gateway session: {0}")]
    Session(#[from] GatewayError),

    #[error("invalid bind address '{0}'")]
    BindAddress(String),

    #[error("listener error: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the session and serve the REST API until a shutdown signal.
pub async fn run(config: GatewayConfig) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let session = Session::connect(&config).await.map_err(|e| {
        tracing::error!(error = %e, "Gateway session could not be created");
        e
    })?;
    let server = GatewayServer::new(&config, Arc::new(session));

    let shutdown = Arc::new(Shutdown::new());
    let stop = shutdown.subscribe();
    signals::spawn_signal_handler(shutdown);

    match &config.server.tls {
        Some(tls) => {
            let addr: SocketAddr = config
                .server
                .bind_address
                .parse()
                .map_err(|_| StartupError::BindAddress(config.server.bind_address.clone()))?;
            let rustls = load_tls_config(tls).await?;
            server.run_tls(addr, rustls, stop).await?;
        }
        None => {
            let listener = TcpListener::bind(&config.server.bind_address).await?;
            server.run(listener, stop).await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
