//! Fabric Gateway REST service.
//!
//! Exposes `POST /gateway/query` and `POST /gateway/invoke` and forwards them
//! to a Hyperledger Fabric peer's gateway service over gRPC + TLS.

use std::path::{Path, PathBuf};

use clap::Parser;

use fabric_gateway::config;
use fabric_gateway::lifecycle;
use fabric_gateway::observability::logging;

const DEFAULT_CONFIG: &str = "gateway.toml";

#[derive(Parser)]
#[command(name = "fabric-gateway")]
#[command(about = "REST gateway for Hyperledger Fabric", long_about = None)]
struct Cli {
    /// Configuration file (TOML). Defaults to ./gateway.toml when present.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let path = cli
        .config
        .or_else(|| Path::new(DEFAULT_CONFIG).is_file().then(|| PathBuf::from(DEFAULT_CONFIG)));
    let config = config::load(path.as_deref())?;

    logging::init_logging(&config.observability);
    tracing::info!("fabric-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.server.bind_address,
        peer = %config.peer.endpoint,
        channel = %config.contract.channel,
        contract = %config.contract.name,
        environment = ?config.server.environment,
        "Configuration loaded"
    );

    lifecycle::run(config).await?;
    Ok(())
}
