//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the transaction handlers
//! - Wire up middleware (tracing, timeout, body limit, request ID)
//! - Serve over plain TCP or rustls, with graceful shutdown
//! - Dispatch query and invoke to the configured contract

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Request, State},
    http::{StatusCode, Uri},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use axum_server::tls_rustls::RustlsConfig;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{ContractConfig, Environment, GatewayConfig};
use crate::gateway::{transaction, Session};
use crate::http::request::{request_id, TransactionBody};
use crate::http::response::ApiError;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Session>,
    pub contract: ContractConfig,
}

/// REST front end for the gateway session.
pub struct GatewayServer {
    router: Router,
    grace: Duration,
}

impl GatewayServer {
    pub fn new(config: &GatewayConfig, session: Arc<Session>) -> Self {
        let state = AppState {
            session,
            contract: config.contract.clone(),
        };
        Self {
            router: Self::build_router(config, state),
            grace: config.server.request_timeout,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/gateway/query", post(query_handler))
            .route("/gateway/invoke", post(invoke_handler));
        if config.server.environment == Environment::Development {
            router = router.route("/", get(hello));
        }

        router
            .fallback(not_found)
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.server.body_limit_bytes))
            .layer(TimeoutLayer::new(config.server.request_timeout))
            .layer(middleware::from_fn(log_request))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve plain HTTP on `listener` until shutdown is signalled.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!("Gateway running on http://{}", addr);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Serve HTTPS on `addr` until shutdown is signalled.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let handle = axum_server::Handle::new();
        let grace = self.grace;

        let on_shutdown = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            on_shutdown.graceful_shutdown(Some(grace));
        });

        tracing::info!("Gateway running on https://{}", addr);
        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}

fn transaction_body(body: Result<Json<TransactionBody>, JsonRejection>) -> Result<TransactionBody, ApiError> {
    match body {
        Ok(Json(body)) if !body.func.trim().is_empty() => Ok(body),
        Ok(_) => Err(ApiError::InvalidBody),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            tracing::debug!(error = %rejection, "Request body over limit");
            Err(ApiError::PayloadTooLarge)
        }
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected request body");
            Err(ApiError::InvalidBody)
        }
    }
}

async fn query_handler(
    State(state): State<AppState>,
    body: Result<Json<TransactionBody>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let body = transaction_body(body)?;
    let value = transaction::query(
        &state.session,
        &state.contract.channel,
        &state.contract.name,
        &body.func,
        &body.args,
    )
    .await?;
    Ok(Json(value))
}

async fn invoke_handler(
    State(state): State<AppState>,
    body: Result<Json<TransactionBody>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let body = transaction_body(body)?;
    let value = transaction::invoke(
        &state.session,
        &state.contract.channel,
        &state.contract.name,
        &body.func,
        &body.args,
    )
    .await?;
    Ok(Json(value))
}

async fn hello() -> &'static str {
    "Hello from Fabric Gateway"
}

async fn not_found(uri: Uri) -> ApiError {
    tracing::error!("404 Error: API not found for path: {}", uri.path());
    ApiError::NotFound
}

async fn log_request(request: Request, next: Next) -> Response {
    tracing::debug!(
        request_id = %request_id(request.headers()),
        "[{}] {}",
        request.method(),
        request.uri()
    );
    next.run(request).await
}
