//! REST API behaviour over a stub gateway transport.

mod common;

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tonic::Code;
use tower::ServiceExt;

use fabric_gateway::config::{Environment, GatewayConfig};
use fabric_gateway::http::{GatewayServer, X_REQUEST_ID};

use common::StubTransport;

fn app_with(stub: Arc<StubTransport>, environment: Environment) -> Router {
    let mut config = GatewayConfig::default();
    config.server.environment = environment;
    GatewayServer::new(&config, Arc::new(common::session(stub))).router()
}

fn app(stub: Arc<StubTransport>) -> Router {
    app_with(stub, Environment::Production)
}

fn post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_query_route_returns_result() {
    let stub = Arc::new(StubTransport::evaluating(br#"{"ID":"asset1","Owner":"Tom"}"#));
    let response = app(stub.clone())
        .oneshot(post("/gateway/query", r#"{"func":"ReadAsset","args":["asset1"]}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(X_REQUEST_ID));
    assert_eq!(json_body(response).await, json!({"ID": "asset1", "Owner": "Tom"}));
    assert_eq!(stub.calls(), [1, 0, 0, 0]);
}

#[tokio::test]
async fn test_invoke_route_commits() {
    let stub = Arc::new(StubTransport::endorsing(br#"{"ID":"asset7"}"#));
    let response = app(stub.clone())
        .oneshot(post(
            "/gateway/invoke",
            r#"{"func":"CreateAsset","args":["asset7","green","5","Ann","300"]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["ID"], "asset7");
    assert_eq!(stub.calls(), [0, 1, 1, 1]);
}

#[tokio::test]
async fn test_missing_args_is_bad_request() {
    let stub = Arc::new(StubTransport::default());
    for body in [r#"{"func":"ReadAsset"}"#, r#"{"args":[]}"#, "not json", r#"{"func":"","args":[]}"#] {
        let response = app(stub.clone()).oneshot(post("/gateway/query", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(
            json_body(response).await,
            json!({"success": false, "message": "Invalid body arguments"})
        );
    }
    assert_eq!(stub.calls(), [0, 0, 0, 0]);
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let stub = Arc::new(StubTransport::default());
    let mut config = GatewayConfig::default();
    config.server.body_limit_bytes = 64;
    let app = GatewayServer::new(&config, Arc::new(common::session(stub.clone()))).router();

    let big = format!(r#"{{"func":"CreateAsset","args":["{}"]}}"#, "x".repeat(1024));
    let response = app.oneshot(post("/gateway/invoke", &big)).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(
        json_body(response).await,
        json!({"success": false, "message": "Request body too large"})
    );
    assert_eq!(stub.calls(), [0, 0, 0, 0]);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let response = app(Arc::new(StubTransport::default()))
        .oneshot(post("/gateway/unknown", "{}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        json_body(response).await,
        json!({"success": false, "message": "404 Error: API not found"})
    );
}

#[tokio::test]
async fn test_hello_route_only_in_development() {
    let hello = || Request::builder().uri("/").body(Body::empty()).unwrap();

    let response = app_with(Arc::new(StubTransport::default()), Environment::Development)
        .oneshot(hello())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"Hello from Fabric Gateway");

    let response = app(Arc::new(StubTransport::default())).oneshot(hello()).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_gateway_failure_body() {
    let stub = Arc::new(
        StubTransport::endorsing(b"{}").with_submit_error(Code::Aborted, "duplicate transaction found"),
    );
    let response = app(stub)
        .oneshot(post("/gateway/invoke", r#"{"func":"CreateAsset","args":["asset1"]}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    let message = body["message"].as_str().unwrap();
    assert!(message.starts_with("Failed to invoke gateway"));
    assert!(message.contains("duplicate transaction"));
}

#[tokio::test]
async fn test_unavailable_peer_is_service_unavailable() {
    let stub = Arc::new(StubTransport::endorsing(b"{}").with_submit_error(Code::Unavailable, "peer down"));
    let response = app(stub)
        .oneshot(post("/gateway/invoke", r#"{"func":"CreateAsset","args":[]}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/gateway/query")
        .header(header::CONTENT_TYPE, "application/json")
        .header(X_REQUEST_ID, "req-1234")
        .body(Body::from(r#"{"func":"GetAllAssets","args":[]}"#))
        .unwrap();
    let response = app(Arc::new(StubTransport::evaluating(b"[]"))).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[X_REQUEST_ID], "req-1234");
}
