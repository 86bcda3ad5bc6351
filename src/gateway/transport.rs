//! Gateway service transport.
//!
//! [`GatewayTransport`] is the narrow capability the transaction layer needs
//! from the network: one call per protocol phase. [`GrpcTransport`] speaks
//! the peer's `gateway.Gateway` gRPC service over a TLS channel; tests
//! substitute stub implementations.

use std::time::Duration;

use async_trait::async_trait;
use tonic::client::Grpc;
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::Channel;
use tonic::Status;

use crate::protos::gateway::{
    paths, CommitStatusResponse, EndorseRequest, EndorseResponse, EvaluateRequest,
    EvaluateResponse, SignedCommitStatusRequest, SubmitRequest, SubmitResponse,
};

/// Remote operations of the gateway protocol.
///
/// `deadline` is advisory for the remote side; callers enforce it locally
/// as well.
#[async_trait]
pub trait GatewayTransport: Send + Sync {
    async fn evaluate(
        &self,
        request: EvaluateRequest,
        deadline: Duration,
    ) -> Result<EvaluateResponse, Status>;

    async fn endorse(
        &self,
        request: EndorseRequest,
        deadline: Duration,
    ) -> Result<EndorseResponse, Status>;

    async fn submit(
        &self,
        request: SubmitRequest,
        deadline: Duration,
    ) -> Result<SubmitResponse, Status>;

    async fn commit_status(
        &self,
        request: SignedCommitStatusRequest,
        deadline: Duration,
    ) -> Result<CommitStatusResponse, Status>;
}

/// gRPC client for the peer gateway service.
#[derive(Debug, Clone)]
pub struct GrpcTransport {
    inner: Grpc<Channel>,
}

impl GrpcTransport {
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: Grpc::new(channel),
        }
    }

    async fn unary<Req, Resp>(
        &self,
        path: &'static str,
        message: Req,
        deadline: Duration,
    ) -> Result<Resp, Status>
    where
        Req: prost::Message + Send + Sync + 'static,
        Resp: prost::Message + Default + Send + Sync + 'static,
    {
        let mut grpc = self.inner.clone();
        grpc.ready()
            .await
            .map_err(|e| Status::unavailable(format!("peer connection not ready: {}", e)))?;

        let mut request = tonic::Request::new(message);
        request.set_timeout(deadline);

        let codec = ProstCodec::<Req, Resp>::default();
        let response = grpc
            .unary(request, PathAndQuery::from_static(path), codec)
            .await?;
        Ok(response.into_inner())
    }
}

#[async_trait]
impl GatewayTransport for GrpcTransport {
    async fn evaluate(
        &self,
        request: EvaluateRequest,
        deadline: Duration,
    ) -> Result<EvaluateResponse, Status> {
        self.unary(paths::EVALUATE, request, deadline).await
    }

    async fn endorse(
        &self,
        request: EndorseRequest,
        deadline: Duration,
    ) -> Result<EndorseResponse, Status> {
        self.unary(paths::ENDORSE, request, deadline).await
    }

    async fn submit(
        &self,
        request: SubmitRequest,
        deadline: Duration,
    ) -> Result<SubmitResponse, Status> {
        self.unary(paths::SUBMIT, request, deadline).await
    }

    async fn commit_status(
        &self,
        request: SignedCommitStatusRequest,
        deadline: Duration,
    ) -> Result<CommitStatusResponse, Status> {
        self.unary(paths::COMMIT_STATUS, request, deadline).await
    }
}
