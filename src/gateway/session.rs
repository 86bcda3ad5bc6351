//! Authenticated gateway session.
//!
//! Built once at startup from the configuration and shared read-only by
//! every request afterwards (`Arc<Session>`). Nothing in it is mutated after
//! construction, so no locking is needed.

use std::fmt;
use std::sync::Arc;

use crate::config::{DeadlineConfig, GatewayConfig};
use crate::gateway::channel;
use crate::gateway::contract::Network;
use crate::gateway::credentials::CredentialBundle;
use crate::gateway::error::GatewayResult;
use crate::gateway::identity::Identity;
use crate::gateway::signer::Signer;
use crate::gateway::transport::{GatewayTransport, GrpcTransport};

pub struct Session {
    identity: Identity,
    creator: Vec<u8>,
    signer: Signer,
    transport: Arc<dyn GatewayTransport>,
    deadlines: DeadlineConfig,
}

impl Session {
    /// Assemble a session from already-built parts.
    pub fn new(
        identity: Identity,
        signer: Signer,
        transport: Arc<dyn GatewayTransport>,
        deadlines: DeadlineConfig,
    ) -> Self {
        let creator = identity.serialize();
        Self {
            identity,
            creator,
            signer,
            transport,
            deadlines,
        }
    }

    /// Load credentials, open the TLS channel to the peer and build a
    /// session over the gRPC transport.
    ///
    /// Any error here is fatal: the service must not start without a
    /// valid session.
    pub async fn connect(config: &GatewayConfig) -> GatewayResult<Self> {
        let bundle = CredentialBundle::load(&config.credentials).await?;

        let identity = Identity::new(config.peer.msp_id.clone(), bundle.certificate);
        let signer = Signer::from_key_bytes(&bundle.private_key)?;
        let channel = channel::connect(&config.peer, &bundle.tls_root_cert).await?;

        tracing::info!(
            endpoint = %config.peer.endpoint,
            name_override = %config.peer.name_override,
            msp_id = %identity.msp_id(),
            "Gateway session created"
        );

        Ok(Self::new(
            identity,
            signer,
            Arc::new(GrpcTransport::new(channel)),
            config.deadlines,
        ))
    }

    /// Bind a channel name.
    pub fn network<'a>(&'a self, channel: &'a str) -> Network<'a> {
        Network::new(self, channel)
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn deadlines(&self) -> &DeadlineConfig {
        &self.deadlines
    }

    /// Serialized identity used as transaction creator.
    pub(crate) fn creator(&self) -> &[u8] {
        &self.creator
    }

    pub(crate) fn signer(&self) -> &Signer {
        &self.signer
    }

    pub(crate) fn transport(&self) -> &dyn GatewayTransport {
        self.transport.as_ref()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("msp_id", &self.identity.msp_id())
            .field("deadlines", &self.deadlines)
            .finish()
    }
}
