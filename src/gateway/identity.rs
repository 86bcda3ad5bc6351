//! Client identity: MSP id plus X.509 certificate.

use std::path::Path;

use prost::Message;

use crate::gateway::credentials::read_credential;
use crate::gateway::error::GatewayResult;
use crate::protos::msp::SerializedIdentity;

/// Organization-scoped identity presented to the network.
///
/// The certificate is not parsed here; a malformed certificate is rejected
/// by the peer on first use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    msp_id: String,
    credentials: Vec<u8>,
}

impl Identity {
    pub fn new(msp_id: impl Into<String>, credentials: impl Into<Vec<u8>>) -> Self {
        Self {
            msp_id: msp_id.into(),
            credentials: credentials.into(),
        }
    }

    /// Build an identity from a certificate file.
    pub async fn from_file(msp_id: impl Into<String>, cert_path: &Path) -> GatewayResult<Self> {
        let credentials = read_credential(cert_path).await?;
        Ok(Self::new(msp_id, credentials))
    }

    pub fn msp_id(&self) -> &str {
        &self.msp_id
    }

    /// PEM-encoded certificate bytes.
    pub fn credentials(&self) -> &[u8] {
        &self.credentials
    }

    /// Protobuf `SerializedIdentity` used as the transaction creator.
    pub fn serialize(&self) -> Vec<u8> {
        SerializedIdentity {
            mspid: self.msp_id.clone(),
            id_bytes: self.credentials.clone(),
        }
        .encode_to_vec()
    }
}
