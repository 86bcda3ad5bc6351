//! Transaction proposal construction and prepared-transaction parsing.
//!
//! # Data Flow
//! ```text
//! (channel, contract, function, args) + creator
//!     → ChannelHeader + SignatureHeader → Header
//!     → ChaincodeInvocationSpec → ChaincodeProposalPayload
//!     → Proposal → sign → SignedProposal
//!
//! prepared Envelope (from endorse)
//!     → Payload.data → Transaction → ChaincodeActionPayload
//!     → ProposalResponsePayload → ChaincodeAction.response.payload
//! ```

use std::time::SystemTime;

use prost::Message;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::gateway::error::TransactionFailure;
use crate::gateway::signer::Signer;
use crate::protos::common::{ChannelHeader, Envelope, Header, HeaderType, Payload, SignatureHeader};
use crate::protos::gateway::{CommitStatusRequest, SignedCommitStatusRequest};
use crate::protos::peer::{
    chaincode_spec, ChaincodeAction, ChaincodeActionPayload, ChaincodeHeaderExtension, ChaincodeId,
    ChaincodeInput, ChaincodeInvocationSpec, ChaincodeProposalPayload, ChaincodeSpec, Proposal,
    ProposalResponsePayload, SignedProposal, Transaction,
};

const NONCE_LEN: usize = 24;

/// A signed proposal ready for evaluate or endorse.
#[derive(Debug, Clone)]
pub struct SignedTransactionProposal {
    pub transaction_id: String,
    pub channel: String,
    pub proposal: SignedProposal,
}

/// Transaction id: hex(SHA-256(nonce ‖ creator)).
pub fn transaction_id(nonce: &[u8], creator: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(nonce);
    hasher.update(creator);
    hex::encode(hasher.finalize())
}

fn signing_failure(e: p256::ecdsa::Error) -> TransactionFailure {
    TransactionFailure::Signing(e.to_string())
}

/// Build and sign a proposal invoking `function(args...)` on `contract`.
pub fn build_proposal(
    creator: &[u8],
    signer: &Signer,
    channel: &str,
    contract: &str,
    function: &str,
    args: &[String],
) -> Result<SignedTransactionProposal, TransactionFailure> {
    let mut nonce = vec![0u8; NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut nonce);
    let tx_id = transaction_id(&nonce, creator);

    let chaincode_id = ChaincodeId {
        name: contract.to_string(),
        ..Default::default()
    };

    let channel_header = ChannelHeader {
        r#type: HeaderType::EndorserTransaction as i32,
        timestamp: Some(prost_types::Timestamp::from(SystemTime::now())),
        channel_id: channel.to_string(),
        tx_id: tx_id.clone(),
        extension: ChaincodeHeaderExtension {
            chaincode_id: Some(chaincode_id.clone()),
        }
        .encode_to_vec(),
        ..Default::default()
    };
    let signature_header = SignatureHeader {
        creator: creator.to_vec(),
        nonce,
    };
    let header = Header {
        channel_header: channel_header.encode_to_vec(),
        signature_header: signature_header.encode_to_vec(),
    };

    let mut input_args = Vec::with_capacity(args.len() + 1);
    input_args.push(function.as_bytes().to_vec());
    input_args.extend(args.iter().map(|a| a.as_bytes().to_vec()));

    let invocation = ChaincodeInvocationSpec {
        chaincode_spec: Some(ChaincodeSpec {
            r#type: chaincode_spec::Type::Node as i32,
            chaincode_id: Some(chaincode_id),
            input: Some(ChaincodeInput {
                args: input_args,
                is_init: false,
            }),
            timeout: 0,
        }),
    };
    let payload = ChaincodeProposalPayload {
        input: invocation.encode_to_vec(),
    };

    let proposal_bytes = Proposal {
        header: header.encode_to_vec(),
        payload: payload.encode_to_vec(),
        extension: Vec::new(),
    }
    .encode_to_vec();
    let signature = signer.sign(&proposal_bytes).map_err(signing_failure)?;

    Ok(SignedTransactionProposal {
        transaction_id: tx_id,
        channel: channel.to_string(),
        proposal: SignedProposal {
            proposal_bytes,
            signature,
        },
    })
}

/// Sign the payload of a prepared transaction envelope in place.
pub fn sign_envelope(envelope: &mut Envelope, signer: &Signer) -> Result<(), TransactionFailure> {
    envelope.signature = signer.sign(&envelope.payload).map_err(signing_failure)?;
    Ok(())
}

/// Build the signed request used to wait for a transaction's commit.
pub fn commit_status_request(
    transaction_id: &str,
    channel: &str,
    creator: &[u8],
    signer: &Signer,
) -> Result<SignedCommitStatusRequest, TransactionFailure> {
    let request = CommitStatusRequest {
        transaction_id: transaction_id.to_string(),
        channel_id: channel.to_string(),
        identity: creator.to_vec(),
    }
    .encode_to_vec();
    let signature = signer.sign(&request).map_err(signing_failure)?;
    Ok(SignedCommitStatusRequest { request, signature })
}

fn malformed(what: &str, e: prost::DecodeError) -> TransactionFailure {
    TransactionFailure::Malformed(format!("{}: {}", what, e))
}

/// Extract the chaincode result carried by an endorsed transaction.
pub fn transaction_result(envelope: &Envelope) -> Result<Vec<u8>, TransactionFailure> {
    let payload =
        Payload::decode(envelope.payload.as_slice()).map_err(|e| malformed("payload", e))?;
    let transaction =
        Transaction::decode(payload.data.as_slice()).map_err(|e| malformed("transaction", e))?;
    let action = transaction
        .actions
        .first()
        .ok_or_else(|| TransactionFailure::Malformed("transaction has no actions".to_string()))?;
    let action_payload = ChaincodeActionPayload::decode(action.payload.as_slice())
        .map_err(|e| malformed("chaincode action payload", e))?;
    let endorsed = action_payload.action.ok_or_else(|| {
        TransactionFailure::Malformed("chaincode action payload has no endorsed action".to_string())
    })?;
    let response_payload =
        ProposalResponsePayload::decode(endorsed.proposal_response_payload.as_slice())
            .map_err(|e| malformed("proposal response payload", e))?;
    let chaincode_action = ChaincodeAction::decode(response_payload.extension.as_slice())
        .map_err(|e| malformed("chaincode action", e))?;

    Ok(chaincode_action
        .response
        .map(|r| r.payload)
        .unwrap_or_default())
}
