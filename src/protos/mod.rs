//! Fabric protobuf messages used by the gateway protocol.
//!
//! # Data Flow
//! ```text
//! Proposal (peer)            ─┐
//!     Header (common)         │ encode_to_vec()
//!     ChaincodeProposalPayload┘
//!         → SignedProposal → EvaluateRequest / EndorseRequest (gateway)
//!
//! EndorseResponse.prepared_transaction: Envelope (common)
//!     → signed payload → SubmitRequest
//!     → SignedCommitStatusRequest → CommitStatusResponse
//! ```
//!
//! The messages are written out by hand with `prost` derives rather than
//! generated from `.proto` files, so the crate builds without `protoc`.
//! Field tags follow `fabric-protos`; only the messages the client touches
//! are declared.

pub mod common;
pub mod gateway;
pub mod msp;
pub mod peer;
