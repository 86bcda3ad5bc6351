//! Gateway error taxonomy.
//!
//! Startup errors (`MissingCredential`, `CredentialRead`, `KeyParse`,
//! `ConnectionSetup`) are fatal. Per-request errors (`Query`, `Invoke`,
//! `Decode`) are logged at the transaction boundary and returned classified.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::protos::peer::TxValidationCode;

/// Phase of a transaction round trip, each bound by its own deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Evaluate,
    Endorse,
    Submit,
    CommitStatus,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Evaluate => "evaluate",
            Phase::Endorse => "endorse",
            Phase::Submit => "submit",
            Phase::CommitStatus => "commit-status",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Underlying cause of a failed query or invoke.
#[derive(Debug, Error)]
pub enum TransactionFailure {
    /// Channel, contract or function name rejected before dispatch.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Proposal or envelope could not be signed.
    #[error("signing failed: {0}")]
    Signing(String),

    /// The phase did not complete before its deadline and was cancelled.
    #[error("{phase} deadline of {}ms exceeded", .after.as_millis())]
    DeadlineExceeded { phase: Phase, after: Duration },

    /// The peer answered the phase with a non-OK gRPC status.
    #[error("{phase} failed ({code:?}): {message}")]
    Remote {
        phase: Phase,
        code: tonic::Code,
        message: String,
    },

    /// The chaincode itself returned an error status.
    #[error("chaincode returned status {status}: {message}")]
    Chaincode { status: i32, message: String },

    /// The transaction was ordered but failed ledger validation.
    #[error("transaction {tx_id} failed to commit with status {}", .code.as_str_name())]
    Commit {
        tx_id: String,
        code: TxValidationCode,
        block_number: u64,
    },

    /// The peer response did not have the expected structure.
    #[error("malformed {0}")]
    Malformed(String),
}

impl TransactionFailure {
    pub(crate) fn remote(phase: Phase, status: tonic::Status) -> Self {
        TransactionFailure::Remote {
            phase,
            code: status.code(),
            message: status.message().to_string(),
        }
    }

    /// Message that can be shown to API callers.
    ///
    /// Remote and chaincode messages originate from the network and are
    /// passed through; local failures are summarized.
    pub fn public_message(&self) -> String {
        match self {
            TransactionFailure::InvalidRequest(msg) => format!("invalid request: {}", msg),
            TransactionFailure::Signing(_) => "transaction could not be signed".to_string(),
            TransactionFailure::DeadlineExceeded { phase, .. } => {
                format!("{} deadline exceeded", phase)
            }
            TransactionFailure::Remote { message, .. } => message.clone(),
            TransactionFailure::Chaincode { message, .. } => message.clone(),
            TransactionFailure::Commit { code, .. } => {
                format!("transaction failed to commit: {}", code.as_str_name())
            }
            TransactionFailure::Malformed(_) => "peer returned a malformed response".to_string(),
        }
    }
}

/// Failure turning a result payload into a structured value.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur while building a session or running a transaction.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No usable file in a credential directory.
    #[error("No files in directory {}: {reason}", .dir.display())]
    MissingCredential { dir: PathBuf, reason: String },

    /// A credential file exists but could not be read.
    #[error("Failed to read credential {}: {source}", .path.display())]
    CredentialRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The private key is malformed or not a P-256 key.
    #[error("Invalid private key: {0}")]
    KeyParse(String),

    /// TLS root certificate unusable or peer channel could not be opened.
    #[error("Connection setup failed: {0}")]
    ConnectionSetup(String),

    /// Read-only evaluation failed.
    #[error("Failed to query gateway ({function}): {cause}")]
    Query {
        function: String,
        #[source]
        cause: TransactionFailure,
    },

    /// Endorse, submit or commit-status failed.
    #[error("Failed to invoke gateway ({function}): {cause}")]
    Invoke {
        function: String,
        #[source]
        cause: TransactionFailure,
    },

    /// Result bytes were not valid text or not parseable.
    #[error("Failed to decode transaction result: {0}")]
    Decode(#[from] DecodeError),
}

impl GatewayError {
    /// Wrapped cause for `Query` and `Invoke` errors.
    pub fn cause(&self) -> Option<&TransactionFailure> {
        match self {
            GatewayError::Query { cause, .. } | GatewayError::Invoke { cause, .. } => Some(cause),
            _ => None,
        }
    }

    /// Message safe to return to API callers; never includes file paths or
    /// key material.
    pub fn public_message(&self) -> String {
        match self {
            GatewayError::Query { cause, .. } => {
                format!("Failed to query gateway: {}", cause.public_message())
            }
            GatewayError::Invoke { cause, .. } => {
                format!("Failed to invoke gateway: {}", cause.public_message())
            }
            GatewayError::Decode(_) => "Failed to decode transaction result".to_string(),
            _ => "Gateway unavailable".to_string(),
        }
    }
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;
