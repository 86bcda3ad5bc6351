//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use prost::Message;
use tempfile::TempDir;
use tonic::{Code, Status};

use fabric_gateway::config::{CredentialConfig, DeadlineConfig};
use fabric_gateway::gateway::{GatewayTransport, Identity, Session, Signer};
use fabric_gateway::protos::common::{Envelope, Payload};
use fabric_gateway::protos::gateway::{
    CommitStatusResponse, EndorseRequest, EndorseResponse, EvaluateRequest, EvaluateResponse,
    SignedCommitStatusRequest, SubmitRequest, SubmitResponse,
};
use fabric_gateway::protos::peer::{
    ChaincodeAction, ChaincodeActionPayload, ChaincodeEndorsedAction, ProposalResponsePayload,
    Response, Transaction, TransactionAction, TxValidationCode,
};

pub const MSP_ID: &str = "Org1MSP";

pub fn fixture(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(relative)
}

/// Copy the fixture credentials into a fresh temp tree.
pub fn credential_dirs() -> (TempDir, CredentialConfig) {
    let root = TempDir::new().unwrap();
    let cert_dir = root.path().join("signcerts");
    let key_dir = root.path().join("keystore");
    std::fs::create_dir_all(&cert_dir).unwrap();
    std::fs::create_dir_all(&key_dir).unwrap();

    std::fs::copy(fixture("msp/signcerts/cert.pem"), cert_dir.join("cert.pem")).unwrap();
    std::fs::copy(fixture("msp/keystore/priv_sk"), key_dir.join("priv_sk")).unwrap();
    let tls_root_cert = root.path().join("ca.crt");
    std::fs::copy(fixture("tls/ca.crt"), &tls_root_cert).unwrap();

    let config = CredentialConfig {
        tls_root_cert,
        cert_dir,
        key_dir,
    };
    (root, config)
}

/// Prepared transaction envelope carrying `result` as the chaincode response.
pub fn prepared_envelope(result: &[u8]) -> Envelope {
    let chaincode_action = ChaincodeAction {
        response: Some(Response {
            status: 200,
            message: String::new(),
            payload: result.to_vec(),
        }),
        ..Default::default()
    };
    let response_payload = ProposalResponsePayload {
        proposal_hash: vec![0; 32],
        extension: chaincode_action.encode_to_vec(),
    };
    let action_payload = ChaincodeActionPayload {
        chaincode_proposal_payload: Vec::new(),
        action: Some(ChaincodeEndorsedAction {
            proposal_response_payload: response_payload.encode_to_vec(),
            endorsements: Vec::new(),
        }),
    };
    let transaction = Transaction {
        actions: vec![TransactionAction {
            header: Vec::new(),
            payload: action_payload.encode_to_vec(),
        }],
    };
    Envelope {
        payload: Payload {
            header: None,
            data: transaction.encode_to_vec(),
        }
        .encode_to_vec(),
        signature: Vec::new(),
    }
}

/// Programmable in-memory gateway that counts calls per phase.
pub struct StubTransport {
    evaluate_status: i32,
    evaluate_payload: Vec<u8>,
    evaluate_delay: Duration,
    evaluate_without_result: bool,
    endorse_result: Vec<u8>,
    endorse_delay: Duration,
    submit_delay: Duration,
    commit_delay: Duration,
    submit_error: Option<(Code, String)>,
    commit_code: TxValidationCode,
    pub evaluate_calls: AtomicUsize,
    pub endorse_calls: AtomicUsize,
    pub submit_calls: AtomicUsize,
    pub commit_status_calls: AtomicUsize,
    pub last_evaluate: Mutex<Option<EvaluateRequest>>,
    pub last_submit: Mutex<Option<SubmitRequest>>,
}

impl Default for StubTransport {
    fn default() -> Self {
        Self {
            evaluate_status: 200,
            evaluate_payload: b"{}".to_vec(),
            evaluate_delay: Duration::ZERO,
            evaluate_without_result: false,
            endorse_result: b"{}".to_vec(),
            endorse_delay: Duration::ZERO,
            submit_delay: Duration::ZERO,
            commit_delay: Duration::ZERO,
            submit_error: None,
            commit_code: TxValidationCode::Valid,
            evaluate_calls: AtomicUsize::new(0),
            endorse_calls: AtomicUsize::new(0),
            submit_calls: AtomicUsize::new(0),
            commit_status_calls: AtomicUsize::new(0),
            last_evaluate: Mutex::new(None),
            last_submit: Mutex::new(None),
        }
    }
}

impl StubTransport {
    pub fn evaluating(payload: &[u8]) -> Self {
        Self {
            evaluate_payload: payload.to_vec(),
            ..Self::default()
        }
    }

    pub fn endorsing(result: &[u8]) -> Self {
        Self {
            endorse_result: result.to_vec(),
            ..Self::default()
        }
    }

    pub fn with_chaincode_status(mut self, status: i32, message: &str) -> Self {
        self.evaluate_status = status;
        self.evaluate_payload = message.as_bytes().to_vec();
        self
    }

    pub fn with_evaluate_delay(mut self, delay: Duration) -> Self {
        self.evaluate_delay = delay;
        self
    }

    pub fn without_evaluate_result(mut self) -> Self {
        self.evaluate_without_result = true;
        self
    }

    pub fn with_endorse_delay(mut self, delay: Duration) -> Self {
        self.endorse_delay = delay;
        self
    }

    pub fn with_submit_delay(mut self, delay: Duration) -> Self {
        self.submit_delay = delay;
        self
    }

    pub fn with_commit_delay(mut self, delay: Duration) -> Self {
        self.commit_delay = delay;
        self
    }

    pub fn with_submit_error(mut self, code: Code, message: &str) -> Self {
        self.submit_error = Some((code, message.to_string()));
        self
    }

    pub fn with_commit_code(mut self, code: TxValidationCode) -> Self {
        self.commit_code = code;
        self
    }

    pub fn calls(&self) -> [usize; 4] {
        [
            self.evaluate_calls.load(Ordering::SeqCst),
            self.endorse_calls.load(Ordering::SeqCst),
            self.submit_calls.load(Ordering::SeqCst),
            self.commit_status_calls.load(Ordering::SeqCst),
        ]
    }
}

async fn stall(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[async_trait]
impl GatewayTransport for StubTransport {
    async fn evaluate(
        &self,
        request: EvaluateRequest,
        _deadline: Duration,
    ) -> Result<EvaluateResponse, Status> {
        self.evaluate_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_evaluate.lock().unwrap() = Some(request);
        stall(self.evaluate_delay).await;
        if self.evaluate_without_result {
            return Ok(EvaluateResponse { result: None });
        }

        let (payload, message) = if self.evaluate_status >= 400 {
            (Vec::new(), String::from_utf8_lossy(&self.evaluate_payload).into_owned())
        } else {
            (self.evaluate_payload.clone(), String::new())
        };
        Ok(EvaluateResponse {
            result: Some(Response {
                status: self.evaluate_status,
                message,
                payload,
            }),
        })
    }

    async fn endorse(
        &self,
        _request: EndorseRequest,
        _deadline: Duration,
    ) -> Result<EndorseResponse, Status> {
        self.endorse_calls.fetch_add(1, Ordering::SeqCst);
        stall(self.endorse_delay).await;
        Ok(EndorseResponse {
            prepared_transaction: Some(prepared_envelope(&self.endorse_result)),
        })
    }

    async fn submit(
        &self,
        request: SubmitRequest,
        _deadline: Duration,
    ) -> Result<SubmitResponse, Status> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_submit.lock().unwrap() = Some(request);
        stall(self.submit_delay).await;
        match &self.submit_error {
            Some((code, message)) => Err(Status::new(*code, message.clone())),
            None => Ok(SubmitResponse {}),
        }
    }

    async fn commit_status(
        &self,
        _request: SignedCommitStatusRequest,
        _deadline: Duration,
    ) -> Result<CommitStatusResponse, Status> {
        self.commit_status_calls.fetch_add(1, Ordering::SeqCst);
        stall(self.commit_delay).await;
        Ok(CommitStatusResponse {
            result: self.commit_code as i32,
            block_number: 7,
        })
    }
}

pub fn signer() -> Signer {
    let key = std::fs::read(fixture("msp/keystore/priv_sk")).unwrap();
    Signer::from_key_bytes(&key).unwrap()
}

pub fn identity() -> Identity {
    let cert = std::fs::read(fixture("msp/signcerts/cert.pem")).unwrap();
    Identity::new(MSP_ID, cert)
}

/// Session over `transport` with the default deadlines.
pub fn session(transport: Arc<StubTransport>) -> Session {
    session_with_deadlines(transport, DeadlineConfig::default())
}

pub fn session_with_deadlines(transport: Arc<StubTransport>, deadlines: DeadlineConfig) -> Session {
    Session::new(identity(), signer(), transport, deadlines)
}
