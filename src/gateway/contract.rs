//! Network and contract handles: resolve, then dispatch.
//!
//! # Data Flow
//! ```text
//! Session.network(channel)        Resolve Network
//!     .contract(name)             Resolve Contract
//!     .evaluate(fn, args)         Dispatch: evaluate
//!     .submit(fn, args)           Dispatch: endorse → submit → commit-status
//! ```
//!
//! Each phase runs under its own deadline from [`DeadlineConfig`]; an
//! expired phase is cancelled and the call fails without retrying.
//!
//! [`DeadlineConfig`]: crate::config::DeadlineConfig

use std::future::Future;
use std::time::Duration;

use tonic::{Code, Status};

use crate::gateway::error::{Phase, TransactionFailure};
use crate::gateway::proposal::{
    build_proposal, commit_status_request, sign_envelope, transaction_result,
};
use crate::gateway::session::Session;
use crate::protos::gateway::{EndorseRequest, EvaluateRequest, SubmitRequest};
use crate::protos::peer::TxValidationCode;

/// Chaincode statuses at or above this value are errors.
const CHAINCODE_ERROR_THRESHOLD: i32 = 400;

/// A channel bound to a session.
#[derive(Debug, Clone, Copy)]
pub struct Network<'a> {
    session: &'a Session,
    name: &'a str,
}

impl<'a> Network<'a> {
    pub(crate) fn new(session: &'a Session, name: &'a str) -> Self {
        Self { session, name }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    /// Bind a contract deployed on this channel.
    pub fn contract(&self, name: &'a str) -> Contract<'a> {
        Contract {
            session: self.session,
            channel: self.name,
            name,
        }
    }
}

/// A contract on a channel, ready for dispatch.
#[derive(Debug, Clone, Copy)]
pub struct Contract<'a> {
    session: &'a Session,
    channel: &'a str,
    name: &'a str,
}

/// Run one phase under its deadline, cancelling it on expiry.
async fn within<T, F>(phase: Phase, deadline: Duration, call: F) -> Result<T, TransactionFailure>
where
    F: Future<Output = Result<T, Status>>,
{
    match tokio::time::timeout(deadline, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(status)) if status.code() == Code::DeadlineExceeded => {
            Err(TransactionFailure::DeadlineExceeded { phase, after: deadline })
        }
        Ok(Err(status)) => Err(TransactionFailure::remote(phase, status)),
        Err(_) => Err(TransactionFailure::DeadlineExceeded { phase, after: deadline }),
    }
}

impl<'a> Contract<'a> {
    pub fn channel(&self) -> &str {
        self.channel
    }

    pub fn name(&self) -> &str {
        self.name
    }

    fn check(&self, function: &str) -> Result<(), TransactionFailure> {
        let blank = [
            ("channel name", self.channel),
            ("contract name", self.name),
            ("function name", function),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty());

        match blank {
            Some((what, _)) => Err(TransactionFailure::InvalidRequest(format!(
                "{} must not be empty",
                what
            ))),
            None => Ok(()),
        }
    }

    /// Evaluate a read-only transaction against the gateway peer.
    ///
    /// Exactly one remote call; nothing is ordered or committed.
    pub async fn evaluate(&self, function: &str, args: &[String]) -> Result<Vec<u8>, TransactionFailure> {
        self.check(function)?;
        let session = self.session;

        let proposal = build_proposal(
            session.creator(),
            session.signer(),
            self.channel,
            self.name,
            function,
            args,
        )?;
        let request = EvaluateRequest {
            transaction_id: proposal.transaction_id,
            channel_id: proposal.channel,
            proposed_transaction: Some(proposal.proposal),
            target_organizations: Vec::new(),
        };

        let deadline = session.deadlines().for_phase(Phase::Evaluate);
        let response = within(
            Phase::Evaluate,
            deadline,
            session.transport().evaluate(request, deadline),
        )
        .await?;

        let result = response.result.ok_or_else(|| {
            TransactionFailure::Malformed("evaluate response has no result".to_string())
        })?;
        if result.status >= CHAINCODE_ERROR_THRESHOLD {
            return Err(TransactionFailure::Chaincode {
                status: result.status,
                message: result.message,
            });
        }
        Ok(result.payload)
    }

    /// Submit a transaction: endorse, submit to ordering, wait for commit.
    ///
    /// Not idempotent. A duplicate submission is rejected by the network and
    /// that rejection is returned as-is.
    pub async fn submit(&self, function: &str, args: &[String]) -> Result<Vec<u8>, TransactionFailure> {
        self.check(function)?;
        let session = self.session;
        let deadlines = session.deadlines();

        let proposal = build_proposal(
            session.creator(),
            session.signer(),
            self.channel,
            self.name,
            function,
            args,
        )?;
        let tx_id = proposal.transaction_id.clone();

        let endorse = EndorseRequest {
            transaction_id: tx_id.clone(),
            channel_id: self.channel.to_string(),
            proposed_transaction: Some(proposal.proposal),
            endorsing_organizations: Vec::new(),
        };
        let deadline = deadlines.for_phase(Phase::Endorse);
        let endorsed = within(
            Phase::Endorse,
            deadline,
            session.transport().endorse(endorse, deadline),
        )
        .await?;

        let mut envelope = endorsed.prepared_transaction.ok_or_else(|| {
            TransactionFailure::Malformed("endorse response has no prepared transaction".to_string())
        })?;
        let result = transaction_result(&envelope)?;
        sign_envelope(&mut envelope, session.signer())?;
        tracing::debug!(tx_id = %tx_id, channel = %self.channel, "Transaction endorsed");

        let submit = SubmitRequest {
            transaction_id: tx_id.clone(),
            channel_id: self.channel.to_string(),
            prepared_transaction: Some(envelope),
        };
        let deadline = deadlines.for_phase(Phase::Submit);
        within(
            Phase::Submit,
            deadline,
            session.transport().submit(submit, deadline),
        )
        .await?;
        tracing::debug!(tx_id = %tx_id, "Transaction submitted");

        let status_request =
            commit_status_request(&tx_id, self.channel, session.creator(), session.signer())?;
        let deadline = deadlines.for_phase(Phase::CommitStatus);
        let status = within(
            Phase::CommitStatus,
            deadline,
            session.transport().commit_status(status_request, deadline),
        )
        .await?;

        let code = TxValidationCode::try_from(status.result)
            .unwrap_or(TxValidationCode::InvalidOtherReason);
        if code != TxValidationCode::Valid {
            return Err(TransactionFailure::Commit {
                tx_id,
                code,
                block_number: status.block_number,
            });
        }

        tracing::debug!(tx_id = %tx_id, block_number = status.block_number, "Transaction committed");
        Ok(result)
    }
}
