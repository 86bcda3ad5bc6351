//! Query and invoke primitives.
//!
//! # Responsibilities
//! - Resolve network and contract, dispatch, decode, parse
//! - Log failures with their full cause, then return them classified
//! - Record per-kind transaction metrics
//!
//! # Design Decisions
//! - No retries: invoke is not idempotent, so retry policy belongs to the
//!   caller
//! - An empty payload decodes to `""`, which then fails JSON parsing

use std::time::Instant;

use serde::de::DeserializeOwned;

use crate::gateway::error::{DecodeError, GatewayError, GatewayResult};
use crate::gateway::session::Session;
use crate::observability::metrics;

/// Query system chaincode.
pub const SYSTEM_CONTRACT: &str = "qscc";

/// `qscc` function returning a block by number.
pub const GET_BLOCK_BY_NUMBER: &str = "GetBlockByNumber";

/// Decode a result payload as UTF-8 text.
pub fn decode_payload(bytes: &[u8]) -> Result<&str, DecodeError> {
    if bytes.is_empty() {
        return Ok("");
    }
    Ok(std::str::from_utf8(bytes)?)
}

/// Parse decoded text as a structured value.
pub fn parse_payload<T: DeserializeOwned>(text: &str) -> Result<T, DecodeError> {
    Ok(serde_json::from_str(text)?)
}

fn decode_and_parse<T: DeserializeOwned>(
    kind: &'static str,
    function: &str,
    bytes: &[u8],
) -> GatewayResult<T> {
    decode_payload(bytes)
        .and_then(parse_payload::<T>)
        .map_err(|e| {
            tracing::error!(kind, function, error = %e, payload_len = bytes.len(), "Result decoding failed");
            GatewayError::Decode(e)
        })
}

/// Evaluate `method(args)` on `contract` without committing anything.
pub async fn query<T: DeserializeOwned>(
    session: &Session,
    channel: &str,
    contract: &str,
    method: &str,
    args: &[String],
) -> GatewayResult<T> {
    let start = Instant::now();
    let result = session
        .network(channel)
        .contract(contract)
        .evaluate(method, args)
        .await;

    let bytes = match result {
        Ok(bytes) => bytes,
        Err(cause) => {
            tracing::error!(channel, contract, method, error = %cause, "Query failed");
            metrics::record_transaction("query", "error", start);
            return Err(GatewayError::Query {
                function: method.to_string(),
                cause,
            });
        }
    };

    let parsed = decode_and_parse("query", method, &bytes);
    metrics::record_transaction("query", if parsed.is_ok() { "success" } else { "decode_error" }, start);
    parsed
}

/// Submit `method(args)` on `contract` and wait for it to commit.
pub async fn invoke<T: DeserializeOwned>(
    session: &Session,
    channel: &str,
    contract: &str,
    method: &str,
    args: &[String],
) -> GatewayResult<T> {
    let start = Instant::now();
    let result = session
        .network(channel)
        .contract(contract)
        .submit(method, args)
        .await;

    let bytes = match result {
        Ok(bytes) => bytes,
        Err(cause) => {
            tracing::error!(channel, contract, method, error = %cause, "Invoke failed");
            metrics::record_transaction("invoke", "error", start);
            return Err(GatewayError::Invoke {
                function: method.to_string(),
                cause,
            });
        }
    };

    let parsed = decode_and_parse("invoke", method, &bytes);
    metrics::record_transaction("invoke", if parsed.is_ok() { "success" } else { "decode_error" }, start);
    parsed
}

/// Retrieve block `index` of `channel` through the query system chaincode.
pub async fn get_block<T: DeserializeOwned>(
    session: &Session,
    channel: &str,
    index: u64,
) -> GatewayResult<T> {
    let args = [channel.to_string(), index.to_string()];
    query(session, channel, SYSTEM_CONTRACT, GET_BLOCK_BY_NUMBER, &args).await
}
