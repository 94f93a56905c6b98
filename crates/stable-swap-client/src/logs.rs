//! Result extraction from execution trace lines.
//!
//! The program has no return channel: it reports computed values by logging
//! `<Name>: {<json>}`. This module is the only place that knows that format.

use regex_lite::Regex;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use solana_signature::Signature;
use tracing::debug;

use crate::ClientError;

/// A result record the program reports through a trace line.
pub trait ReturnLog: DeserializeOwned {
    /// Name prefixing the JSON object in the trace line.
    const NAME: &'static str;
}

/// Parse the first trace line of the form `<name>: {..}` into `T`.
///
/// `name` matches case-insensitively anywhere in the line and the capture runs from
/// the first `{` after it to the last `}` of the line.
///
/// # Errors
/// `ResultNotFound` when `logs` is absent or no line matches, `MalformedResult`
/// when the matched JSON does not decode into `T`.
pub fn find_log_and_parse<T: DeserializeOwned>(
    logs: Option<&[String]>,
    name: &'static str,
) -> Result<T, ClientError> {
    let Some(logs) = logs else {
        return Err(ClientError::ResultNotFound { name, lines: None });
    };

    let pattern = Regex::new(&format!(r"(?i){}: (\{{.+\}})", regex_lite::escape(name)))
        .map_err(|source| ClientError::InvalidResultName { name, source })?;

    let json = logs
        .iter()
        .find_map(|line| pattern.captures(line).and_then(|c| c.get(1)).map(|m| m.as_str()))
        .ok_or(ClientError::ResultNotFound {
            name,
            lines: Some(logs.len()),
        })?;

    debug!(result = name, json, "parsed result line");
    serde_json::from_str(json).map_err(|source| ClientError::MalformedResult { name, source })
}

/// [`find_log_and_parse`] keyed by the record's own name.
///
/// # Errors
/// See [`find_log_and_parse`].
pub fn parse_return_log<T: ReturnLog>(logs: Option<&[String]>) -> Result<T, ClientError> {
    find_log_and_parse(logs, T::NAME)
}

// ============================================================================
// Result Records
// ============================================================================

/// Output of `exchange`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetDyUnderlying {
    /// Amount of the destination asset
    pub dy: u64,
}

impl ReturnLog for GetDyUnderlying {
    const NAME: &'static str = "GetDyUnderlying";
}

/// Output of `remove_liquidity`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetWithdrawalAmounts {
    /// One amount per pool asset, in pool order
    pub amounts: Vec<u64>,
}

impl ReturnLog for GetWithdrawalAmounts {
    const NAME: &'static str = "GetWithdrawalAmounts";
}

/// Output of `remove_liquidity_one_token`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetWithdrawalAmount {
    /// Amount of the destination asset
    pub dy: u64,
}

impl ReturnLog for GetWithdrawalAmount {
    const NAME: &'static str = "GetWithdrawalAmount";
}

/// Output of `add_liquidity`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetMintAmount {
    /// LP tokens minted
    pub mint_amount: u64,
}

impl ReturnLog for GetMintAmount {
    const NAME: &'static str = "GetMintAmount";
}

/// Output of `get_virtual_price`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetVirtualPrice {
    /// LP token virtual price
    pub virtual_price: u64,
}

impl ReturnLog for GetVirtualPrice {
    const NAME: &'static str = "GetVirtualPrice";
}

/// Confirmed mutating call and the result it logged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionResult<T> {
    /// Transaction signature
    pub signature: Signature,
    /// Parsed result record
    pub result: T,
}
