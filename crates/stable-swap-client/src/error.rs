//! Client error taxonomy.

use solana_program_error::ProgramError;
use solana_pubkey::Pubkey;
use stable_swap_interface::StableSwapError;
use thiserror::Error;

/// Boxed error returned by ledger collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by [`StableSwapPool`](crate::StableSwapPool) and the query protocol.
///
/// Every variant is terminal for the call that raised it; nothing is retried here.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Account bytes do not decode as a pool state record
    #[error("malformed pool state at {address}: {source}")]
    MalformedRecord {
        /// Pool state account
        address: Pubkey,
        /// Codec failure
        #[source]
        source: StableSwapError,
    },

    /// Pool state decoded but `is_initialized` is false
    #[error("pool state at {address} is not initialized")]
    UninitializedState {
        /// Pool state account
        address: Pubkey,
    },

    /// No trace line carried the expected result
    #[error("no `{name}` result in {} trace lines", describe_lines(.lines))]
    ResultNotFound {
        /// Result name searched for
        name: &'static str,
        /// Number of trace lines scanned, `None` when the collection was absent
        lines: Option<usize>,
    },

    /// A matching trace line carried JSON that does not fit the result record
    #[error("malformed `{name}` result: {source}")]
    MalformedResult {
        /// Result name
        name: &'static str,
        /// JSON failure
        #[source]
        source: serde_json::Error,
    },

    /// Result name cannot be turned into a trace line pattern
    #[error("invalid result name `{name}`: {source}")]
    InvalidResultName {
        /// Result name
        name: &'static str,
        /// Pattern compile failure
        #[source]
        source: regex_lite::Error,
    },

    /// Mint is not one of the pool's assets
    #[error("mint {mint} is not a pool asset")]
    UnknownAsset {
        /// Offending mint
        mint: Pubkey,
    },

    /// Address expected to hold account bytes has none
    #[error("missing account data for {address}")]
    MissingAccountData {
        /// Fetched address
        address: Pubkey,
    },

    /// Account bytes do not decode as an initialized SPL token account
    #[error("invalid token account {address}: {error}")]
    InvalidTokenAccount {
        /// Token account address
        address: Pubkey,
        /// Unpack failure
        error: ProgramError,
    },

    /// Caller arguments rejected before encoding
    #[error("invalid request for pool {pool}: {source}")]
    InvalidRequest {
        /// Pool state account
        pool: Pubkey,
        /// Encoder failure
        #[source]
        source: StableSwapError,
    },

    /// SPL Token instruction builder rejected its arguments
    #[error("token instruction for {account}: {error}")]
    TokenInstruction {
        /// Token account the instruction targets
        account: Pubkey,
        /// Builder failure
        error: ProgramError,
    },

    /// Pool state did not become initialized within the poll budget
    #[error("pool state at {address} not initialized after {attempts} polls")]
    SettleTimeout {
        /// Pool state account
        address: Pubkey,
        /// Polls performed
        attempts: u32,
    },

    /// Ledger collaborator failure, passed through untouched
    #[error("executor: {0}")]
    Executor(#[source] BoxError),
}

fn describe_lines(lines: &Option<usize>) -> String {
    match lines {
        Some(count) => count.to_string(),
        None => "absent".to_string(),
    }
}

impl ClientError {
    /// Returns true if the remote computation produced no result line.
    pub const fn is_result_not_found(&self) -> bool {
        matches!(self, Self::ResultNotFound { .. })
    }
}
