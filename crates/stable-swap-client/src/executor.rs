//! Ledger collaborator traits.
//!
//! The client never talks to the network itself. Callers plug in an RPC-backed (or
//! in-memory) implementation of these traits; transport, retries and timeouts all
//! live behind them.

use async_trait::async_trait;
use solana_instruction::Instruction;
use solana_keypair::Keypair;
use solana_pubkey::Pubkey;
use solana_signature::Signature;

use crate::BoxError;

/// Read access to the ledger plus dry-run execution.
#[async_trait]
pub trait LedgerExecutor: Send + Sync {
    /// Raw data of `address`, or `None` if the account does not exist.
    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, BoxError>;

    /// Execute `instructions` without committing, paid for by `fee_payer`.
    ///
    /// Signatures are not verified. Returns the trace lines, or `None` if the
    /// executor produced no log collection.
    async fn simulate(
        &self,
        instructions: &[Instruction],
        fee_payer: &Pubkey,
    ) -> Result<Option<Vec<String>>, BoxError>;

    /// Trace lines of a confirmed transaction, or `None` if unavailable.
    async fn transaction_logs(
        &self,
        signature: &Signature,
    ) -> Result<Option<Vec<String>>, BoxError>;

    /// Lamports required to keep an account of `data_len` bytes rent exempt.
    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64, BoxError>;
}

/// Signs as fee payer, submits and waits for confirmation.
#[async_trait]
pub trait TransactionSender: Send + Sync {
    /// Fee payer and owner of the user token accounts.
    fn payer(&self) -> Pubkey;

    /// Sign with the payer plus `signers`, submit and confirm.
    async fn send(
        &self,
        instructions: &[Instruction],
        signers: &[&Keypair],
    ) -> Result<Signature, BoxError>;
}
