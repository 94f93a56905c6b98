//! Simulated query protocol.
//!
//! Read-only pool computations run as dry-run transactions paid for and authorized
//! by the process-wide simulation identity; the result is scraped from the trace
//! lines (see [`crate::logs`]). Operations that move tokens need real token
//! accounts to name, so the identity owns one associated token account per pool
//! asset plus one for the LP mint.

use solana_instruction::Instruction;
use solana_pubkey::Pubkey;
use solana_system_interface::instruction::transfer;
use stable_swap_interface::get_associated_token_address;
use tracing::{debug, info};

use crate::{
    ClientError, LedgerExecutor, TransactionSender,
    logs::{ReturnLog, parse_return_log},
    token::create_associated_token_account_idempotent,
};

/// Simulate `instructions` with `fee_payer` and parse the logged `T`.
///
/// # Errors
/// `Executor` if the simulation request fails, otherwise the errors of
/// [`parse_return_log`].
pub async fn simulate_query<T, E>(
    executor: &E,
    instructions: &[Instruction],
    fee_payer: &Pubkey,
) -> Result<T, ClientError>
where
    T: ReturnLog,
    E: LedgerExecutor + ?Sized,
{
    debug!(result = T::NAME, instructions = instructions.len(), "simulating query");
    let logs = executor
        .simulate(instructions, fee_payer)
        .await
        .map_err(ClientError::Executor)?;
    parse_return_log(logs.as_deref())
}

/// Token accounts owned by the simulation identity for one pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationAccounts {
    /// Simulation identity
    pub owner: Pubkey,
    /// One associated account per pool asset, in pool order
    pub token_accounts: Vec<Pubkey>,
    /// Associated account for the pool LP mint
    pub lp_token_account: Pubkey,
}

impl SimulationAccounts {
    /// Derive the associated accounts without touching the ledger.
    pub fn derive(owner: Pubkey, token_mints: &[Pubkey], pool_mint: &Pubkey) -> Self {
        Self {
            owner,
            token_accounts: token_mints
                .iter()
                .map(|mint| get_associated_token_address(&owner, mint))
                .collect(),
            lp_token_account: get_associated_token_address(&owner, pool_mint),
        }
    }

    /// Fund the identity and create whichever associated accounts are missing.
    ///
    /// Sends nothing when every account already exists, so repeated calls are safe.
    ///
    /// # Errors
    /// `Executor` if an account fetch or the funding transaction fails.
    pub async fn provision<E, F>(
        executor: &E,
        funder: &F,
        owner: Pubkey,
        token_mints: &[Pubkey],
        pool_mint: &Pubkey,
        funding_lamports: u64,
    ) -> Result<Self, ClientError>
    where
        E: LedgerExecutor + ?Sized,
        F: TransactionSender + ?Sized,
    {
        let accounts = Self::derive(owner, token_mints, pool_mint);
        let payer = funder.payer();

        let mut create = Vec::new();
        let wanted = accounts
            .token_accounts
            .iter()
            .zip(token_mints)
            .chain(std::iter::once((&accounts.lp_token_account, pool_mint)));
        for (address, mint) in wanted {
            let existing = executor
                .account_data(address)
                .await
                .map_err(ClientError::Executor)?;
            if existing.is_none() {
                create.push(create_associated_token_account_idempotent(&payer, &owner, mint));
            }
        }

        if create.is_empty() {
            debug!(%owner, "simulation accounts already provisioned");
            return Ok(accounts);
        }

        let mut instructions = Vec::with_capacity(create.len() + 1);
        instructions.push(transfer(&payer, &owner, funding_lamports));
        instructions.extend(create);
        let signature = funder
            .send(&instructions, &[])
            .await
            .map_err(ClientError::Executor)?;
        info!(
            %owner,
            %signature,
            created = instructions.len() - 1,
            "provisioned simulation accounts"
        );
        Ok(accounts)
    }
}
