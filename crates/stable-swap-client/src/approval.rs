//! Single-use delegate approvals around one pool operation.
//!
//! ```text
//! approve(account_0 -> delegate, amount_0)
//! ...
//! <pool operation signed by delegate>
//! revoke(account_0)
//! ...
//! ```
//!
//! The delegate keypair is generated per call and dropped with the approval, so an
//! allowance never outlives the transaction that carries it.

use solana_instruction::Instruction;
use solana_keypair::Keypair;
use solana_pubkey::Pubkey;
use solana_signer::Signer;
use spl_token_interface::instruction::{approve, revoke};
use stable_swap_interface::TOKEN_PROGRAM_ID;

use crate::ClientError;

/// Spending approvals granted to a fresh delegate for one operation.
pub struct ScopedApproval {
    delegate: Keypair,
    owner: Pubkey,
    grants: Vec<(Pubkey, u64)>,
}

impl ScopedApproval {
    /// Start an approval for token accounts owned by `owner`.
    pub fn new(owner: Pubkey) -> Self {
        Self {
            delegate: Keypair::new(),
            owner,
            grants: Vec::new(),
        }
    }

    /// Allow the delegate to move up to `amount` out of `account`.
    pub fn grant(&mut self, account: Pubkey, amount: u64) -> &mut Self {
        self.grants.push((account, amount));
        self
    }

    /// Delegate address the pool operation must name.
    pub fn delegate(&self) -> Pubkey {
        self.delegate.pubkey()
    }

    /// Keypair that signs the pool operation.
    pub fn signer(&self) -> &Keypair {
        &self.delegate
    }

    /// Surround `operation` with the approve and revoke instructions.
    ///
    /// # Errors
    /// `TokenInstruction` if the SPL Token builder rejects an account.
    pub fn wrap(&self, operation: Instruction) -> Result<Vec<Instruction>, ClientError> {
        let delegate = self.delegate();
        let mut instructions = Vec::with_capacity(2 * self.grants.len() + 1);
        for (account, amount) in &self.grants {
            let ix = approve(&TOKEN_PROGRAM_ID, account, &delegate, &self.owner, &[], *amount)
                .map_err(|error| ClientError::TokenInstruction {
                    account: *account,
                    error,
                })?;
            instructions.push(ix);
        }
        instructions.push(operation);
        for (account, _) in &self.grants {
            let ix = revoke(&TOKEN_PROGRAM_ID, account, &self.owner, &[]).map_err(|error| {
                ClientError::TokenInstruction {
                    account: *account,
                    error,
                }
            })?;
            instructions.push(ix);
        }
        Ok(instructions)
    }
}
