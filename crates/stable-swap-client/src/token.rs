//! SPL Token helpers.

use solana_instruction::Instruction;
use solana_program_pack::Pack;
use solana_pubkey::Pubkey;
use spl_associated_token_account_interface::instruction as associated_token;
use spl_token_interface::state::Account as TokenAccount;
use stable_swap_interface::TOKEN_PROGRAM_ID;

use crate::ClientError;

/// Span of an SPL token account.
pub const TOKEN_ACCOUNT_LEN: usize = TokenAccount::LEN;

/// Create `wallet`'s associated token account for `mint`, succeeding if it exists.
pub fn create_associated_token_account_idempotent(
    funder: &Pubkey,
    wallet: &Pubkey,
    mint: &Pubkey,
) -> Instruction {
    associated_token::create_associated_token_account_idempotent(
        funder,
        wallet,
        mint,
        &TOKEN_PROGRAM_ID,
    )
}

/// Mint of the token account stored at `address`.
///
/// # Errors
/// `InvalidTokenAccount` unless `data` is an initialized SPL token account.
pub fn token_account_mint(address: &Pubkey, data: &[u8]) -> Result<Pubkey, ClientError> {
    TokenAccount::unpack(data)
        .map(|account| account.mint)
        .map_err(|error| ClientError::InvalidTokenAccount {
            address: *address,
            error,
        })
}
