//! Address derivation.

use solana_pubkey::Pubkey;
use spl_associated_token_account_interface::address::get_associated_token_address_with_program_id;

use crate::TOKEN_PROGRAM_ID;

/// Derive the pool authority PDA.
///
/// Seeds: `[pool]`. The returned bump is the `nonce` carried by `initialize`.
pub fn find_pool_authority(pool: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[pool.as_ref()], program_id)
}

/// Derive the SPL Token associated account of `wallet` for `mint`.
pub fn get_associated_token_address(wallet: &Pubkey, mint: &Pubkey) -> Pubkey {
    get_associated_token_address_with_program_id(wallet, mint, &TOKEN_PROGRAM_ID)
}
