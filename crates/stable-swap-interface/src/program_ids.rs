//! Program ID and well-known address constants.
//!
//! Stable swap addresses are imported from the central `stable-swap-program-ids`
//! crate, which is the single source of truth, and decoded at compile time. Native
//! and SPL program IDs come from their interface crates.

use solana_pubkey::Pubkey;

// =============================================================================
// Program IDs (imported from stable-swap-program-ids crate)
// =============================================================================

/// Stable swap N-pool program ID.
pub const STABLE_SWAP_PROGRAM_ID: Pubkey = Pubkey::new_from_array(
    five8_const::decode_32_const(stable_swap_program_ids::STABLE_SWAP_N_POOL_ID),
);

/// SPL Token program ID.
pub const TOKEN_PROGRAM_ID: Pubkey =
    Pubkey::new_from_array(five8_const::decode_32_const(stable_swap_program_ids::SPL_TOKEN_ID));

/// SPL Associated Token Account program ID.
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey = spl_associated_token_account_interface::program::ID;

/// Well-known simulation identity used as fee payer for simulated queries.
pub const SIMULATION_USER: Pubkey =
    Pubkey::new_from_array(five8_const::decode_32_const(stable_swap_program_ids::SIMULATION_USER));

/// System program ID.
pub const SYSTEM_PROGRAM_ID: Pubkey = solana_system_interface::program::ID;
