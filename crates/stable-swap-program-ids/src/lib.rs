//! Single source of truth for all stable swap program IDs and well-known addresses.
//!
//! This crate defines addresses as `&'static str` base58 constants so they can be
//! decoded at compile time by dependent crates (see `stable-swap-interface`).
//!
//! # Usage
//!
//! ```rust,ignore
//! pub const STABLE_SWAP_PROGRAM_ID: Pubkey = Pubkey::new_from_array(
//!     five8_const::decode_32_const(stable_swap_program_ids::STABLE_SWAP_N_POOL_ID),
//! );
//! ```

#![no_std]

// =============================================================================
// Stable Swap N-Pool Program ID
// =============================================================================

/// Stable swap N-pool program ID.
///
/// Multi-asset (2 to 4 coins) stable swap pools with an LP mint per pool.
pub const STABLE_SWAP_N_POOL_ID: &str = "MERLuDFBMmsHnsBPZw2sDQZHvXFMwp8EdjudcU2HKky";

// =============================================================================
// Simulation Identity
// =============================================================================

/// Process-wide simulation identity.
///
/// Used as fee payer and transfer authority for simulated (never committed)
/// transactions, so read-only queries need no user signature. It owns one
/// associated token account per pool asset plus one for the pool LP mint.
pub const SIMULATION_USER: &str = "2YbB88p9EBTJijsxAkmaUjenTXJnmrJvp6MRyT5LiBiM";

// =============================================================================
// SPL Programs
// =============================================================================

/// SPL Token program ID.
pub const SPL_TOKEN_ID: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";

/// SPL Associated Token Account program ID.
pub const ASSOCIATED_TOKEN_ACCOUNT_ID: &str = "ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL";
