//! Stable Swap Interface
//!
//! Wire layer shared by every client of the stable swap N-pool program.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  stable-swap-client (async)                  │
//! │  • Loads pool state, issues mutating calls                   │
//! │  • Simulated queries (results scraped from trace lines)      │
//! └─────────────────────────────────────────────────────────────┘
//!               │                           │
//!               ▼                           ▼
//! ┌─────────────────────────┐   ┌─────────────────────────┐
//! │   state (layout codec)  │   │  instruction (encoder)  │
//! │  • PoolState, 265 bytes │◄──│  • SwapInstruction      │
//! │  • AdminSettings        │   │  • Ordered AccountMetas │
//! └─────────────────────────┘   └─────────────────────────┘
//! ```
//!
//! Both the pool state record and instruction payloads are borsh: little-endian
//! integers, 32 raw bytes per address and a single `0`/`1` byte per boolean. The
//! pool state account has a fixed span ([`POOL_STATE_SIZE`]); instruction payloads
//! are a one-byte variant index followed by the variant's fields, with per-asset
//! vectors carried as a `u32` count and that many `u64`s.
//!
//! # Modules
//!
//! - [`state`]: Pool state record codec
//! - [`instruction`]: Instruction payloads and account-list builders
//! - [`pda`]: Pool authority and associated token address derivation
//! - [`error`]: Codec and encoder errors
//! - [`program_ids`]: Decoded program ID constants

pub mod error;
pub mod instruction;
pub mod pda;
pub mod program_ids;
pub mod state;

pub use error::*;
pub use instruction::*;
pub use pda::*;
pub use program_ids::*;
pub use state::*;

/// Maximum number of assets a single pool can hold.
pub const MAX_N_COINS: usize = 4;

/// Denominator for `fee_numerator` and `admin_fee_numerator` (1e10 = 100%).
pub const FEE_DENOMINATOR: u64 = 10_000_000_000;
