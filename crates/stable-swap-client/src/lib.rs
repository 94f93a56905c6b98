//! Stable Swap Client
//!
//! Async client for the stable swap N-pool program.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    StableSwapPool (pool)                     │
//! │  • load / create / reload                                    │
//! │  • add_liquidity, remove_liquidity, exchange, ...            │
//! │  • get_mint_amount, get_virtual_price, get_out_amount, ...   │
//! └─────────────────────────────────────────────────────────────┘
//!        │ mutating calls             │ read-only queries
//!        ▼                            ▼
//! ┌──────────────────────┐   ┌───────────────────────────────┐
//! │  ScopedApproval      │   │  simulate_query               │
//! │  approve → op →      │   │  simulate as SIMULATION_USER  │
//! │  revoke, fresh       │   │  → find_log_and_parse         │
//! │  delegate per call   │   │                               │
//! └──────────────────────┘   └───────────────────────────────┘
//!        │                            │
//!        ▼                            ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │      TransactionSender / LedgerExecutor (caller-supplied)    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The program has no return channel. Mutating calls read their result from the
//! confirmed transaction's trace lines; queries dry-run the same instructions and
//! read the simulated trace lines instead. No network code lives in this crate.

pub mod approval;
pub mod config;
pub mod error;
pub mod executor;
pub mod logs;
pub mod pool;
pub mod simulation;
pub mod token;

pub use approval::ScopedApproval;
pub use config::ClientConfig;
pub use error::{BoxError, ClientError};
pub use executor::{LedgerExecutor, TransactionSender};
pub use logs::{
    GetDyUnderlying, GetMintAmount, GetVirtualPrice, GetWithdrawalAmount, GetWithdrawalAmounts,
    ReturnLog, TransactionResult, find_log_and_parse,
};
pub use pool::{CreatePoolParams, StableSwapPool};
pub use simulation::{SimulationAccounts, simulate_query};
