//! Client configuration.
//!
//! Addresses are base58 strings when serialized and [`Pubkey`]s in memory. Every
//! field is optional on the wire and falls back to [`ClientConfig::default`].

use serde::{Deserialize, Serialize};
use solana_pubkey::Pubkey;
use stable_swap_interface::{SIMULATION_USER, STABLE_SWAP_PROGRAM_ID};

/// Default delay between settle polls after pool creation.
pub const DEFAULT_SETTLE_POLL_INTERVAL_MS: u64 = 500;
/// Default number of settle polls before giving up.
pub const DEFAULT_SETTLE_MAX_ATTEMPTS: u32 = 20;
/// Default lamports moved to the simulation identity when provisioning it.
pub const DEFAULT_SIMULATION_FUNDING_LAMPORTS: u64 = 100_000_000;

/// Settings shared by every pool handle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Stable swap program
    #[serde(with = "pubkey_str")]
    pub program_id: Pubkey,
    /// Fee payer and delegate of simulated queries
    #[serde(with = "pubkey_str")]
    pub simulation_user: Pubkey,
    /// Delay between settle polls after `create`
    pub settle_poll_interval_ms: u64,
    /// Settle polls before `create` reports a timeout
    pub settle_max_attempts: u32,
    /// Lamports sent to the simulation identity during provisioning
    pub simulation_funding_lamports: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            program_id: STABLE_SWAP_PROGRAM_ID,
            simulation_user: SIMULATION_USER,
            settle_poll_interval_ms: DEFAULT_SETTLE_POLL_INTERVAL_MS,
            settle_max_attempts: DEFAULT_SETTLE_MAX_ATTEMPTS,
            simulation_funding_lamports: DEFAULT_SIMULATION_FUNDING_LAMPORTS,
        }
    }
}

mod pubkey_str {
    use std::str::FromStr;

    use serde::{Deserialize, Deserializer, Serializer, de::Error};
    use solana_pubkey::Pubkey;

    pub fn serialize<S: Serializer>(pubkey: &Pubkey, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(pubkey)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Pubkey, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        Pubkey::from_str(&encoded).map_err(|e| D::Error::custom(format!("{encoded}: {e}")))
    }
}
