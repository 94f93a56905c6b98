//! Pool state account codec.
//!
//! # Layout (265 bytes, borsh)
//!
//! ```text
//! offset  size  field
//!      0     1  version
//!      1     1  is_initialized (0/1)
//!      2     1  nonce
//!      3     8  amplification_coefficient
//!     11     8  fee_numerator
//!     19     8  admin_fee_numerator
//!     27     4  token_accounts_length
//!     31     8  precision_factor
//!     39    32  precision_multipliers [u64; 4]
//!     71   128  token_accounts [Pubkey; 4]
//!    199    32  pool_mint
//!    231    32  admin_token_mint
//!    263     2  admin_settings { swap_enabled, add_liquidity_enabled }
//! ```
//!
//! The per-asset arrays are always `MAX_N_COINS` slots wide. Only the first
//! `token_accounts_length` slots are meaningful; the rest are dropped on decode
//! and written as zeros on encode.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_pubkey::Pubkey;

use crate::{MAX_N_COINS, StableSwapError};

/// Total span of the pool state account.
pub const POOL_STATE_SIZE: usize =
    3 + 3 * 8 + 4 + 8 + MAX_N_COINS * 8 + MAX_N_COINS * 32 + 2 * 32 + AdminSettings::SIZE;

/// Offset of the `is_initialized` flag.
pub const IS_INITIALIZED_OFFSET: usize = 1;

// ============================================================================
// Admin Settings
// ============================================================================

/// Administrative switches embedded in the pool state and in `initialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct AdminSettings {
    /// Whether `exchange` is accepted
    pub swap_enabled: bool,
    /// Whether `add_liquidity` is accepted
    pub add_liquidity_enabled: bool,
}

impl AdminSettings {
    /// Size in bytes
    pub const SIZE: usize = 2;

    /// Serialize to bytes
    ///
    /// # Errors
    /// `Encode` if borsh cannot fill the buffer.
    pub fn to_bytes(&self) -> Result<[u8; Self::SIZE], StableSwapError> {
        let mut bytes = [0u8; Self::SIZE];
        self.serialize(&mut bytes.as_mut_slice())
            .map_err(|e| StableSwapError::encode("admin settings", &e))?;
        Ok(bytes)
    }

    /// Deserialize from exactly [`AdminSettings::SIZE`] bytes.
    ///
    /// # Errors
    /// `InvalidLength` for a wrong span, `Malformed` for a non-`0`/`1` flag.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StableSwapError> {
        if bytes.len() != Self::SIZE {
            return Err(StableSwapError::InvalidLength {
                expected: Self::SIZE,
                actual: bytes.len(),
            });
        }
        borsh::from_slice(bytes).map_err(|e| StableSwapError::malformed("admin settings", &e))
    }
}

// ============================================================================
// Pool State
// ============================================================================

/// Raw account record, every slot present.
#[derive(BorshSerialize, BorshDeserialize)]
struct PoolStateRecord {
    version: u8,
    is_initialized: bool,
    nonce: u8,
    amplification_coefficient: u64,
    fee_numerator: u64,
    admin_fee_numerator: u64,
    token_accounts_length: u32,
    precision_factor: u64,
    precision_multipliers: [u64; MAX_N_COINS],
    token_accounts: [Pubkey; MAX_N_COINS],
    pool_mint: Pubkey,
    admin_token_mint: Pubkey,
    admin_settings: AdminSettings,
}

/// Decoded pool state account.
///
/// Read-only snapshot: it is rebuilt from account bytes on every load and never
/// mutated to mirror remote changes. Per-asset data is reachable only through
/// [`PoolState::token_accounts`] and [`PoolState::precision_multipliers`], which
/// both return exactly [`PoolState::asset_count`] entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolState {
    /// Layout version (informational, the codec always reads the latest layout)
    pub version: u8,
    /// False until the program has run `initialize` on this account
    pub is_initialized: bool,
    /// Bump used to derive the pool authority
    pub nonce: u8,
    /// Stable swap amplification coefficient (A)
    pub amplification_coefficient: u64,
    /// Trade fee numerator over `FEE_DENOMINATOR`
    pub fee_numerator: u64,
    /// Admin share of the trade fee, numerator over `FEE_DENOMINATOR`
    pub admin_fee_numerator: u64,
    /// Decimals every asset is normalized to
    pub precision_factor: u64,
    /// Pool LP token mint
    pub pool_mint: Pubkey,
    /// Mint of the admin token
    pub admin_token_mint: Pubkey,
    /// Administrative switches
    pub admin_settings: AdminSettings,
    asset_count: usize,
    precision_multipliers: [u64; MAX_N_COINS],
    token_accounts: [Pubkey; MAX_N_COINS],
}

impl PoolState {
    /// Size in bytes
    pub const SIZE: usize = POOL_STATE_SIZE;

    /// Create an initialized pool state for the given asset accounts.
    ///
    /// Scalar fields start at zero and admin switches off; set them directly.
    ///
    /// # Errors
    /// `InvalidAssetCount` unless `1 <= token_accounts.len() <= MAX_N_COINS`,
    /// `AssetCountMismatch` if the multipliers do not line up with the accounts.
    pub fn new(
        token_accounts: &[Pubkey],
        precision_multipliers: &[u64],
    ) -> Result<Self, StableSwapError> {
        let asset_count = validate_asset_count(token_accounts.len())?;
        if precision_multipliers.len() != asset_count {
            return Err(StableSwapError::AssetCountMismatch {
                field: "precision_multipliers",
                expected: asset_count,
                actual: precision_multipliers.len(),
            });
        }

        let mut state = Self {
            version: 0,
            is_initialized: true,
            nonce: 0,
            amplification_coefficient: 0,
            fee_numerator: 0,
            admin_fee_numerator: 0,
            precision_factor: 0,
            pool_mint: Pubkey::default(),
            admin_token_mint: Pubkey::default(),
            admin_settings: AdminSettings::default(),
            asset_count,
            precision_multipliers: [0; MAX_N_COINS],
            token_accounts: [Pubkey::default(); MAX_N_COINS],
        };
        state.token_accounts[..asset_count].copy_from_slice(token_accounts);
        state.precision_multipliers[..asset_count].copy_from_slice(precision_multipliers);
        Ok(state)
    }

    /// Number of assets held by the pool.
    pub const fn asset_count(&self) -> usize {
        self.asset_count
    }

    /// Pool asset token accounts, in pool order.
    pub fn token_accounts(&self) -> &[Pubkey] {
        &self.token_accounts[..self.asset_count]
    }

    /// Per-asset precision multipliers, in pool order.
    pub fn precision_multipliers(&self) -> &[u64] {
        &self.precision_multipliers[..self.asset_count]
    }

    /// Position of `token_account` among the pool's asset accounts.
    pub fn token_account_index(&self, token_account: &Pubkey) -> Option<usize> {
        self.token_accounts().iter().position(|a| a == token_account)
    }

    /// True for a full-span record whose `is_initialized` flag is `0`.
    ///
    /// Freshly allocated accounts are all zeros and would fail [`PoolState::from_bytes`]
    /// on `token_accounts_length`; this tells them apart from corrupt records.
    pub fn is_uninitialized_record(data: &[u8]) -> bool {
        data.len() == Self::SIZE && data[IS_INITIALIZED_OFFSET] == 0
    }

    /// Serialize to the account byte layout.
    ///
    /// # Errors
    /// `Encode` if borsh cannot fill the buffer.
    pub fn to_bytes(&self) -> Result<[u8; Self::SIZE], StableSwapError> {
        let mut precision_multipliers = [0u64; MAX_N_COINS];
        precision_multipliers[..self.asset_count].copy_from_slice(self.precision_multipliers());
        let mut token_accounts = [Pubkey::default(); MAX_N_COINS];
        token_accounts[..self.asset_count].copy_from_slice(self.token_accounts());

        let record = PoolStateRecord {
            version: self.version,
            is_initialized: self.is_initialized,
            nonce: self.nonce,
            amplification_coefficient: self.amplification_coefficient,
            fee_numerator: self.fee_numerator,
            admin_fee_numerator: self.admin_fee_numerator,
            // asset_count <= MAX_N_COINS
            token_accounts_length: self.asset_count as u32,
            precision_factor: self.precision_factor,
            precision_multipliers,
            token_accounts,
            pool_mint: self.pool_mint,
            admin_token_mint: self.admin_token_mint,
            admin_settings: self.admin_settings,
        };

        let mut bytes = [0u8; Self::SIZE];
        record
            .serialize(&mut bytes.as_mut_slice())
            .map_err(|e| StableSwapError::encode("pool state", &e))?;
        Ok(bytes)
    }

    /// Deserialize from raw account data.
    ///
    /// Padding slots beyond `token_accounts_length` are discarded.
    ///
    /// # Errors
    /// `InvalidLength` unless `data` is exactly [`POOL_STATE_SIZE`] bytes,
    /// `Malformed` for a non-`0`/`1` flag, `FieldOutOfRange` for a
    /// `token_accounts_length` outside `1..=MAX_N_COINS`.
    pub fn from_bytes(data: &[u8]) -> Result<Self, StableSwapError> {
        if data.len() != Self::SIZE {
            return Err(StableSwapError::InvalidLength {
                expected: Self::SIZE,
                actual: data.len(),
            });
        }

        let record: PoolStateRecord =
            borsh::from_slice(data).map_err(|e| StableSwapError::malformed("pool state", &e))?;
        let length = record.token_accounts_length;
        if length == 0 || length as usize > MAX_N_COINS {
            return Err(StableSwapError::FieldOutOfRange {
                field: "token_accounts_length",
                value: length.into(),
            });
        }
        let asset_count = length as usize;

        let mut precision_multipliers = [0u64; MAX_N_COINS];
        precision_multipliers[..asset_count]
            .copy_from_slice(&record.precision_multipliers[..asset_count]);
        let mut token_accounts = [Pubkey::default(); MAX_N_COINS];
        token_accounts[..asset_count].copy_from_slice(&record.token_accounts[..asset_count]);

        Ok(Self {
            version: record.version,
            is_initialized: record.is_initialized,
            nonce: record.nonce,
            amplification_coefficient: record.amplification_coefficient,
            fee_numerator: record.fee_numerator,
            admin_fee_numerator: record.admin_fee_numerator,
            precision_factor: record.precision_factor,
            pool_mint: record.pool_mint,
            admin_token_mint: record.admin_token_mint,
            admin_settings: record.admin_settings,
            asset_count,
            precision_multipliers,
            token_accounts,
        })
    }
}

/// Check a pool asset count against `1..=MAX_N_COINS`.
///
/// # Errors
/// `InvalidAssetCount` outside that range.
pub fn validate_asset_count(count: usize) -> Result<usize, StableSwapError> {
    if count == 0 || count > MAX_N_COINS {
        return Err(StableSwapError::InvalidAssetCount {
            count,
            max: MAX_N_COINS,
        });
    }
    Ok(count)
}
