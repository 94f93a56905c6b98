//! Instruction payloads and account-list builders.
//!
//! Payloads are the borsh encoding of [`SwapInstruction`]: a one-byte variant index
//! followed by the variant's fields in declaration order. Per-asset vectors are a
//! `u32` count plus that many `u64`s, which makes `add_liquidity` /
//! `remove_liquidity` the only variable-length payloads; the largest possible
//! payload is [`MAX_INSTRUCTION_DATA_LEN`].
//!
//! The account list travels next to the payload, never inside it. Its order is
//! positional and fixed per operation:
//!
//! ```text
//! initialize:       pool(s,w) authority assets.. mints.. pool_mint(w) admin_mint(w)
//! add_liquidity:    pool    token_program authority delegate(s) assets(w)..
//!                   pool_mint(w) sources(w).. lp(w)
//! remove_liquidity: pool    token_program authority delegate(s) assets(w)..
//!                   pool_mint(w) dests(w).. lp(w)
//! remove_one:       pool(w) token_program authority delegate(s) assets(w)..
//!                   pool_mint(w) dest(w) lp(w)
//! exchange:         pool(w) token_program authority delegate(s) assets(w)..
//!                   source(w) dest(w)
//! virtual_price:    pool(w) token_program authority delegate(s) assets(w)..
//!                   pool_mint(w)
//! ```

use borsh::{BorshDeserialize, BorshSerialize};
use solana_instruction::{AccountMeta, Instruction};
use solana_pubkey::Pubkey;

use crate::{AdminSettings, MAX_N_COINS, StableSwapError, TOKEN_PROGRAM_ID, validate_asset_count};

/// Largest encoded payload: `add_liquidity` with `MAX_N_COINS` deposit amounts
/// (discriminant + vec count + amounts + min mint amount).
pub const MAX_INSTRUCTION_DATA_LEN: usize = 1 + 4 + MAX_N_COINS * 8 + 8;

/// Stable swap instruction discriminators
pub mod discriminators {
    /// Initialize
    pub const INITIALIZE: u8 = 0;
    /// AddLiquidity
    pub const ADD_LIQUIDITY: u8 = 1;
    /// RemoveLiquidity
    pub const REMOVE_LIQUIDITY: u8 = 2;
    /// RemoveLiquidityOneToken
    pub const REMOVE_LIQUIDITY_ONE_TOKEN: u8 = 3;
    /// Exchange
    pub const EXCHANGE: u8 = 4;
    /// GetVirtualPrice
    pub const GET_VIRTUAL_PRICE: u8 = 5;
    /// SetAdminSettingSwap
    pub const SET_ADMIN_SETTING_SWAP: u8 = 6;
    /// SetAdminSettingAddLiquidity
    pub const SET_ADMIN_SETTING_ADD_LIQUIDITY: u8 = 7;
}

/// Account indices shared by every delegate-authorized operation.
///
/// Pool asset accounts start at `FIRST_ASSET` and run for the pool's asset count;
/// the operation-specific accounts follow them.
pub mod account_layout {
    /// Pool state account
    pub const POOL: usize = 0;
    /// SPL Token program
    pub const TOKEN_PROGRAM: usize = 1;
    /// Pool authority PDA
    pub const AUTHORITY: usize = 2;
    /// Single-use delegate (signer)
    pub const DELEGATE: usize = 3;
    /// First pool asset token account
    pub const FIRST_ASSET: usize = 4;
}

// ============================================================================
// Instruction Payload
// ============================================================================

/// Instructions accepted by the stable swap N-pool program.
///
/// Variant order is the wire discriminant; see [`discriminators`].
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum SwapInstruction {
    /// Initialize a freshly allocated pool state account
    Initialize {
        /// Bump of the pool authority PDA
        nonce: u8,
        /// Number of pool assets
        n_coins: u8,
        /// Amplification coefficient (A)
        amplification_coefficient: u64,
        /// Trade fee numerator
        fee_numerator: u64,
        /// Admin fee numerator
        admin_fee_numerator: u64,
        /// Initial administrative switches
        admin_settings: AdminSettings,
    },
    /// Deposit pool assets and mint LP tokens
    AddLiquidity {
        /// One amount per pool asset
        deposit_amounts: Vec<u64>,
        /// Minimum LP tokens to mint
        min_mint_amount: u64,
    },
    /// Burn LP tokens and withdraw every pool asset
    RemoveLiquidity {
        /// LP tokens to burn
        unmint_amount: u64,
        /// One minimum per pool asset
        minimum_amounts: Vec<u64>,
    },
    /// Burn LP tokens and withdraw a single pool asset
    RemoveLiquidityOneToken {
        /// LP tokens to burn
        unmint_amount: u64,
        /// Minimum amount of the destination asset
        minimum_out_amount: u64,
    },
    /// Swap one pool asset for another
    Exchange {
        /// Amount of the source asset
        in_amount: u64,
        /// Minimum amount of the destination asset
        minimum_out_amount: u64,
    },
    /// Report the LP token virtual price
    GetVirtualPrice,
    /// Toggle `exchange`
    SetAdminSettingSwap {
        /// New value
        enabled: bool,
    },
    /// Toggle `add_liquidity`
    SetAdminSettingAddLiquidity {
        /// New value
        enabled: bool,
    },
}

impl SwapInstruction {
    /// Discriminant byte for this variant.
    pub const fn discriminator(&self) -> u8 {
        match self {
            Self::Initialize { .. } => discriminators::INITIALIZE,
            Self::AddLiquidity { .. } => discriminators::ADD_LIQUIDITY,
            Self::RemoveLiquidity { .. } => discriminators::REMOVE_LIQUIDITY,
            Self::RemoveLiquidityOneToken { .. } => discriminators::REMOVE_LIQUIDITY_ONE_TOKEN,
            Self::Exchange { .. } => discriminators::EXCHANGE,
            Self::GetVirtualPrice => discriminators::GET_VIRTUAL_PRICE,
            Self::SetAdminSettingSwap { .. } => discriminators::SET_ADMIN_SETTING_SWAP,
            Self::SetAdminSettingAddLiquidity { .. } => {
                discriminators::SET_ADMIN_SETTING_ADD_LIQUIDITY
            }
        }
    }

    /// Encode into instruction data.
    ///
    /// Writes into a scratch buffer reserved for [`MAX_INSTRUCTION_DATA_LEN`] and
    /// returns only the bytes actually written.
    ///
    /// # Errors
    /// `Encode` if borsh fails to write the payload.
    pub fn pack(&self) -> Result<Vec<u8>, StableSwapError> {
        let mut data = Vec::with_capacity(MAX_INSTRUCTION_DATA_LEN);
        self.serialize(&mut data)
            .map_err(|e| StableSwapError::encode("instruction data", &e))?;
        Ok(data)
    }

    /// Decode instruction data.
    ///
    /// # Errors
    /// `InvalidLength` for empty input, `UnknownInstruction` for an unrecognized
    /// discriminant, `Malformed` for a short or over-long payload or a
    /// non-`0`/`1` flag, `FieldOutOfRange` for a per-asset vector longer than
    /// `MAX_N_COINS`.
    pub fn unpack(data: &[u8]) -> Result<Self, StableSwapError> {
        let Some(&tag) = data.first() else {
            return Err(StableSwapError::InvalidLength {
                expected: 1,
                actual: 0,
            });
        };
        if tag > discriminators::SET_ADMIN_SETTING_ADD_LIQUIDITY {
            return Err(StableSwapError::UnknownInstruction(tag));
        }

        let instruction: Self = borsh::from_slice(data)
            .map_err(|e| StableSwapError::malformed("instruction data", &e))?;
        match &instruction {
            Self::AddLiquidity {
                deposit_amounts, ..
            } => check_vec_cap("deposit_amounts", deposit_amounts)?,
            Self::RemoveLiquidity {
                minimum_amounts, ..
            } => check_vec_cap("minimum_amounts", minimum_amounts)?,
            _ => {}
        }
        Ok(instruction)
    }
}

fn check_vec_cap(field: &'static str, values: &[u64]) -> Result<(), StableSwapError> {
    if values.len() > MAX_N_COINS {
        return Err(StableSwapError::FieldOutOfRange {
            field,
            value: values.len() as u64,
        });
    }
    Ok(())
}

// ============================================================================
// Account Lists
// ============================================================================

/// Pool-side accounts every builder needs.
#[derive(Clone, Copy, Debug)]
pub struct PoolKeys<'a> {
    /// Stable swap program
    pub program_id: &'a Pubkey,
    /// Pool state account
    pub pool: &'a Pubkey,
    /// Pool authority PDA
    pub authority: &'a Pubkey,
    /// Pool asset token accounts, in pool order
    pub token_accounts: &'a [Pubkey],
    /// Pool LP token mint
    pub pool_mint: &'a Pubkey,
}

impl PoolKeys<'_> {
    fn asset_count(&self) -> Result<usize, StableSwapError> {
        validate_asset_count(self.token_accounts.len())
    }

    /// `[pool, token_program, authority, delegate, assets..]`
    fn delegated_prefix(
        &self,
        pool_writable: bool,
        delegate: &Pubkey,
        extra: usize,
    ) -> Vec<AccountMeta> {
        let capacity = account_layout::FIRST_ASSET + self.token_accounts.len() + extra;
        let mut accounts = Vec::with_capacity(capacity);
        accounts.push(if pool_writable {
            AccountMeta::new(*self.pool, false)
        } else {
            AccountMeta::new_readonly(*self.pool, false)
        });
        accounts.push(AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false));
        accounts.push(AccountMeta::new_readonly(*self.authority, false));
        accounts.push(AccountMeta::new_readonly(*delegate, true));
        accounts.extend(
            self.token_accounts
                .iter()
                .map(|a| AccountMeta::new(*a, false)),
        );
        accounts
    }

    fn instruction(
        &self,
        accounts: Vec<AccountMeta>,
        payload: &SwapInstruction,
    ) -> Result<Instruction, StableSwapError> {
        Ok(Instruction {
            program_id: *self.program_id,
            accounts,
            data: payload.pack()?,
        })
    }
}

/// Fail fast when a per-asset argument does not line up with the pool.
fn check_per_asset(
    field: &'static str,
    expected: usize,
    actual: usize,
) -> Result<(), StableSwapError> {
    if expected != actual {
        return Err(StableSwapError::AssetCountMismatch {
            field,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Parameters of [`initialize`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InitializeParams {
    /// Bump of the pool authority PDA
    pub nonce: u8,
    /// Amplification coefficient (A)
    pub amplification_coefficient: u64,
    /// Trade fee numerator
    pub fee_numerator: u64,
    /// Admin fee numerator
    pub admin_fee_numerator: u64,
    /// Initial administrative switches
    pub admin_settings: AdminSettings,
}

/// Build an `Initialize` instruction.
///
/// The pool state account must sign: it is created in the same transaction.
///
/// # Errors
/// `InvalidAssetCount` for an unsupported pool size, `AssetCountMismatch` if
/// `token_mints` does not match the asset accounts.
pub fn initialize(
    keys: &PoolKeys<'_>,
    token_mints: &[Pubkey],
    admin_token_mint: &Pubkey,
    params: &InitializeParams,
) -> Result<Instruction, StableSwapError> {
    let n_coins = keys.asset_count()?;
    check_per_asset("token_mints", n_coins, token_mints.len())?;

    let mut accounts = Vec::with_capacity(2 + 2 * n_coins + 2);
    accounts.push(AccountMeta::new(*keys.pool, true));
    accounts.push(AccountMeta::new_readonly(*keys.authority, false));
    accounts.extend(
        keys.token_accounts
            .iter()
            .map(|a| AccountMeta::new_readonly(*a, false)),
    );
    accounts.extend(
        token_mints
            .iter()
            .map(|m| AccountMeta::new_readonly(*m, false)),
    );
    accounts.push(AccountMeta::new(*keys.pool_mint, false));
    accounts.push(AccountMeta::new(*admin_token_mint, false));

    let payload = SwapInstruction::Initialize {
        nonce: params.nonce,
        // n_coins <= MAX_N_COINS
        n_coins: n_coins as u8,
        amplification_coefficient: params.amplification_coefficient,
        fee_numerator: params.fee_numerator,
        admin_fee_numerator: params.admin_fee_numerator,
        admin_settings: params.admin_settings,
    };
    keys.instruction(accounts, &payload)
}

/// Build an `AddLiquidity` instruction.
///
/// `delegate` must hold approvals over every `user_source_accounts` entry.
///
/// # Errors
/// `InvalidAssetCount` for an unsupported pool size, `AssetCountMismatch` if the
/// source accounts or deposit amounts do not match the pool's asset count.
pub fn add_liquidity(
    keys: &PoolKeys<'_>,
    delegate: &Pubkey,
    user_source_accounts: &[Pubkey],
    user_lp_account: &Pubkey,
    deposit_amounts: &[u64],
    min_mint_amount: u64,
) -> Result<Instruction, StableSwapError> {
    let n_coins = keys.asset_count()?;
    check_per_asset("user_source_accounts", n_coins, user_source_accounts.len())?;
    check_per_asset("deposit_amounts", n_coins, deposit_amounts.len())?;

    let mut accounts = keys.delegated_prefix(false, delegate, 1 + n_coins + 1);
    accounts.push(AccountMeta::new(*keys.pool_mint, false));
    accounts.extend(
        user_source_accounts
            .iter()
            .map(|a| AccountMeta::new(*a, false)),
    );
    accounts.push(AccountMeta::new(*user_lp_account, false));

    let payload = SwapInstruction::AddLiquidity {
        deposit_amounts: deposit_amounts.to_vec(),
        min_mint_amount,
    };
    keys.instruction(accounts, &payload)
}

/// Build a `RemoveLiquidity` instruction.
///
/// `delegate` must hold an approval over `user_lp_account`.
///
/// # Errors
/// `InvalidAssetCount` for an unsupported pool size, `AssetCountMismatch` if the
/// destination accounts or minimum amounts do not match the pool's asset count.
pub fn remove_liquidity(
    keys: &PoolKeys<'_>,
    delegate: &Pubkey,
    user_destination_accounts: &[Pubkey],
    user_lp_account: &Pubkey,
    unmint_amount: u64,
    minimum_amounts: &[u64],
) -> Result<Instruction, StableSwapError> {
    let n_coins = keys.asset_count()?;
    check_per_asset(
        "user_destination_accounts",
        n_coins,
        user_destination_accounts.len(),
    )?;
    check_per_asset("minimum_amounts", n_coins, minimum_amounts.len())?;

    let mut accounts = keys.delegated_prefix(false, delegate, 1 + n_coins + 1);
    accounts.push(AccountMeta::new(*keys.pool_mint, false));
    accounts.extend(
        user_destination_accounts
            .iter()
            .map(|a| AccountMeta::new(*a, false)),
    );
    accounts.push(AccountMeta::new(*user_lp_account, false));

    let payload = SwapInstruction::RemoveLiquidity {
        unmint_amount,
        minimum_amounts: minimum_amounts.to_vec(),
    };
    keys.instruction(accounts, &payload)
}

/// Build a `RemoveLiquidityOneToken` instruction.
///
/// # Errors
/// `InvalidAssetCount` for an unsupported pool size.
pub fn remove_liquidity_one_token(
    keys: &PoolKeys<'_>,
    delegate: &Pubkey,
    user_destination_account: &Pubkey,
    user_lp_account: &Pubkey,
    unmint_amount: u64,
    minimum_out_amount: u64,
) -> Result<Instruction, StableSwapError> {
    keys.asset_count()?;

    let mut accounts = keys.delegated_prefix(true, delegate, 3);
    accounts.push(AccountMeta::new(*keys.pool_mint, false));
    accounts.push(AccountMeta::new(*user_destination_account, false));
    accounts.push(AccountMeta::new(*user_lp_account, false));

    let payload = SwapInstruction::RemoveLiquidityOneToken {
        unmint_amount,
        minimum_out_amount,
    };
    keys.instruction(accounts, &payload)
}

/// Build an `Exchange` instruction.
///
/// Emits `FIRST_ASSET + n + 2` accounts; the pool mint is not referenced.
///
/// # Errors
/// `InvalidAssetCount` for an unsupported pool size.
pub fn exchange(
    keys: &PoolKeys<'_>,
    delegate: &Pubkey,
    user_source_account: &Pubkey,
    user_destination_account: &Pubkey,
    in_amount: u64,
    minimum_out_amount: u64,
) -> Result<Instruction, StableSwapError> {
    keys.asset_count()?;

    let mut accounts = keys.delegated_prefix(true, delegate, 2);
    accounts.push(AccountMeta::new(*user_source_account, false));
    accounts.push(AccountMeta::new(*user_destination_account, false));

    let payload = SwapInstruction::Exchange {
        in_amount,
        minimum_out_amount,
    };
    keys.instruction(accounts, &payload)
}

/// Build a `GetVirtualPrice` instruction.
///
/// # Errors
/// `InvalidAssetCount` for an unsupported pool size.
pub fn get_virtual_price(
    keys: &PoolKeys<'_>,
    delegate: &Pubkey,
) -> Result<Instruction, StableSwapError> {
    keys.asset_count()?;

    let mut accounts = keys.delegated_prefix(true, delegate, 1);
    accounts.push(AccountMeta::new(*keys.pool_mint, false));
    keys.instruction(accounts, &SwapInstruction::GetVirtualPrice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn key(seed: u8) -> Pubkey {
        Pubkey::new_from_array([seed; 32])
    }

    struct Fixture {
        program_id: Pubkey,
        pool: Pubkey,
        authority: Pubkey,
        token_accounts: Vec<Pubkey>,
        pool_mint: Pubkey,
    }

    impl Fixture {
        fn new(n_coins: u8) -> Self {
            Self {
                program_id: key(200),
                pool: key(201),
                authority: key(202),
                token_accounts: (0..n_coins).map(|i| key(10 + i)).collect(),
                pool_mint: key(203),
            }
        }

        fn keys(&self) -> PoolKeys<'_> {
            PoolKeys {
                program_id: &self.program_id,
                pool: &self.pool,
                authority: &self.authority,
                token_accounts: &self.token_accounts,
                pool_mint: &self.pool_mint,
            }
        }
    }

    // ------------------------------------------------------------------------
    // Payload
    // ------------------------------------------------------------------------

    #[test]
    fn test_max_instruction_data_len_is_full_deposit() {
        let data = SwapInstruction::AddLiquidity {
            deposit_amounts: vec![u64::MAX; MAX_N_COINS],
            min_mint_amount: u64::MAX,
        }
        .pack()
        .unwrap();
        assert_eq!(data.len(), MAX_INSTRUCTION_DATA_LEN);
        assert_eq!(MAX_INSTRUCTION_DATA_LEN, 45);
    }

    #[test]
    fn test_pack_trims_to_written_bytes() {
        assert_eq!(SwapInstruction::GetVirtualPrice.pack().unwrap(), vec![5]);
        let swap = SwapInstruction::Exchange {
            in_amount: 1,
            minimum_out_amount: 2,
        };
        assert_eq!(swap.pack().unwrap().len(), 17);
    }

    #[test]
    fn test_initialize_payload_layout() {
        let data = SwapInstruction::Initialize {
            nonce: 255,
            n_coins: 3,
            amplification_coefficient: 100,
            fee_numerator: 4_000_000,
            admin_fee_numerator: 1,
            admin_settings: AdminSettings {
                swap_enabled: true,
                add_liquidity_enabled: false,
            },
        }
        .pack()
        .unwrap();

        assert_eq!(data.len(), 1 + 1 + 1 + 3 * 8 + 2);
        assert_eq!(data[0], discriminators::INITIALIZE);
        assert_eq!(data[1], 255);
        assert_eq!(data[2], 3);
        assert_eq!(&data[3..11], &100u64.to_le_bytes());
        assert_eq!(&data[11..19], &4_000_000u64.to_le_bytes());
        assert_eq!(&data[19..27], &1u64.to_le_bytes());
        assert_eq!(&data[27..29], &[1, 0]);
    }

    #[test]
    fn test_remove_liquidity_payload_layout() {
        let data = SwapInstruction::RemoveLiquidity {
            unmint_amount: 10_000_000,
            minimum_amounts: vec![0, 0, 0],
        }
        .pack()
        .unwrap();
        assert_eq!(data[0], discriminators::REMOVE_LIQUIDITY);
        assert_eq!(&data[1..9], &10_000_000u64.to_le_bytes());
        assert_eq!(&data[9..13], &3u32.to_le_bytes());
        assert_eq!(data.len(), 13 + 3 * 8);
    }

    #[test]
    fn test_unpack_inverts_pack() {
        let instruction = SwapInstruction::AddLiquidity {
            deposit_amounts: vec![10_000_000, 20_000_000, 30_000_000],
            min_mint_amount: 0,
        };
        let data = instruction.pack().unwrap();
        assert_eq!(SwapInstruction::unpack(&data), Ok(instruction));
    }

    #[test]
    fn test_variant_index_is_discriminator() {
        let instructions = [
            SwapInstruction::Initialize {
                nonce: 1,
                n_coins: 2,
                amplification_coefficient: 3,
                fee_numerator: 4,
                admin_fee_numerator: 5,
                admin_settings: AdminSettings::default(),
            },
            SwapInstruction::AddLiquidity {
                deposit_amounts: vec![1],
                min_mint_amount: 0,
            },
            SwapInstruction::RemoveLiquidity {
                unmint_amount: 1,
                minimum_amounts: vec![0],
            },
            SwapInstruction::RemoveLiquidityOneToken {
                unmint_amount: 1,
                minimum_out_amount: 0,
            },
            SwapInstruction::Exchange {
                in_amount: 1,
                minimum_out_amount: 0,
            },
            SwapInstruction::GetVirtualPrice,
            SwapInstruction::SetAdminSettingSwap { enabled: true },
            SwapInstruction::SetAdminSettingAddLiquidity { enabled: false },
        ];
        for (index, instruction) in instructions.iter().enumerate() {
            assert_eq!(instruction.discriminator() as usize, index);
            assert_eq!(instruction.pack().unwrap()[0], instruction.discriminator());
        }
    }

    #[test_case(b"" => StableSwapError::InvalidLength { expected: 1, actual: 0 } ; "empty")]
    #[test_case(&[9] => StableSwapError::UnknownInstruction(9) ; "unknown discriminant")]
    fn test_unpack_rejects_header(data: &[u8]) -> StableSwapError {
        SwapInstruction::unpack(data).unwrap_err()
    }

    #[test_case(&[4, 1, 0, 0] ; "short exchange")]
    #[test_case(&[5, 0] ; "trailing bytes")]
    #[test_case(&[6, 2] ; "bad flag")]
    #[test_case(&[1, 1, 0, 0, 0] ; "vec count beyond input")]
    fn test_unpack_rejects_malformed_payload(data: &[u8]) {
        let err = SwapInstruction::unpack(data).unwrap_err();
        assert!(matches!(
            err,
            StableSwapError::Malformed {
                target: "instruction data",
                ..
            }
        ));
        assert!(err.is_malformed_record());
    }

    #[test]
    fn test_unpack_rejects_vec_longer_than_max_coins() {
        let mut data = vec![discriminators::ADD_LIQUIDITY];
        data.extend_from_slice(&5u32.to_le_bytes());
        data.extend_from_slice(&[0u8; 5 * 8 + 8]);
        assert_eq!(
            SwapInstruction::unpack(&data),
            Err(StableSwapError::FieldOutOfRange {
                field: "deposit_amounts",
                value: 5
            })
        );
    }

    // ------------------------------------------------------------------------
    // Account lists
    // ------------------------------------------------------------------------

    #[test_case(1)]
    #[test_case(3)]
    #[test_case(4)]
    fn test_exchange_account_order(n_coins: u8) {
        let fixture = Fixture::new(n_coins);
        let delegate = key(99);
        let ix = exchange(&fixture.keys(), &delegate, &key(50), &key(51), 10, 0).unwrap();

        let n = n_coins as usize;
        assert_eq!(ix.accounts.len(), account_layout::FIRST_ASSET + n + 2);
        assert_eq!(ix.accounts[account_layout::POOL].pubkey, fixture.pool);
        assert!(ix.accounts[account_layout::POOL].is_writable);
        assert_eq!(ix.accounts[account_layout::TOKEN_PROGRAM].pubkey, TOKEN_PROGRAM_ID);
        assert_eq!(ix.accounts[account_layout::AUTHORITY].pubkey, fixture.authority);
        assert_eq!(ix.accounts[account_layout::DELEGATE].pubkey, delegate);
        assert!(ix.accounts[account_layout::DELEGATE].is_signer);
        for (i, asset) in fixture.token_accounts.iter().enumerate() {
            let meta = &ix.accounts[account_layout::FIRST_ASSET + i];
            assert_eq!(&meta.pubkey, asset);
            assert!(meta.is_writable && !meta.is_signer);
        }
        assert_eq!(ix.accounts[account_layout::FIRST_ASSET + n].pubkey, key(50));
        assert_eq!(ix.accounts[account_layout::FIRST_ASSET + n + 1].pubkey, key(51));
        assert_eq!(ix.program_id, fixture.program_id);
    }

    #[test]
    fn test_only_delegate_signs_delegated_operations() {
        let fixture = Fixture::new(3);
        let keys = fixture.keys();
        let delegate = key(99);
        let users = [key(60), key(61), key(62)];
        let ixs = [
            add_liquidity(&keys, &delegate, &users, &key(70), &[1, 2, 3], 0).unwrap(),
            remove_liquidity(&keys, &delegate, &users, &key(70), 5, &[0, 0, 0]).unwrap(),
            remove_liquidity_one_token(&keys, &delegate, &key(60), &key(70), 5, 0).unwrap(),
            exchange(&keys, &delegate, &key(60), &key(61), 5, 0).unwrap(),
            get_virtual_price(&keys, &delegate).unwrap(),
        ];
        for ix in ixs {
            let signers: Vec<_> = ix
                .accounts
                .iter()
                .filter(|m| m.is_signer)
                .map(|m| m.pubkey)
                .collect();
            assert_eq!(signers, vec![delegate]);
        }
    }

    #[test]
    fn test_add_liquidity_account_order() {
        let fixture = Fixture::new(3);
        let sources = [key(60), key(61), key(62)];
        let ix =
            add_liquidity(&fixture.keys(), &key(99), &sources, &key(70), &[1, 2, 3], 4).unwrap();

        assert_eq!(ix.accounts.len(), 4 + 3 + 1 + 3 + 1);
        assert!(!ix.accounts[account_layout::POOL].is_writable);
        assert_eq!(ix.accounts[7].pubkey, fixture.pool_mint);
        assert!(ix.accounts[7].is_writable);
        let tail: Vec<_> = ix.accounts[8..].iter().map(|m| m.pubkey).collect();
        assert_eq!(tail, vec![key(60), key(61), key(62), key(70)]);
        assert_eq!(
            SwapInstruction::unpack(&ix.data),
            Ok(SwapInstruction::AddLiquidity {
                deposit_amounts: vec![1, 2, 3],
                min_mint_amount: 4
            })
        );
    }

    #[test]
    fn test_remove_liquidity_one_token_account_order() {
        let fixture = Fixture::new(2);
        let ix = remove_liquidity_one_token(&fixture.keys(), &key(99), &key(60), &key(70), 5, 1)
            .unwrap();
        let tail: Vec<_> = ix.accounts[6..].iter().map(|m| m.pubkey).collect();
        assert_eq!(tail, vec![fixture.pool_mint, key(60), key(70)]);
        assert!(ix.accounts[account_layout::POOL].is_writable);
    }

    #[test]
    fn test_get_virtual_price_account_order() {
        let fixture = Fixture::new(3);
        let ix = get_virtual_price(&fixture.keys(), &key(99)).unwrap();
        assert_eq!(ix.accounts.len(), 4 + 3 + 1);
        assert_eq!(ix.accounts[7].pubkey, fixture.pool_mint);
        assert_eq!(ix.data, vec![discriminators::GET_VIRTUAL_PRICE]);
    }

    #[test]
    fn test_initialize_account_order() {
        let fixture = Fixture::new(2);
        let mints = [key(80), key(81)];
        let params = InitializeParams {
            nonce: 254,
            amplification_coefficient: 100,
            fee_numerator: 0,
            admin_fee_numerator: 0,
            admin_settings: AdminSettings::default(),
        };
        let ix = initialize(&fixture.keys(), &mints, &key(90), &params).unwrap();

        let order: Vec<_> = ix.accounts.iter().map(|m| m.pubkey).collect();
        assert_eq!(
            order,
            vec![
                fixture.pool,
                fixture.authority,
                key(10),
                key(11),
                key(80),
                key(81),
                fixture.pool_mint,
                key(90)
            ]
        );
        assert!(ix.accounts[0].is_signer && ix.accounts[0].is_writable);
        assert!(ix.accounts[1..6].iter().all(|m| !m.is_writable && !m.is_signer));
        assert!(ix.accounts[6].is_writable && ix.accounts[7].is_writable);
        assert_eq!(ix.data[2], 2);
    }

    #[test]
    fn test_per_asset_mismatch_fails_before_encoding() {
        let fixture = Fixture::new(3);
        let sources = [key(60), key(61), key(62)];
        assert_eq!(
            add_liquidity(&fixture.keys(), &key(99), &sources, &key(70), &[1, 2], 0)
                .unwrap_err(),
            StableSwapError::AssetCountMismatch {
                field: "deposit_amounts",
                expected: 3,
                actual: 2
            }
        );
        assert_eq!(
            remove_liquidity(&fixture.keys(), &key(99), &sources[..1], &key(70), 1, &[0, 0, 0])
                .unwrap_err(),
            StableSwapError::AssetCountMismatch {
                field: "user_destination_accounts",
                expected: 3,
                actual: 1
            }
        );
    }

    #[test_case(0)]
    #[test_case(5)]
    fn test_unsupported_pool_size_is_rejected(n_coins: u8) {
        let fixture = Fixture::new(n_coins);
        assert_eq!(
            get_virtual_price(&fixture.keys(), &key(99)).unwrap_err(),
            StableSwapError::InvalidAssetCount {
                count: n_coins as usize,
                max: MAX_N_COINS
            }
        );
    }
}
