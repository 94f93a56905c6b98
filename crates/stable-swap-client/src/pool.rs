//! Pool handle: loading, creation, mutating calls and simulated queries.

use std::{sync::Arc, time::Duration};

use solana_instruction::Instruction;
use solana_keypair::Keypair;
use solana_pubkey::Pubkey;
use solana_signer::Signer;
use solana_system_interface::instruction::create_account;
use spl_token_interface::instruction::initialize_account;
use stable_swap_interface::{
    AdminSettings, InitializeParams, POOL_STATE_SIZE, PoolKeys, PoolState, StableSwapError,
    TOKEN_PROGRAM_ID, find_pool_authority, instruction, validate_asset_count,
};
use tracing::{debug, info, warn};

use crate::{
    ClientConfig, ClientError, LedgerExecutor, ScopedApproval, SimulationAccounts,
    TransactionSender,
    logs::{
        GetDyUnderlying, GetMintAmount, GetVirtualPrice, GetWithdrawalAmount,
        GetWithdrawalAmounts, ReturnLog, TransactionResult, parse_return_log,
    },
    simulation::simulate_query,
    token::{TOKEN_ACCOUNT_LEN, token_account_mint},
};

/// Arguments of [`StableSwapPool::create`].
pub struct CreatePoolParams<'a> {
    /// Fresh keypair for the pool state account
    pub pool_account: &'a Keypair,
    /// Pool asset token accounts, owned by the pool authority
    pub token_accounts: &'a [Pubkey],
    /// LP token mint, mint authority is the pool authority
    pub pool_mint: Pubkey,
    /// Admin token mint
    pub admin_token_mint: Pubkey,
    /// Amplification coefficient (A)
    pub amplification_coefficient: u64,
    /// Trade fee numerator over `FEE_DENOMINATOR`
    pub fee_numerator: u64,
    /// Admin fee numerator over `FEE_DENOMINATOR`
    pub admin_fee_numerator: u64,
    /// Whether deposits are open from the start
    pub add_liquidity_enabled: bool,
}

/// Client handle for one stable swap pool.
///
/// Holds a snapshot of the pool state taken at load time; call
/// [`StableSwapPool::reload`] to observe remote changes.
pub struct StableSwapPool<E: LedgerExecutor + ?Sized> {
    executor: Arc<E>,
    config: ClientConfig,
    address: Pubkey,
    authority: Pubkey,
    state: PoolState,
    token_mints: Vec<Pubkey>,
    simulation_accounts: SimulationAccounts,
}

impl<E: LedgerExecutor + ?Sized> StableSwapPool<E> {
    // ========================================================================
    // Loading
    // ========================================================================

    /// Load the pool whose state lives at `address`.
    ///
    /// # Errors
    /// `MissingAccountData` for an absent pool or asset account, `MalformedRecord`
    /// or `UninitializedState` for an unusable state record, `InvalidTokenAccount`
    /// for an asset account that is not an SPL token account.
    pub async fn load(
        executor: Arc<E>,
        config: ClientConfig,
        address: Pubkey,
    ) -> Result<Self, ClientError> {
        let data = fetch_account(executor.as_ref(), &address).await?;
        if PoolState::is_uninitialized_record(&data) {
            return Err(ClientError::UninitializedState { address });
        }
        let state = PoolState::from_bytes(&data)
            .map_err(|source| ClientError::MalformedRecord { address, source })?;

        let token_mints = fetch_token_mints(executor.as_ref(), state.token_accounts()).await?;
        let (authority, _) = find_pool_authority(&address, &config.program_id);
        let simulation_accounts =
            SimulationAccounts::derive(config.simulation_user, &token_mints, &state.pool_mint);

        info!(pool = %address, assets = state.asset_count(), "loaded pool");
        Ok(Self {
            executor,
            config,
            address,
            authority,
            state,
            token_mints,
            simulation_accounts,
        })
    }

    /// Load a fresh snapshot of this pool.
    ///
    /// # Errors
    /// See [`StableSwapPool::load`].
    pub async fn reload(&self) -> Result<Self, ClientError> {
        Self::load(Arc::clone(&self.executor), self.config.clone(), self.address).await
    }

    /// Create and initialize a pool, then load it once the state settles.
    ///
    /// With a `simulation_funder` the simulation identity is funded and its token
    /// accounts are created first; without one they are assumed to exist. The
    /// request is validated before anything is sent.
    ///
    /// # Errors
    /// `InvalidRequest` for an unsupported asset count, `SettleTimeout` if the state
    /// never reads back as initialized, plus the errors of [`StableSwapPool::load`].
    pub async fn create<S>(
        executor: Arc<E>,
        sender: &S,
        config: ClientConfig,
        params: &CreatePoolParams<'_>,
        simulation_funder: Option<&dyn TransactionSender>,
    ) -> Result<Self, ClientError>
    where
        S: TransactionSender + ?Sized,
    {
        let address = params.pool_account.pubkey();
        let invalid = |source: StableSwapError| ClientError::InvalidRequest {
            pool: address,
            source,
        };
        validate_asset_count(params.token_accounts.len()).map_err(invalid)?;
        let token_mints = fetch_token_mints(executor.as_ref(), params.token_accounts).await?;

        let (authority, nonce) = find_pool_authority(&address, &config.program_id);
        let keys = PoolKeys {
            program_id: &config.program_id,
            pool: &address,
            authority: &authority,
            token_accounts: params.token_accounts,
            pool_mint: &params.pool_mint,
        };
        let initialize = instruction::initialize(
            &keys,
            &token_mints,
            &params.admin_token_mint,
            &InitializeParams {
                nonce,
                amplification_coefficient: params.amplification_coefficient,
                fee_numerator: params.fee_numerator,
                admin_fee_numerator: params.admin_fee_numerator,
                admin_settings: AdminSettings {
                    swap_enabled: true,
                    add_liquidity_enabled: params.add_liquidity_enabled,
                },
            },
        )
        .map_err(invalid)?;

        if let Some(funder) = simulation_funder {
            SimulationAccounts::provision(
                executor.as_ref(),
                funder,
                config.simulation_user,
                &token_mints,
                &params.pool_mint,
                config.simulation_funding_lamports,
            )
            .await?;
        }

        let lamports = Self::minimum_balance_for_rent_exempt_pool_state(executor.as_ref()).await?;
        let instructions = [
            create_account(
                &sender.payer(),
                &address,
                lamports,
                POOL_STATE_SIZE as u64,
                &config.program_id,
            ),
            initialize,
        ];
        let signature = sender
            .send(&instructions, &[params.pool_account])
            .await
            .map_err(ClientError::Executor)?;
        info!(pool = %address, %signature, "submitted pool creation");

        wait_until_initialized(executor.as_ref(), &config, &address).await?;
        Self::load(executor, config, address).await
    }

    /// Lamports that keep a pool state account rent exempt.
    ///
    /// # Errors
    /// `Executor` if the rent query fails.
    pub async fn minimum_balance_for_rent_exempt_pool_state(
        executor: &E,
    ) -> Result<u64, ClientError> {
        executor
            .minimum_balance_for_rent_exemption(POOL_STATE_SIZE)
            .await
            .map_err(ClientError::Executor)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Pool state account.
    pub const fn address(&self) -> &Pubkey {
        &self.address
    }

    /// Pool authority PDA.
    pub const fn authority(&self) -> &Pubkey {
        &self.authority
    }

    /// State snapshot taken at load time.
    pub const fn state(&self) -> &PoolState {
        &self.state
    }

    /// Mint of each pool asset, in pool order.
    pub fn token_mints(&self) -> &[Pubkey] {
        &self.token_mints
    }

    /// Simulation identity's token accounts for this pool.
    pub const fn simulation_accounts(&self) -> &SimulationAccounts {
        &self.simulation_accounts
    }

    /// Client settings.
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn keys(&self) -> PoolKeys<'_> {
        PoolKeys {
            program_id: &self.config.program_id,
            pool: &self.address,
            authority: &self.authority,
            token_accounts: self.state.token_accounts(),
            pool_mint: &self.state.pool_mint,
        }
    }

    fn invalid_request(&self, source: StableSwapError) -> ClientError {
        ClientError::InvalidRequest {
            pool: self.address,
            source,
        }
    }

    fn asset_index(&self, mint: &Pubkey) -> Result<usize, ClientError> {
        self.token_mints
            .iter()
            .position(|m| m == mint)
            .ok_or(ClientError::UnknownAsset { mint: *mint })
    }

    // ========================================================================
    // Mutating Calls
    // ========================================================================

    /// Deposit `deposit_amounts` from `user_source_accounts` and mint LP tokens.
    ///
    /// `prefix` instructions run first in the same transaction.
    ///
    /// # Errors
    /// `InvalidRequest` if the per-asset arguments do not match the pool,
    /// `Executor` on submission failure, `ResultNotFound` if the confirmed
    /// transaction did not log a mint amount.
    pub async fn add_liquidity<S: TransactionSender + ?Sized>(
        &self,
        sender: &S,
        user_source_accounts: &[Pubkey],
        user_lp_account: &Pubkey,
        deposit_amounts: &[u64],
        min_mint_amount: u64,
        prefix: Vec<Instruction>,
    ) -> Result<TransactionResult<GetMintAmount>, ClientError> {
        let mut approval = ScopedApproval::new(sender.payer());
        let operation = instruction::add_liquidity(
            &self.keys(),
            &approval.delegate(),
            user_source_accounts,
            user_lp_account,
            deposit_amounts,
            min_mint_amount,
        )
        .map_err(|e| self.invalid_request(e))?;
        for (account, amount) in user_source_accounts.iter().zip(deposit_amounts) {
            approval.grant(*account, *amount);
        }
        self.send_scoped(sender, prefix, &approval, operation).await
    }

    /// Burn `unmint_amount` LP tokens and withdraw every asset.
    ///
    /// # Errors
    /// `InvalidRequest` if the per-asset arguments do not match the pool,
    /// `Executor` on submission failure, `ResultNotFound` if the confirmed
    /// transaction did not log withdrawal amounts.
    pub async fn remove_liquidity<S: TransactionSender + ?Sized>(
        &self,
        sender: &S,
        user_destination_accounts: &[Pubkey],
        user_lp_account: &Pubkey,
        unmint_amount: u64,
        minimum_amounts: &[u64],
        prefix: Vec<Instruction>,
    ) -> Result<TransactionResult<GetWithdrawalAmounts>, ClientError> {
        let mut approval = ScopedApproval::new(sender.payer());
        let operation = instruction::remove_liquidity(
            &self.keys(),
            &approval.delegate(),
            user_destination_accounts,
            user_lp_account,
            unmint_amount,
            minimum_amounts,
        )
        .map_err(|e| self.invalid_request(e))?;
        approval.grant(*user_lp_account, unmint_amount);
        self.send_scoped(sender, prefix, &approval, operation).await
    }

    /// Burn `unmint_amount` LP tokens and withdraw a single asset.
    ///
    /// # Errors
    /// `Executor` on submission failure, `ResultNotFound` if the confirmed
    /// transaction did not log a withdrawal amount.
    pub async fn remove_liquidity_one_token<S: TransactionSender + ?Sized>(
        &self,
        sender: &S,
        user_destination_account: &Pubkey,
        user_lp_account: &Pubkey,
        unmint_amount: u64,
        minimum_out_amount: u64,
        prefix: Vec<Instruction>,
    ) -> Result<TransactionResult<GetWithdrawalAmount>, ClientError> {
        let mut approval = ScopedApproval::new(sender.payer());
        let operation = instruction::remove_liquidity_one_token(
            &self.keys(),
            &approval.delegate(),
            user_destination_account,
            user_lp_account,
            unmint_amount,
            minimum_out_amount,
        )
        .map_err(|e| self.invalid_request(e))?;
        approval.grant(*user_lp_account, unmint_amount);
        self.send_scoped(sender, prefix, &approval, operation).await
    }

    /// Swap `in_amount` out of `user_source_account` into `user_destination_account`.
    ///
    /// # Errors
    /// `Executor` on submission failure, `ResultNotFound` if the confirmed
    /// transaction did not log an output amount.
    pub async fn exchange<S: TransactionSender + ?Sized>(
        &self,
        sender: &S,
        user_source_account: &Pubkey,
        user_destination_account: &Pubkey,
        in_amount: u64,
        minimum_out_amount: u64,
        prefix: Vec<Instruction>,
    ) -> Result<TransactionResult<GetDyUnderlying>, ClientError> {
        let mut approval = ScopedApproval::new(sender.payer());
        let operation = instruction::exchange(
            &self.keys(),
            &approval.delegate(),
            user_source_account,
            user_destination_account,
            in_amount,
            minimum_out_amount,
        )
        .map_err(|e| self.invalid_request(e))?;
        approval.grant(*user_source_account, in_amount);
        self.send_scoped(sender, prefix, &approval, operation).await
    }

    async fn send_scoped<S, T>(
        &self,
        sender: &S,
        prefix: Vec<Instruction>,
        approval: &ScopedApproval,
        operation: Instruction,
    ) -> Result<TransactionResult<T>, ClientError>
    where
        S: TransactionSender + ?Sized,
        T: ReturnLog,
    {
        let mut instructions = prefix;
        instructions.extend(approval.wrap(operation)?);

        let signature = sender
            .send(&instructions, &[approval.signer()])
            .await
            .map_err(ClientError::Executor)?;
        debug!(
            pool = %self.address,
            %signature,
            result = T::NAME,
            "confirmed pool operation"
        );

        let logs = self
            .executor
            .transaction_logs(&signature)
            .await
            .map_err(ClientError::Executor)?;
        let result = parse_return_log(logs.as_deref())?;
        Ok(TransactionResult { signature, result })
    }

    // ========================================================================
    // Simulated Queries
    // ========================================================================

    async fn query<T: ReturnLog>(&self, instructions: &[Instruction]) -> Result<T, ClientError> {
        simulate_query(
            self.executor.as_ref(),
            instructions,
            &self.config.simulation_user,
        )
        .await
    }

    /// LP tokens minted for depositing `deposit_amounts`.
    ///
    /// # Errors
    /// `InvalidRequest` if `deposit_amounts` does not match the pool,
    /// `ResultNotFound` if the simulation logged no mint amount.
    pub async fn get_mint_amount(&self, deposit_amounts: &[u64]) -> Result<u64, ClientError> {
        let sim = &self.simulation_accounts;
        let ix = instruction::add_liquidity(
            &self.keys(),
            &sim.owner,
            &sim.token_accounts,
            &sim.lp_token_account,
            deposit_amounts,
            0,
        )
        .map_err(|e| self.invalid_request(e))?;
        let result: GetMintAmount = self.query(&[ix]).await?;
        Ok(result.mint_amount)
    }

    /// Per-asset amounts returned for burning `unmint_amount` LP tokens.
    ///
    /// # Errors
    /// `ResultNotFound` if the simulation logged no withdrawal amounts.
    pub async fn get_withdrawal_amounts(
        &self,
        unmint_amount: u64,
    ) -> Result<GetWithdrawalAmounts, ClientError> {
        let sim = &self.simulation_accounts;
        let minimum_amounts = vec![0; self.state.asset_count()];
        let ix = instruction::remove_liquidity(
            &self.keys(),
            &sim.owner,
            &sim.token_accounts,
            &sim.lp_token_account,
            unmint_amount,
            &minimum_amounts,
        )
        .map_err(|e| self.invalid_request(e))?;
        self.query(&[ix]).await
    }

    /// Amount of `destination_mint` returned for burning `unmint_amount` LP tokens.
    ///
    /// # Errors
    /// `UnknownAsset` if `destination_mint` is not a pool asset, `ResultNotFound`
    /// if the simulation logged no withdrawal amount.
    pub async fn get_withdrawal_amount(
        &self,
        destination_mint: &Pubkey,
        unmint_amount: u64,
    ) -> Result<GetWithdrawalAmount, ClientError> {
        let index = self.asset_index(destination_mint)?;
        let sim = &self.simulation_accounts;
        let ix = instruction::remove_liquidity_one_token(
            &self.keys(),
            &sim.owner,
            &sim.token_accounts[index],
            &sim.lp_token_account,
            unmint_amount,
            0,
        )
        .map_err(|e| self.invalid_request(e))?;
        self.query(&[ix]).await
    }

    /// Current LP token virtual price.
    ///
    /// # Errors
    /// `ResultNotFound` if the simulation logged no virtual price.
    pub async fn get_virtual_price(&self) -> Result<GetVirtualPrice, ClientError> {
        let ix = instruction::get_virtual_price(&self.keys(), &self.simulation_accounts.owner)
            .map_err(|e| self.invalid_request(e))?;
        self.query(&[ix]).await
    }

    /// Output of swapping `in_amount` of `source_mint` for `destination_mint`.
    ///
    /// Two throwaway token accounts are created inside the simulated transaction,
    /// so no pre-provisioned accounts are needed.
    ///
    /// # Errors
    /// `UnknownAsset` if either mint is not a pool asset, `ResultNotFound` if the
    /// simulation logged no output amount.
    pub async fn get_out_amount(
        &self,
        source_mint: &Pubkey,
        destination_mint: &Pubkey,
        in_amount: u64,
    ) -> Result<u64, ClientError> {
        self.asset_index(source_mint)?;
        self.asset_index(destination_mint)?;

        let owner = self.config.simulation_user;
        let lamports = self
            .executor
            .minimum_balance_for_rent_exemption(TOKEN_ACCOUNT_LEN)
            .await
            .map_err(ClientError::Executor)?;

        let source = Keypair::new().pubkey();
        let destination = Keypair::new().pubkey();
        let mut instructions = Vec::with_capacity(5);
        for (account, mint) in [(&source, source_mint), (&destination, destination_mint)] {
            instructions.push(create_account(
                &owner,
                account,
                lamports,
                TOKEN_ACCOUNT_LEN as u64,
                &TOKEN_PROGRAM_ID,
            ));
            instructions.push(
                initialize_account(&TOKEN_PROGRAM_ID, account, mint, &owner).map_err(|error| {
                    ClientError::TokenInstruction {
                        account: *account,
                        error,
                    }
                })?,
            );
        }
        instructions.push(
            instruction::exchange(&self.keys(), &owner, &source, &destination, in_amount, 0)
                .map_err(|e| self.invalid_request(e))?,
        );

        let result: GetDyUnderlying = self.query(&instructions).await?;
        Ok(result.dy)
    }
}

async fn fetch_account<E: LedgerExecutor + ?Sized>(
    executor: &E,
    address: &Pubkey,
) -> Result<Vec<u8>, ClientError> {
    executor
        .account_data(address)
        .await
        .map_err(ClientError::Executor)?
        .ok_or(ClientError::MissingAccountData { address: *address })
}

async fn fetch_token_mints<E: LedgerExecutor + ?Sized>(
    executor: &E,
    token_accounts: &[Pubkey],
) -> Result<Vec<Pubkey>, ClientError> {
    let mut mints = Vec::with_capacity(token_accounts.len());
    for address in token_accounts {
        let data = fetch_account(executor, address).await?;
        mints.push(token_account_mint(address, &data)?);
    }
    Ok(mints)
}

/// Poll until the pool state decodes and reports initialized.
///
/// Always polls at least once, even with a zero attempt budget.
async fn wait_until_initialized<E: LedgerExecutor + ?Sized>(
    executor: &E,
    config: &ClientConfig,
    address: &Pubkey,
) -> Result<(), ClientError> {
    let interval = Duration::from_millis(config.settle_poll_interval_ms);
    let max_attempts = config.settle_max_attempts.max(1);
    for attempt in 1..=max_attempts {
        let settled = executor
            .account_data(address)
            .await
            .map_err(ClientError::Executor)?
            .and_then(|data| PoolState::from_bytes(&data).ok())
            .is_some_and(|state| state.is_initialized);
        if settled {
            debug!(pool = %address, attempt, "pool state settled");
            return Ok(());
        }
        warn!(pool = %address, attempt, "pool state not initialized yet");
        if attempt < max_attempts {
            tokio::time::sleep(interval).await;
        }
    }
    Err(ClientError::SettleTimeout {
        address: *address,
        attempts: max_attempts,
    })
}
