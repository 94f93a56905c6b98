//! Shared test utilities for stable swap client tests.
//!
//! Provides an in-memory ledger that serves account bytes and canned trace lines,
//! and a sender that records every submitted transaction.

#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU8, Ordering},
    },
};

use async_trait::async_trait;
use solana_instruction::Instruction;
use solana_keypair::Keypair;
use solana_pubkey::Pubkey;
use solana_signature::Signature;
use solana_signer::Signer;
use stable_swap_client::{BoxError, ClientConfig, LedgerExecutor, TransactionSender};
use stable_swap_interface::{AdminSettings, PoolState};

/// Rent-exempt minimum the mock reports for any span.
pub const RENT_EXEMPT_LAMPORTS: u64 = 2_039_280;

// ============================================================================
// Ledger
// ============================================================================

/// A simulation request seen by the mock.
#[derive(Clone, Debug)]
pub struct SimulationCall {
    pub instructions: Vec<Instruction>,
    pub fee_payer: Pubkey,
}

/// In-memory ledger.
#[derive(Default)]
pub struct MockLedger {
    accounts: Mutex<HashMap<Pubkey, Vec<u8>>>,
    /// Accounts that appear after the given number of fetches
    deferred: Mutex<HashMap<Pubkey, (usize, Vec<u8>)>>,
    simulation_logs: Mutex<Option<Vec<String>>>,
    transaction_logs: Mutex<Option<Vec<String>>>,
    simulations: Mutex<Vec<SimulationCall>>,
}

impl MockLedger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_account(&self, address: Pubkey, data: Vec<u8>) {
        self.accounts.lock().unwrap().insert(address, data);
    }

    /// Serve `data` for `address` only once it has been fetched `after` times.
    pub fn set_account_after(&self, address: Pubkey, after: usize, data: Vec<u8>) {
        self.deferred.lock().unwrap().insert(address, (after, data));
    }

    pub fn set_simulation_logs(&self, logs: Option<Vec<String>>) {
        *self.simulation_logs.lock().unwrap() = logs;
    }

    pub fn set_transaction_logs(&self, logs: Option<Vec<String>>) {
        *self.transaction_logs.lock().unwrap() = logs;
    }

    pub fn simulations(&self) -> Vec<SimulationCall> {
        self.simulations.lock().unwrap().clone()
    }
}

#[async_trait]
impl LedgerExecutor for MockLedger {
    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, BoxError> {
        let mut deferred = self.deferred.lock().unwrap();
        if let Some((remaining, _)) = deferred.get_mut(address) {
            if *remaining == 0 {
                let (_, data) = deferred.remove(address).unwrap();
                self.accounts.lock().unwrap().insert(*address, data);
            } else {
                *remaining -= 1;
            }
        }
        Ok(self.accounts.lock().unwrap().get(address).cloned())
    }

    async fn simulate(
        &self,
        instructions: &[Instruction],
        fee_payer: &Pubkey,
    ) -> Result<Option<Vec<String>>, BoxError> {
        self.simulations.lock().unwrap().push(SimulationCall {
            instructions: instructions.to_vec(),
            fee_payer: *fee_payer,
        });
        Ok(self.simulation_logs.lock().unwrap().clone())
    }

    async fn transaction_logs(
        &self,
        _signature: &Signature,
    ) -> Result<Option<Vec<String>>, BoxError> {
        Ok(self.transaction_logs.lock().unwrap().clone())
    }

    async fn minimum_balance_for_rent_exemption(&self, _data_len: usize) -> Result<u64, BoxError> {
        Ok(RENT_EXEMPT_LAMPORTS)
    }
}

// ============================================================================
// Sender
// ============================================================================

/// A transaction submitted through the mock sender.
#[derive(Clone, Debug)]
pub struct SentTransaction {
    pub instructions: Vec<Instruction>,
    pub signers: Vec<Pubkey>,
    pub signature: Signature,
}

/// Sender that records transactions and confirms them immediately.
pub struct MockSender {
    payer: Keypair,
    counter: AtomicU8,
    sent: Mutex<Vec<SentTransaction>>,
    fail: bool,
}

impl MockSender {
    pub fn new() -> Self {
        Self {
            payer: Keypair::new(),
            counter: AtomicU8::new(1),
            sent: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    /// A sender whose submissions always fail.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn payer_key(&self) -> Pubkey {
        self.payer.pubkey()
    }

    pub fn sent(&self) -> Vec<SentTransaction> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl TransactionSender for MockSender {
    fn payer(&self) -> Pubkey {
        self.payer.pubkey()
    }

    async fn send(
        &self,
        instructions: &[Instruction],
        signers: &[&Keypair],
    ) -> Result<Signature, BoxError> {
        if self.fail {
            return Err("transaction rejected".into());
        }
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        let signature = Signature::from([n; 64]);
        self.sent.lock().unwrap().push(SentTransaction {
            instructions: instructions.to_vec(),
            signers: signers.iter().map(|k| k.pubkey()).collect(),
            signature,
        });
        Ok(signature)
    }
}

// ============================================================================
// Account Fixtures
// ============================================================================

/// SPL token account bytes (165 bytes, initialized).
pub fn token_account_data(mint: &Pubkey, owner: &Pubkey) -> Vec<u8> {
    let mut data = vec![0u8; 165];
    data[0..32].copy_from_slice(mint.as_ref()); // mint
    data[32..64].copy_from_slice(owner.as_ref()); // owner
    data[108] = 1; // state = Initialized
    data
}

/// A 3-asset pool registered in a mock ledger.
pub struct PoolFixture {
    pub address: Pubkey,
    pub token_accounts: Vec<Pubkey>,
    pub token_mints: Vec<Pubkey>,
    pub pool_mint: Pubkey,
    pub state: PoolState,
}

impl PoolFixture {
    pub fn new() -> Self {
        let token_accounts: Vec<_> = (0..3).map(|_| Pubkey::new_unique()).collect();
        let token_mints: Vec<_> = (0..3).map(|_| Pubkey::new_unique()).collect();
        let pool_mint = Pubkey::new_unique();

        let mut state = PoolState::new(&token_accounts, &[1, 1, 1]).unwrap();
        state.version = 1;
        state.nonce = 255;
        state.amplification_coefficient = 100;
        state.fee_numerator = 4_000_000;
        state.precision_factor = 6;
        state.pool_mint = pool_mint;
        state.admin_token_mint = Pubkey::new_unique();
        state.admin_settings = AdminSettings {
            swap_enabled: true,
            add_liquidity_enabled: true,
        };

        Self {
            address: Pubkey::new_unique(),
            token_accounts,
            token_mints,
            pool_mint,
            state,
        }
    }

    /// Register the asset token accounts only.
    pub fn install_assets(&self, ledger: &MockLedger) {
        for (account, mint) in self.token_accounts.iter().zip(&self.token_mints) {
            ledger.set_account(*account, token_account_data(mint, &Pubkey::new_unique()));
        }
    }

    /// Register the pool state and asset token accounts.
    pub fn install(&self, ledger: &MockLedger) {
        self.install_assets(ledger);
        ledger.set_account(self.address, self.state.to_bytes().unwrap().to_vec());
    }
}

/// Config with a tight settle poll for tests.
pub fn test_config() -> ClientConfig {
    ClientConfig {
        settle_poll_interval_ms: 1,
        settle_max_attempts: 5,
        ..ClientConfig::default()
    }
}

pub fn log_lines(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|l| (*l).to_string()).collect()
}
