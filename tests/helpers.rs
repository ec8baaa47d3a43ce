//! Shared mock collaborators for inventory-core integration tests.
//!
//! Hand-written, not `mockall` — matches the teacher crate's own test
//! style, which has no mocking crate in its dependency set.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use inventory_core::{
    AdapterManager, BundleDataClient, CrossChainTransferClient, HubPoolClient, RefundSet, TokenClient, TokenInfo,
    TxHash, WrapEthConfig,
};

pub const L1: &str = "T";

/// Installs the `tracing` fmt subscriber for the current test binary, the
/// way the pack's own integration tests do (e.g.
/// `trusted-gmp/tests/monitor_tests.rs`). `try_init` is idempotent across
/// the many test functions in one binary, so every test can call it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt::try_init();
}

/// In-memory balance/shortfall ledger keyed by `(chain_id, token)`. L1 and
/// L2 token addresses are the same string in these tests — the mock
/// hub-pool client below treats them as a 1:1 identity mapping.
///
/// `balances` and `on_chain_balances` are deliberately separate stores:
/// `balances` is the locally-tracked view `decrement_local_balance`
/// mutates (what `balance()` reports), while `on_chain_balances` models
/// the true chain state and only changes when a test explicitly calls
/// `with_on_chain_balance` to simulate a concurrent actor — exactly the
/// distinction `TokenClient::on_chain_balance` documents.
#[derive(Default)]
pub struct MockTokenClient {
    balances: Mutex<BTreeMap<(u64, String), i128>>,
    on_chain_balances: Mutex<BTreeMap<(u64, String), i128>>,
    native_balances: Mutex<BTreeMap<u64, i128>>,
    shortfalls: Mutex<BTreeMap<(u64, String), i128>>,
}

impl MockTokenClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets both the local tracked balance and the true on-chain balance
    /// to `amount` — the usual case, where nothing has diverged yet.
    pub fn with_balance(self, chain_id: u64, token: &str, amount: i128) -> Self {
        self.balances
            .lock()
            .unwrap()
            .insert((chain_id, token.to_string()), amount);
        self.on_chain_balances
            .lock()
            .unwrap()
            .insert((chain_id, token.to_string()), amount);
        self
    }

    /// Overrides only the true on-chain balance, simulating a concurrent
    /// actor moving funds between planning and the executor's re-check,
    /// without touching this process's own locally-tracked view.
    pub fn with_on_chain_balance(self, chain_id: u64, token: &str, amount: i128) -> Self {
        self.on_chain_balances
            .lock()
            .unwrap()
            .insert((chain_id, token.to_string()), amount);
        self
    }

    pub fn with_native_balance(self, chain_id: u64, amount: i128) -> Self {
        self.native_balances.lock().unwrap().insert(chain_id, amount);
        self
    }

    pub fn with_shortfall(self, chain_id: u64, token: &str, amount: i128) -> Self {
        self.shortfalls.lock().unwrap().insert((chain_id, token.to_string()), amount);
        self
    }

    pub fn balance_now(&self, chain_id: u64, token: &str) -> i128 {
        *self
            .balances
            .lock()
            .unwrap()
            .get(&(chain_id, token.to_string()))
            .unwrap_or(&0)
    }
}

#[async_trait]
impl TokenClient for MockTokenClient {
    async fn balance(&self, chain_id: u64, token: &str) -> anyhow::Result<i128> {
        Ok(*self
            .balances
            .lock()
            .unwrap()
            .get(&(chain_id, token.to_string()))
            .unwrap_or(&0))
    }

    async fn on_chain_balance(&self, chain_id: u64, token: &str) -> anyhow::Result<i128> {
        Ok(*self
            .on_chain_balances
            .lock()
            .unwrap()
            .get(&(chain_id, token.to_string()))
            .unwrap_or(&0))
    }

    async fn native_balance(&self, chain_id: u64) -> anyhow::Result<i128> {
        Ok(*self.native_balances.lock().unwrap().get(&chain_id).unwrap_or(&0))
    }

    fn decrement_local_balance(&self, chain_id: u64, token: &str, amount: i128) {
        *self
            .balances
            .lock()
            .unwrap()
            .entry((chain_id, token.to_string()))
            .or_insert(0) -= amount;
    }

    async fn shortfall_total_requirement(&self, chain_id: u64, token: &str) -> anyhow::Result<i128> {
        Ok(*self
            .shortfalls
            .lock()
            .unwrap()
            .get(&(chain_id, token.to_string()))
            .unwrap_or(&0))
    }
}

/// Hub-pool client with an identity L1<->L2 mapping: the L2 token address
/// for `(l1_token, chain)` is always just `l1_token` itself. Good enough
/// for tests that never exercise address translation directly.
pub struct MockHubPoolClient {
    pub hub_chain_id: u64,
}

impl HubPoolClient for MockHubPoolClient {
    fn hub_chain_id(&self) -> u64 {
        self.hub_chain_id
    }

    fn l2_token_for(&self, l1_token: &str, _chain_id: u64) -> Option<String> {
        Some(l1_token.to_string())
    }

    fn l1_token_for(&self, l2_token: &str, _chain_id: u64) -> Option<String> {
        Some(l2_token.to_string())
    }

    fn are_tokens_equivalent(&self, token_a: &str, _chain_a: u64, token_b: &str, _chain_b: u64) -> bool {
        token_a == token_b
    }

    fn l2_token_enabled_for_l1_token(&self, _l1_token: &str, _chain_id: u64) -> bool {
        true
    }

    fn token_info_for(&self, l1_token: &str) -> Option<TokenInfo> {
        Some(TokenInfo {
            symbol: l1_token.to_string(),
            decimals: 18,
        })
    }
}

#[derive(Default)]
pub struct MockCrossChainTransferClient {
    outstanding: Mutex<BTreeMap<(u64, String), i128>>,
}

impl MockCrossChainTransferClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outstanding_now(&self, chain_id: u64, token: &str) -> i128 {
        *self
            .outstanding
            .lock()
            .unwrap()
            .get(&(chain_id, token.to_string()))
            .unwrap_or(&0)
    }
}

#[async_trait]
impl CrossChainTransferClient for MockCrossChainTransferClient {
    async fn outstanding_cross_chain_transfer_amount(
        &self,
        _relayer: &str,
        chain_id: u64,
        l1_token: &str,
    ) -> anyhow::Result<i128> {
        Ok(*self
            .outstanding
            .lock()
            .unwrap()
            .get(&(chain_id, l1_token.to_string()))
            .unwrap_or(&0))
    }

    fn increase_outstanding_transfer(&self, _relayer: &str, l1_token: &str, amount: i128, chain_id: u64) {
        *self
            .outstanding
            .lock()
            .unwrap()
            .entry((chain_id, l1_token.to_string()))
            .or_insert(0) += amount;
    }

    async fn update(&self, _l1_tokens: &[String]) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Adapter manager that always succeeds unless `fail_after` submissions
/// have already gone through, after which every further call errors.
pub struct MockAdapterManager {
    counter: AtomicUsize,
    fail_after: Option<usize>,
    pub submitted: Mutex<Vec<(u64, String, i128)>>,
}

impl MockAdapterManager {
    pub fn new() -> Self {
        Self {
            counter: AtomicUsize::new(0),
            fail_after: None,
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_after(fail_after: usize) -> Self {
        Self {
            counter: AtomicUsize::new(0),
            fail_after: Some(fail_after),
            submitted: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl AdapterManager for MockAdapterManager {
    async fn send_token_cross_chain(
        &self,
        _relayer: &str,
        chain_id: u64,
        l1_token: &str,
        amount: i128,
        _sim_mode: bool,
    ) -> anyhow::Result<TxHash> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        if self.fail_after == Some(n) {
            anyhow::bail!("simulated adapter failure");
        }
        self.submitted.lock().unwrap().push((chain_id, l1_token.to_string(), amount));
        Ok(TxHash(format!("0xtx{n}")))
    }

    async fn set_l1_token_approvals(&self, _relayer: &str, _l1_tokens: &[String]) -> anyhow::Result<()> {
        Ok(())
    }

    async fn unwrap_weth(&self, chain_id: u64, amount: i128, _sim_mode: bool) -> anyhow::Result<TxHash> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        if self.fail_after == Some(n) {
            anyhow::bail!("simulated adapter failure");
        }
        self.submitted.lock().unwrap().push((chain_id, "unwrap".to_string(), amount));
        Ok(TxHash(format!("0xtx{n}")))
    }

    async fn wrap_eth_if_above_threshold(&self, _config: &WrapEthConfig, _sim_mode: bool) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct MockBundleDataClient {
    pub pending: Vec<RefundSet>,
    pub next: Vec<RefundSet>,
}

#[async_trait]
impl BundleDataClient for MockBundleDataClient {
    async fn pending_refunds_from_valid_bundles(&self, _relayer: &str) -> anyhow::Result<Vec<RefundSet>> {
        Ok(self.pending.clone())
    }

    async fn next_bundle_refunds(&self, _relayer: &str) -> anyhow::Result<Vec<RefundSet>> {
        Ok(self.next.clone())
    }
}

pub fn refund_set(l1_token: &str, amounts: &[(u64, i128)]) -> RefundSet {
    RefundSet {
        l1_token: l1_token.to_string(),
        amounts_by_chain: amounts.iter().copied().collect(),
    }
}
