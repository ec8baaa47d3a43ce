//! The inventory management core itself.
//!
//! `InventoryManager` is constructed once per process (spec §3's
//! lifecycle note) with references to its collaborators and a config.
//! Its only in-memory state is the per-cycle refund cache (C7) and a
//! one-shot "disabled" log latch — every other value is pulled fresh from
//! collaborators on each call.
//!
//! Collaborators are held as `Arc<dyn Trait>` capability handles rather
//! than concrete structs with back-references to this manager, per spec
//! §9's design note: "pass these as shared immutable handles held through
//! interface abstractions... avoid storing back-references."

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::collaborators::{AdapterManager, BundleDataClient, CrossChainTransferClient, HubPoolClient, TokenClient};
use crate::config::InventoryConfig;
use crate::error::Result;
use crate::refund_cache::RefundCache;

pub struct InventoryManager {
    pub(crate) config: InventoryConfig,
    pub(crate) relayer: String,
    pub(crate) token_client: Arc<dyn TokenClient>,
    pub(crate) hub_pool_client: Arc<dyn HubPoolClient>,
    pub(crate) cross_chain_client: Arc<dyn CrossChainTransferClient>,
    pub(crate) adapter_manager: Arc<dyn AdapterManager>,
    pub(crate) bundle_data_client: Arc<dyn BundleDataClient>,
    pub(crate) refund_cache: RefundCache,
    disabled_logged: AtomicBool,
}

impl InventoryManager {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: InventoryConfig,
        relayer: String,
        token_client: Arc<dyn TokenClient>,
        hub_pool_client: Arc<dyn HubPoolClient>,
        cross_chain_client: Arc<dyn CrossChainTransferClient>,
        adapter_manager: Arc<dyn AdapterManager>,
        bundle_data_client: Arc<dyn BundleDataClient>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            relayer,
            token_client,
            hub_pool_client,
            cross_chain_client,
            adapter_manager,
            bundle_data_client,
            refund_cache: RefundCache::new(),
            disabled_logged: AtomicBool::new(false),
        })
    }

    pub fn config(&self) -> &InventoryConfig {
        &self.config
    }

    pub fn relayer(&self) -> &str {
        &self.relayer
    }

    /// Invalidates the per-cycle refund cache (C7). Call at the start of a
    /// fresh cycle; the next refund-dependent call will re-fetch.
    pub async fn begin_cycle(&self) {
        self.refund_cache.reset().await;
    }

    /// Logs the "inventory management disabled" notice at most once per
    /// process, per spec §3's one-shot latch.
    pub(crate) fn log_disabled_once(&self) {
        if !self.disabled_logged.swap(true, Ordering::Relaxed) {
            tracing::info!(
                "inventory management is disabled; refund-chain selection, rebalancing, and unwrap planning are no-ops"
            );
        }
    }
}
