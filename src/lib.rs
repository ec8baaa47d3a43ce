//! Inventory management core for a cross-chain relayer bot.
//!
//! Three algorithms — refund-chain selection, rebalance planning, and
//! native-gas replenishment — share one virtual-balance model of the
//! relayer's holdings across a hub chain and its configured L2s. This
//! crate is the decision core only: it depends on collaborator traits for
//! everything that touches a chain, an RPC endpoint, or a bundle data
//! feed, and never submits a transaction itself beyond calling through
//! those interfaces.

pub mod balance;
pub mod collaborators;
pub mod config;
pub mod core;
pub mod distribution;
pub mod error;
pub mod fixed_point;
pub mod rebalance;
pub mod refund_cache;
pub mod refund_selector;
pub mod unwrap;

pub use collaborators::{
    AdapterManager, BundleDataClient, CrossChainTransferClient, FillDescriptor, HubPoolClient, RefundSet, TokenClient,
    TokenInfo, TxHash, WrapEthConfig,
};
pub use config::{InventoryConfig, TokenChainConfig};
pub use core::InventoryManager;
pub use error::{InventoryError, Result};
pub use fixed_point::{Pct, SCALE};
pub use rebalance::{ExecutedRebalance, RebalanceCandidate, RebalanceCycleResult, UnexecutedRebalance};
pub use unwrap::{ExecutedUnwrap, UnexecutedUnwrap, UnwrapCandidate, UnwrapCycleResult};
