//! Error kinds for the inventory management core.
//!
//! The refund-chain selector raises a typed error to its caller (spec
//! §7's propagation policy: "selector errors are raised to the caller").
//! Rebalance and unwrap cycles instead return `anyhow::Result<()>` and
//! catch-and-log at the cycle boundary, matching the teacher crate's
//! convention for its own service loops.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InventoryError {
    /// Input and output tokens are not equivalent; this core assumes a 1:1
    /// input/output relationship and cannot reason about mixed tokens.
    #[error(
        "input token and output token are not equivalent (origin chain {origin_chain_id}, destination chain {destination_chain_id})"
    )]
    TokenMismatch {
        origin_chain_id: u64,
        destination_chain_id: u64,
    },

    /// The hub-pool client has no metadata for a managed L1 token. Fatal to
    /// the cycle: the configuration itself is broken.
    #[error("hub-pool client returned no token info for L1 token {l1_token}")]
    MissingTokenInfo { l1_token: String },

    /// The on-chain balance re-checked at execution time differs from the
    /// planner's snapshot. Recoverable: the candidate is skipped.
    #[error(
        "hub balance changed since planning for chain {chain_id} (planned {planned}, observed {observed})"
    )]
    BalanceChanged {
        chain_id: u64,
        planned: i128,
        observed: i128,
    },

    /// Catch-all for collaborator (RPC/adapter) failures.
    #[error("collaborator call failed: {0}")]
    Collaborator(String),
}

impl From<anyhow::Error> for InventoryError {
    fn from(err: anyhow::Error) -> Self {
        InventoryError::Collaborator(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, InventoryError>;
