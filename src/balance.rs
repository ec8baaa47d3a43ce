//! Virtual Balance Calculator (C1).
//!
//! Folds on-chain balance, funds already sent over the canonical bridge
//! but not yet credited ("outstanding cross-chain transfer"), and
//! outstanding fill obligations ("shortfall") into one virtual-balance
//! number per (token, chain). This is what lets the selector and planner
//! make decisions that remain correct across multiple cycles while
//! transfers are still finalizing.
//!
//! Grounded on the teacher's `TokenLiquidity::available_budget` in
//! `service/liquidity.rs` (`confirmed_balance - in_flight`), generalized
//! here to the spec's three-way fold of on-chain balance + in-flight
//! bridge transfer + shortfall, computed across every enabled chain
//! rather than a single local ledger entry.

use crate::core::InventoryManager;
use crate::error::{InventoryError, Result};
use crate::fixed_point::Pct;

impl InventoryManager {
    /// Balance of `l1_token` on `chain_id`, folding in outstanding
    /// cross-chain transfers already sent toward that chain.
    ///
    /// Returns `0` without querying any collaborator when `chain_id` is
    /// not the hub and the token is not managed there — an unmanaged
    /// non-hub chain contributes nothing (spec §3 invariant 2, §8
    /// invariant 2).
    pub async fn balance_on(&self, chain_id: u64, l1_token: &str) -> Result<i128> {
        if !self.config.is_enabled_chain(l1_token, chain_id) {
            return Ok(0);
        }

        let l2_token = self
            .hub_pool_client
            .l2_token_for(l1_token, chain_id)
            .ok_or_else(|| InventoryError::MissingTokenInfo {
                l1_token: l1_token.to_string(),
            })?;

        let on_chain = self.token_client.balance(chain_id, &l2_token).await?;
        let in_flight = self
            .cross_chain_client
            .outstanding_cross_chain_transfer_amount(&self.relayer, chain_id, l1_token)
            .await?;

        Ok(on_chain + in_flight)
    }

    /// Sum of `balance_on` over every enabled chain for `l1_token`. The
    /// hub always contributes; any other chain only if explicitly managed
    /// (spec §3 invariant 1/2).
    pub async fn cumulative_balance(&self, l1_token: &str) -> Result<i128> {
        let mut total: i128 = 0;
        for chain_id in self.config.enabled_chains_for(l1_token) {
            total += self.balance_on(chain_id, l1_token).await?;
        }
        Ok(total)
    }

    /// Outstanding fill obligations the relayer has already committed to
    /// on `chain_id` for `l1_token`, queried from the token client.
    pub async fn shortfall(&self, l1_token: &str, chain_id: u64) -> Result<i128> {
        let l2_token = self
            .hub_pool_client
            .l2_token_for(l1_token, chain_id)
            .ok_or_else(|| InventoryError::MissingTokenInfo {
                l1_token: l1_token.to_string(),
            })?;
        Ok(self
            .token_client
            .shortfall_total_requirement(chain_id, &l2_token)
            .await?)
    }

    /// `(balance_on - shortfall) * S / cumulative`; `0` when cumulative is
    /// zero (spec §3: "returns 0 when cumulative is 0" — distinct from the
    /// selector's own division-by-zero guard, which falls back to the hub
    /// chain instead).
    pub async fn current_alloc_pct(&self, l1_token: &str, chain_id: u64) -> Result<Pct> {
        let balance = self.balance_on(chain_id, l1_token).await?;
        let shortfall = self.shortfall(l1_token, chain_id).await?;
        let cumulative = self.cumulative_balance(l1_token).await?;
        Ok(Pct::from_ratio(balance - shortfall, cumulative))
    }
}
