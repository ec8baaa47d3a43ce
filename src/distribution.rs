//! Distribution Calculator (C2).
//!
//! Derives per-chain allocation fractions from the virtual balance model
//! (C1). Unmanaged non-hub chains are omitted entirely rather than
//! reported as zero (spec §3 invariant 2, §4.2).

use std::collections::BTreeMap;

use crate::core::InventoryManager;
use crate::error::Result;
use crate::fixed_point::Pct;

impl InventoryManager {
    /// `chain_id -> pct` for every enabled chain of `l1_token`. Empty when
    /// the token's cumulative balance is zero — per spec §4.2, entries are
    /// only emitted "when cumulative > 0".
    pub async fn chain_distribution(&self, l1_token: &str) -> Result<BTreeMap<u64, Pct>> {
        let cumulative = self.cumulative_balance(l1_token).await?;
        let mut distribution = BTreeMap::new();
        if cumulative <= 0 {
            return Ok(distribution);
        }

        for chain_id in self.config.enabled_chains_for(l1_token) {
            let balance = self.balance_on(chain_id, l1_token).await?;
            distribution.insert(chain_id, Pct::from_ratio(balance, cumulative));
        }
        Ok(distribution)
    }

    /// `l1_token -> chain_distribution` over every managed L1 token.
    pub async fn token_distribution(&self) -> Result<BTreeMap<String, BTreeMap<u64, Pct>>> {
        let mut distribution = BTreeMap::new();
        for l1_token in self.config.managed_tokens() {
            let chains = self.chain_distribution(&l1_token).await?;
            distribution.insert(l1_token, chains);
        }
        Ok(distribution)
    }
}
