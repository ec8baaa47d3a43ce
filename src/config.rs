//! Inventory configuration surface.
//!
//! This module defines the data shape the core consumes (spec §3/§6). It
//! is deliberately just data plus a validation pass — *parsing* config
//! from an operator-facing file format is this crate's job too (the
//! teacher crate's `config.rs` mixes `toml`/`serde_yaml`/`serde_json`
//! freely), but wiring that into a running bot process (env vars, CLI
//! flags, file watching) is the surrounding application's job, not this
//! core's.
//!
//! Iteration over `tokenConfig`/per-token chain maps must be
//! deterministic (spec §9, "Deterministic iteration") because gating
//! behavior in the rebalance planner depends on encounter order. We use
//! `BTreeMap` throughout so iteration order is always sorted-key order,
//! independent of insertion order or hashing.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{InventoryError, Result};
use crate::fixed_point::Pct;

/// Per-(L1 token, chain) allocation policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TokenChainConfig {
    /// Desired steady-state allocation fraction on this chain.
    pub target_pct: Pct,
    /// Under-allocation trigger; must be `<= target_pct`.
    pub threshold_pct: Pct,
    /// Native-gas low-balance trigger for the companion unwrap cycle (C6).
    #[serde(default)]
    pub unwrap_weth_threshold: Option<i128>,
    /// Native-gas replenishment target for the companion unwrap cycle (C6).
    #[serde(default)]
    pub unwrap_weth_target: Option<i128>,
}

impl TokenChainConfig {
    pub fn validate(&self, l1_token: &str, chain_id: u64) -> Result<()> {
        if self.threshold_pct > self.target_pct {
            return Err(InventoryError::Collaborator(format!(
                "invalid config for token {l1_token} on chain {chain_id}: threshold_pct ({}) must be <= target_pct ({})",
                self.threshold_pct, self.target_pct
            )));
        }
        Ok(())
    }
}

/// Top-level inventory configuration: targets/thresholds per token per
/// chain, plus the globals needed by the companion wrap cycle and the
/// native-gas exclusion list used by the unwrap planner (C6).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryConfig {
    /// `true` disables all inventory management; every operation degrades
    /// to its "disabled" behavior (spec §4.3 step 1, §4.4 step 1).
    #[serde(default)]
    pub enabled: bool,

    /// The hub chain id. The hub is always "enabled" for cumulative-balance
    /// and distribution purposes regardless of whether it appears in
    /// `token_config`, per spec §9's asymmetry note.
    pub hub_chain_id: u64,

    /// `l1_token -> chain_id -> policy`. A missing entry means "not managed
    /// on this chain"; the token is treated as absent there (except for the
    /// hub, see above).
    #[serde(default)]
    pub token_config: BTreeMap<String, BTreeMap<u64, TokenChainConfig>>,

    /// Chains whose native gas token is not the canonical wrapped-native
    /// pair (e.g. a chain that pays gas in a token other than the L1
    /// wrapped-native asset). The unwrap planner (C6) skips these
    /// unconditionally.
    #[serde(default)]
    pub non_native_gas_chains: BTreeSet<u64>,

    /// Global threshold for the companion wrap cycle (specified only at its
    /// interface; out of scope for this core's own operations beyond
    /// carrying the config through to `AdapterManager::wrap_eth_if_above_threshold`).
    #[serde(default)]
    pub wrap_ether_threshold: Option<i128>,
    /// Global target for the companion wrap cycle.
    #[serde(default)]
    pub wrap_ether_target: Option<i128>,
}

impl InventoryConfig {
    /// Validates the `threshold_pct <= target_pct` invariant for every
    /// configured (token, chain) pair. Call once at construction, the way
    /// the teacher's `LiquidityMonitor::new` validates thresholds against
    /// configured solver addresses before the monitor is usable.
    pub fn validate(&self) -> Result<()> {
        for (l1_token, chains) in &self.token_config {
            for (chain_id, cfg) in chains {
                cfg.validate(l1_token, *chain_id)?;
            }
        }
        Ok(())
    }

    /// Whether `chain_id` is managed for `l1_token` (has an explicit config
    /// entry). The hub chain is handled separately by callers — it is
    /// always "enabled" regardless of this method's answer.
    pub fn is_managed(&self, l1_token: &str, chain_id: u64) -> bool {
        self.token_config
            .get(l1_token)
            .map(|chains| chains.contains_key(&chain_id))
            .unwrap_or(false)
    }

    /// Whether `chain_id` contributes to this token's cumulative balance:
    /// the hub always does; any other chain only if explicitly managed.
    pub fn is_enabled_chain(&self, l1_token: &str, chain_id: u64) -> bool {
        chain_id == self.hub_chain_id || self.is_managed(l1_token, chain_id)
    }

    pub fn chain_config(&self, l1_token: &str, chain_id: u64) -> Option<&TokenChainConfig> {
        self.token_config.get(l1_token)?.get(&chain_id)
    }

    /// All chains with an explicit entry for `l1_token`, plus the hub chain,
    /// deduplicated, in sorted order.
    pub fn enabled_chains_for(&self, l1_token: &str) -> Vec<u64> {
        let mut chains: BTreeSet<u64> = self
            .token_config
            .get(l1_token)
            .map(|m| m.keys().copied().collect())
            .unwrap_or_default();
        chains.insert(self.hub_chain_id);
        chains.into_iter().collect()
    }

    /// All L1 tokens with at least one managed chain.
    pub fn managed_tokens(&self) -> Vec<String> {
        self.token_config.keys().cloned().collect()
    }

    pub fn parse_toml(input: &str) -> Result<Self> {
        toml::from_str(input)
            .map_err(|e| InventoryError::Collaborator(format!("invalid TOML config: {e}")))
    }

    pub fn parse_json(input: &str) -> Result<Self> {
        serde_json::from_str(input)
            .map_err(|e| InventoryError::Collaborator(format!("invalid JSON config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(target: f64, threshold: f64) -> TokenChainConfig {
        TokenChainConfig {
            target_pct: Pct::from_fraction(target),
            threshold_pct: Pct::from_fraction(threshold),
            unwrap_weth_threshold: None,
            unwrap_weth_target: None,
        }
    }

    #[test]
    fn threshold_above_target_is_rejected() {
        let bad = cfg(0.2, 0.3);
        assert!(bad.validate("T", 10).is_err());
    }

    #[test]
    fn threshold_equal_to_target_is_accepted() {
        let ok = cfg(0.2, 0.2);
        assert!(ok.validate("T", 10).is_ok());
    }

    #[test]
    fn hub_is_always_enabled_even_when_unmanaged() {
        let mut inv = InventoryConfig {
            hub_chain_id: 1,
            ..Default::default()
        };
        inv.token_config
            .entry("T".into())
            .or_default()
            .insert(10, cfg(0.5, 0.4));
        assert!(inv.is_enabled_chain("T", 1));
        assert!(!inv.is_enabled_chain("T", 99));
        assert!(inv.is_enabled_chain("T", 10));
    }

    #[test]
    fn enabled_chains_includes_hub_even_when_absent_from_config() {
        let mut inv = InventoryConfig {
            hub_chain_id: 1,
            ..Default::default()
        };
        inv.token_config
            .entry("T".into())
            .or_default()
            .insert(10, cfg(0.5, 0.4));
        let chains = inv.enabled_chains_for("T");
        assert_eq!(chains, vec![1, 10]);
    }

    #[test]
    fn round_trips_through_toml() {
        let mut inv = InventoryConfig {
            hub_chain_id: 1,
            ..Default::default()
        };
        inv.token_config
            .entry("T".into())
            .or_default()
            .insert(10, cfg(0.5, 0.4));
        let s = toml::to_string(&inv).unwrap();
        let back = InventoryConfig::parse_toml(&s).unwrap();
        assert_eq!(back.hub_chain_id, 1);
        assert!(back.is_managed("T", 10));
    }
}
