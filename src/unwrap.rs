//! Native-Gas Unwrap Planner & Executor (C6).
//!
//! Applies only to the L1 wrapped-native token. For each enabled chain,
//! checks the relayer's native gas balance and, if it has fallen below
//! threshold, plans (and submits) an unwrap of wrapped-native tokens held
//! on that chain to replenish it (spec §4.6).
//!
//! The "well-known symbol" the spec uses to address the wrapped-native
//! token is resolved by the caller (via the hub-pool client's
//! `token_info_for`, matching on `symbol`) and passed in as
//! `native_wrapped_l1_token` — this core only needs the resolved L1
//! token address, not the symbol-lookup policy itself.

use crate::collaborators::TxHash;
use crate::core::InventoryManager;

/// An unwrap candidate (spec §3's "Unwrap plan entry").
#[derive(Debug, Clone)]
pub struct UnwrapCandidate {
    pub chain_id: u64,
    pub threshold: i128,
    pub target: i128,
    pub l2_native_balance: i128,
    pub amount: i128,
}

#[derive(Debug, Clone)]
pub struct ExecutedUnwrap {
    pub candidate: UnwrapCandidate,
    pub tx_hash: TxHash,
}

#[derive(Debug, Clone)]
pub struct UnexecutedUnwrap {
    pub candidate: UnwrapCandidate,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct UnwrapCycleResult {
    pub executed: Vec<ExecutedUnwrap>,
    pub unexecuted: Vec<UnexecutedUnwrap>,
}

impl InventoryManager {
    /// Runs a full unwrap cycle for `native_wrapped_l1_token`: checks every
    /// enabled chain's native balance, plans replenishment, and submits
    /// serially. Errors are logged and the cycle returns normally with
    /// whatever progress was made (spec §7).
    pub async fn unwrap_weth_if_needed(
        &self,
        native_wrapped_l1_token: &str,
        sim_mode: bool,
    ) -> UnwrapCycleResult {
        if !self.config.enabled {
            self.log_disabled_once();
            return UnwrapCycleResult::default();
        }

        let mut result = UnwrapCycleResult::default();

        for chain_id in self.config.enabled_chains_for(native_wrapped_l1_token) {
            // Skip chains whose native gas token is not the canonical
            // wrapped-native pair (an explicit exclusion list).
            if self.config.non_native_gas_chains.contains(&chain_id) {
                continue;
            }

            let Some(chain_cfg) = self.config.chain_config(native_wrapped_l1_token, chain_id) else {
                continue;
            };
            let (Some(threshold), Some(target)) =
                (chain_cfg.unwrap_weth_threshold, chain_cfg.unwrap_weth_target)
            else {
                continue;
            };

            let native_balance = match self.token_client.native_balance(chain_id).await {
                Ok(balance) => balance,
                Err(err) => {
                    tracing::error!(error = %err, chain_id, "failed to read native gas balance");
                    continue;
                }
            };

            if native_balance >= threshold {
                continue;
            }

            let amount = target - native_balance;
            let candidate = UnwrapCandidate {
                chain_id,
                threshold,
                target,
                l2_native_balance: native_balance,
                amount,
            };

            let l2_wrapped_balance = match self.token_client.balance(chain_id, native_wrapped_l1_token).await {
                Ok(balance) => balance,
                Err(err) => {
                    tracing::error!(error = %err, chain_id, "failed to read L2 wrapped-token balance");
                    result.unexecuted.push(UnexecutedUnwrap {
                        candidate,
                        reason: "failed to read wrapped-token balance".to_string(),
                    });
                    continue;
                }
            };

            if l2_wrapped_balance < amount {
                result.unexecuted.push(UnexecutedUnwrap {
                    candidate,
                    reason: format!(
                        "insufficient L2 wrapped-token balance: available={l2_wrapped_balance}, requested={amount}"
                    ),
                });
                continue;
            }

            self.token_client
                .decrement_local_balance(chain_id, native_wrapped_l1_token, amount);

            match self.adapter_manager.unwrap_weth(chain_id, amount, sim_mode).await {
                Ok(tx_hash) => result.executed.push(ExecutedUnwrap { candidate, tx_hash }),
                Err(err) => {
                    tracing::error!(
                        error = %err,
                        chain_id,
                        executed = result.executed.len(),
                        unexecuted = result.unexecuted.len(),
                        "unwrap submission failed; stopping cycle, partial progress retained"
                    );
                    break;
                }
            }
        }

        result
    }
}
