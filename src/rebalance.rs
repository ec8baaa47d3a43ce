//! Rebalance Planner (C4) and Rebalance Executor (C5).
//!
//! The planner detects under-allocated L2 chains and computes the
//! hub→L2 transfer that would restore targets; the executor gates
//! candidates by the relayer's available hub-chain balance and submits
//! accepted ones serially (spec §4.4, §4.5).

use crate::collaborators::TxHash;
use crate::core::InventoryManager;
use crate::error::{InventoryError, Result};
use crate::fixed_point::Pct;

/// A rebalance candidate (spec §3's "Rebalance plan entry").
#[derive(Debug, Clone)]
pub struct RebalanceCandidate {
    pub chain_id: u64,
    pub l1_token: String,
    pub threshold_pct: Pct,
    pub target_pct: Pct,
    pub current_alloc_pct: Pct,
    /// Hub-chain balance snapshot taken at planning time.
    pub balance: i128,
    pub cumulative_balance: i128,
    pub amount: i128,
}

#[derive(Debug, Clone)]
pub struct ExecutedRebalance {
    pub candidate: RebalanceCandidate,
    pub tx_hash: TxHash,
}

#[derive(Debug, Clone)]
pub struct UnexecutedRebalance {
    pub candidate: RebalanceCandidate,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct RebalanceCycleResult {
    pub executed: Vec<ExecutedRebalance>,
    pub unexecuted: Vec<UnexecutedRebalance>,
}

enum GateOutcome {
    Executed(TxHash),
    Unexecuted(String),
}

impl InventoryManager {
    /// Detects under-allocated L2 chains and computes transfer amounts.
    /// Does not gate by hub balance — that's the executor's job.
    pub async fn plan_rebalances(&self) -> Result<Vec<RebalanceCandidate>> {
        if !self.config.enabled {
            self.log_disabled_once();
            return Ok(Vec::new());
        }

        let distribution = self.token_distribution().await?;
        tracing::debug!(tokens = distribution.len(), "considering rebalance");

        let mut candidates = Vec::new();
        for l1_token in self.config.managed_tokens() {
            let cumulative = self.cumulative_balance(&l1_token).await?;
            if cumulative <= 0 {
                continue;
            }

            // Deterministic iteration: token_config is a BTreeMap, so both
            // the outer token loop and this inner chain loop visit entries
            // in sorted-key order every cycle (spec §9's "Deterministic
            // iteration" note).
            let Some(chains) = self.config.token_config.get(&l1_token).cloned() else {
                continue;
            };

            for (chain_id, chain_cfg) in chains {
                if chain_id == self.config.hub_chain_id {
                    continue; // rebalances only target L2 chains.
                }

                let current = self.current_alloc_pct(&l1_token, chain_id).await?;
                if current >= chain_cfg.threshold_pct {
                    continue;
                }

                let amount = (chain_cfg.target_pct - current).apply_to(cumulative);
                let hub_balance = self
                    .token_client
                    .balance(self.config.hub_chain_id, &l1_token)
                    .await?;

                candidates.push(RebalanceCandidate {
                    chain_id,
                    l1_token: l1_token.clone(),
                    threshold_pct: chain_cfg.threshold_pct,
                    target_pct: chain_cfg.target_pct,
                    current_alloc_pct: current,
                    balance: hub_balance,
                    cumulative_balance: cumulative,
                    amount,
                });
            }
        }

        Ok(candidates)
    }

    /// Runs a full rebalance cycle: plan, gate by hub balance, submit
    /// serially. Errors from planning or submission are logged and the
    /// cycle returns normally with whatever progress was made (spec §7).
    pub async fn rebalance_inventory_if_needed(&self, sim_mode: bool) -> RebalanceCycleResult {
        let candidates = match self.plan_rebalances().await {
            Ok(candidates) => candidates,
            Err(err) => {
                tracing::error!(error = %err, "rebalance planning failed");
                return RebalanceCycleResult::default();
            }
        };

        let mut result = RebalanceCycleResult::default();

        for candidate in candidates {
            match self.gate_and_submit_rebalance(&candidate, sim_mode).await {
                Ok(GateOutcome::Executed(tx_hash)) => {
                    result.executed.push(ExecutedRebalance { candidate, tx_hash });
                }
                Ok(GateOutcome::Unexecuted(reason)) => {
                    result.unexecuted.push(UnexecutedRebalance { candidate, reason });
                }
                Err(err) => {
                    tracing::error!(
                        error = %err,
                        executed = result.executed.len(),
                        unexecuted = result.unexecuted.len(),
                        "rebalance submission failed; stopping cycle, partial progress retained"
                    );
                    break;
                }
            }
        }

        result
    }

    async fn gate_and_submit_rebalance(
        &self,
        candidate: &RebalanceCandidate,
        sim_mode: bool,
    ) -> anyhow::Result<GateOutcome> {
        // Re-read the relayer's hub balance; already reflects deductions
        // from earlier iterations in this same cycle.
        let unallocated_hub_balance = self
            .token_client
            .balance(self.config.hub_chain_id, &candidate.l1_token)
            .await?;
        if candidate.amount > unallocated_hub_balance {
            return Ok(GateOutcome::Unexecuted(format!(
                "insufficient hub balance: available={unallocated_hub_balance}, requested={}",
                candidate.amount
            )));
        }

        // Re-fetch the true on-chain balance, not the local tracked view —
        // this process's own decrements from earlier candidates in this
        // cycle must not trip this guard. If it differs from the
        // planner's snapshot, another bot instance may have acted first.
        let on_chain_balance = self
            .token_client
            .on_chain_balance(self.config.hub_chain_id, &candidate.l1_token)
            .await?;
        if on_chain_balance != candidate.balance {
            let err = InventoryError::BalanceChanged {
                chain_id: candidate.chain_id,
                planned: candidate.balance,
                observed: on_chain_balance,
            };
            tracing::warn!(chain_id = candidate.chain_id, l1_token = %candidate.l1_token, "{err}");
            return Ok(GateOutcome::Unexecuted(err.to_string()));
        }

        // Accept: bookkeeping happens before submission, so a failed
        // submission still leaves the under-sending bias spec §5 wants.
        self.token_client
            .decrement_local_balance(self.config.hub_chain_id, &candidate.l1_token, candidate.amount);
        self.cross_chain_client.increase_outstanding_transfer(
            &self.relayer,
            &candidate.l1_token,
            candidate.amount,
            candidate.chain_id,
        );

        let tx_hash = self
            .adapter_manager
            .send_token_cross_chain(
                &self.relayer,
                candidate.chain_id,
                &candidate.l1_token,
                candidate.amount,
                sim_mode,
            )
            .await?;

        Ok(GateOutcome::Executed(tx_hash))
    }
}
