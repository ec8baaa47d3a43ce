//! Refund Chain Selector (C3).
//!
//! Given a pending fill, decides which chain should receive the
//! relayer's refund so the resulting allocation moves toward targets.
//! Exactly the 8-step algorithm in spec §4.3.

use crate::collaborators::FillDescriptor;
use crate::core::InventoryManager;
use crate::error::{InventoryError, Result};
use crate::fixed_point::Pct;

impl InventoryManager {
    /// Chooses a refund chain for `fill`. Errors propagate to the caller —
    /// this is one fill's repayment decision, not a cycle — per spec §7's
    /// propagation policy.
    pub async fn determine_refund_chain_id(&self, fill: &FillDescriptor) -> Result<u64> {
        // Step 1: disabled short-circuits to the destination chain.
        if !self.config.enabled {
            self.log_disabled_once();
            return Ok(fill.destination_chain_id);
        }

        // Step 2: this core assumes a 1:1 input/output relationship.
        if !self.hub_pool_client.are_tokens_equivalent(
            &fill.input_token,
            fill.origin_chain_id,
            &fill.output_token,
            fill.destination_chain_id,
        ) {
            return Err(InventoryError::TokenMismatch {
                origin_chain_id: fill.origin_chain_id,
                destination_chain_id: fill.destination_chain_id,
            });
        }

        // Step 3: resolve the L1 token if the caller didn't precompute it.
        let l1_token = match &fill.l1_token {
            Some(token) => token.clone(),
            None => self
                .hub_pool_client
                .l1_token_for(&fill.output_token, fill.destination_chain_id)
                .ok_or_else(|| InventoryError::MissingTokenInfo {
                    l1_token: fill.output_token.clone(),
                })?,
        };

        // Step 4: if neither origin nor destination is managed for this
        // token, there's nothing to optimize for — return the destination.
        let destination_configured = self
            .config
            .chain_config(&l1_token, fill.destination_chain_id)
            .is_some();
        let origin_configured = self.config.chain_config(&l1_token, fill.origin_chain_id).is_some();
        if !destination_configured && !origin_configured {
            return Ok(fill.destination_chain_id);
        }

        let hub_chain_id = self.config.hub_chain_id;

        // Step 5: fetch per-chain upcoming refunds (C7) and totals.
        let refund_sets = self.fetch_cached_refunds().await?;
        let cumulative_virtual = self.cumulative_balance(&l1_token).await?;
        let cumulative_refunds: i128 = self
            .config
            .enabled_chains_for(&l1_token)
            .iter()
            .map(|&c| {
                self.bundle_data_client
                    .total_refund(&refund_sets, &self.relayer, c, &l1_token)
            })
            .sum();

        // Step 6: destination first, then origin if it differs from the hub.
        let mut chains_to_evaluate = vec![fill.destination_chain_id];
        if fill.origin_chain_id != hub_chain_id {
            chains_to_evaluate.push(fill.origin_chain_id);
        }

        // Step 7: evaluate candidates in order.
        for chain_id in chains_to_evaluate {
            let Some(chain_cfg) = self.config.chain_config(&l1_token, chain_id) else {
                continue;
            };

            let shortfall_c = self.shortfall(&l1_token, chain_id).await?;
            let chain_virt = self.balance_on(chain_id, &l1_token).await? - shortfall_c;
            let refund_c = self
                .bundle_data_client
                .total_refund(&refund_sets, &self.relayer, chain_id, &l1_token);

            let chain_virt_post = if chain_id == fill.destination_chain_id {
                chain_virt - fill.output_amount
            } else {
                chain_virt
            } + refund_c;

            let cum_virt_with_shortfall = cumulative_virtual - shortfall_c + cumulative_refunds;
            let cum_virt_post = cum_virt_with_shortfall - fill.output_amount;

            if cum_virt_post == 0 {
                tracing::warn!(
                    l1_token = %l1_token,
                    chain_id,
                    "post-relay cumulative virtual balance is zero; falling back to the hub to avoid division by zero"
                );
                return Ok(hub_chain_id);
            }

            let expected_pct = Pct::from_ratio(chain_virt_post, cum_virt_post);
            if expected_pct <= chain_cfg.target_pct {
                return Ok(chain_id);
            }
        }

        // Step 8: no candidate qualified.
        Ok(hub_chain_id)
    }

    async fn fetch_cached_refunds(&self) -> Result<std::sync::Arc<Vec<crate::collaborators::RefundSet>>> {
        let relayer = self.relayer.clone();
        let bundle_data_client = self.bundle_data_client.clone();
        let refunds = self
            .refund_cache
            .get_or_fetch(move || async move {
                let (pending, next) = tokio::join!(
                    bundle_data_client.pending_refunds_from_valid_bundles(&relayer),
                    bundle_data_client.next_bundle_refunds(&relayer),
                );
                let pending = pending?;
                let next = next?;

                // Open question (spec §9): the original log line prints only
                // pending_refunds[0], suggesting a single-entry expectation.
                // We don't silently assume that — surface a warning if it's
                // violated, and still fold every set into the total.
                if pending.len() > 1 {
                    tracing::warn!(
                        count = pending.len(),
                        "multiple valid-bundle refund sets observed; folding all of them into the total"
                    );
                } else {
                    tracing::debug!(count = pending.len(), "pending refunds from valid bundles");
                }

                let mut all = pending;
                all.extend(next);
                Ok(all)
            })
            .await?;
        Ok(refunds)
    }
}
