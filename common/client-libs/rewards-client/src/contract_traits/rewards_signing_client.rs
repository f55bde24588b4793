// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::amount::to_base_units;
use crate::error::GatewayError;
use crate::pending::PendingTx;
use async_trait::async_trait;
use edu_rewards_contract_common::{
    Address, Decimal, ExecuteMsg as RewardsExecuteMsg, SubmissionId,
};

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait RewardsSigningClient {
    /// Address of the account signing the transactions.
    fn signer_address(&self) -> Result<Address, GatewayError>;

    async fn execute_rewards_contract(
        &self,
        msg: RewardsExecuteMsg,
    ) -> Result<PendingTx, GatewayError>;

    async fn submit_contribution(
        &self,
        field: String,
        description: String,
    ) -> Result<PendingTx, GatewayError> {
        self.execute_rewards_contract(RewardsExecuteMsg::SubmitContribution { field, description })
            .await
    }

    async fn approve_submission(
        &self,
        submission_id: SubmissionId,
    ) -> Result<PendingTx, GatewayError> {
        self.execute_rewards_contract(RewardsExecuteMsg::ApproveSubmission { submission_id })
            .await
    }

    async fn pause(&self) -> Result<PendingTx, GatewayError> {
        self.execute_rewards_contract(RewardsExecuteMsg::Pause {})
            .await
    }

    async fn unpause(&self) -> Result<PendingTx, GatewayError> {
        self.execute_rewards_contract(RewardsExecuteMsg::Unpause {})
            .await
    }

    async fn set_reward_per_submission(&self, amount: Decimal) -> Result<PendingTx, GatewayError> {
        self.execute_rewards_contract(RewardsExecuteMsg::SetRewardPerSubmission {
            amount: to_base_units(amount),
        })
        .await
    }

    async fn fund_reward_pool(&self, amount: Decimal) -> Result<PendingTx, GatewayError> {
        self.execute_rewards_contract(RewardsExecuteMsg::FundRewardPool {
            amount: to_base_units(amount),
        })
        .await
    }

    async fn claim_rewards(&self) -> Result<PendingTx, GatewayError> {
        self.execute_rewards_contract(RewardsExecuteMsg::ClaimRewards {})
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract_traits::tests::IgnoreValue;

    // it's enough that this compiles and clippy is happy about it
    #[allow(dead_code)]
    fn all_execute_variants_are_covered<C: RewardsSigningClient + Send + Sync>(
        client: C,
        msg: RewardsExecuteMsg,
    ) {
        match msg {
            RewardsExecuteMsg::SubmitContribution { field, description } => {
                client.submit_contribution(field, description).ignore()
            }
            RewardsExecuteMsg::ApproveSubmission { submission_id } => {
                client.approve_submission(submission_id).ignore()
            }
            RewardsExecuteMsg::Pause {} => client.pause().ignore(),
            RewardsExecuteMsg::Unpause {} => client.unpause().ignore(),
            RewardsExecuteMsg::SetRewardPerSubmission { .. } => {
                client.set_reward_per_submission(Decimal::one()).ignore()
            }
            RewardsExecuteMsg::FundRewardPool { .. } => {
                client.fund_reward_pool(Decimal::one()).ignore()
            }
            RewardsExecuteMsg::ClaimRewards {} => client.claim_rewards().ignore(),
        };
    }
}
