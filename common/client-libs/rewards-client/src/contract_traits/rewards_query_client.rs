// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::amount::from_base_units;
use crate::error::GatewayError;
use async_trait::async_trait;
use edu_rewards_contract_common::{
    Address, Decimal, QueryMsg as RewardsQueryMsg, QueryResponse, RawSubmission, Submission,
    SubmissionsPage, U256,
};
use time::OffsetDateTime;

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait RewardsQueryClient {
    async fn query_rewards_contract(
        &self,
        query: RewardsQueryMsg,
    ) -> Result<QueryResponse, GatewayError>;

    async fn get_paged_submissions(&self, page: u32) -> Result<SubmissionsPage, GatewayError> {
        let query = RewardsQueryMsg::GetPagedContributions { page };
        let operation = query.name();
        match self.query_rewards_contract(query).await? {
            QueryResponse::PagedSubmissions {
                submissions,
                total_pages,
            } => Ok(SubmissionsPage {
                items: parse_submissions(submissions)?,
                total_pages: try_into_u32("total pages", total_pages)?,
            }),
            other => Err(GatewayError::unexpected_response(operation, other.kind())),
        }
    }

    async fn get_all_submissions(&self) -> Result<Vec<Submission>, GatewayError> {
        let query = RewardsQueryMsg::GetAllSubmissions {};
        let operation = query.name();
        match self.query_rewards_contract(query).await? {
            QueryResponse::Submissions(submissions) => parse_submissions(submissions),
            other => Err(GatewayError::unexpected_response(operation, other.kind())),
        }
    }

    async fn get_contributor_reward(&self, contributor: Address) -> Result<Decimal, GatewayError> {
        let query = RewardsQueryMsg::GetContributorRewards { contributor };
        let operation = query.name();
        match self.query_rewards_contract(query).await? {
            QueryResponse::Amount(amount) => from_base_units("contributor reward", amount),
            other => Err(GatewayError::unexpected_response(operation, other.kind())),
        }
    }

    async fn get_paused(&self) -> Result<bool, GatewayError> {
        let query = RewardsQueryMsg::Paused {};
        let operation = query.name();
        match self.query_rewards_contract(query).await? {
            QueryResponse::Flag(paused) => Ok(paused),
            other => Err(GatewayError::unexpected_response(operation, other.kind())),
        }
    }

    async fn get_reward_per_submission(&self) -> Result<Decimal, GatewayError> {
        let query = RewardsQueryMsg::RewardPerSubmission {};
        let operation = query.name();
        match self.query_rewards_contract(query).await? {
            QueryResponse::Amount(amount) => from_base_units("reward per submission", amount),
            other => Err(GatewayError::unexpected_response(operation, other.kind())),
        }
    }
}

fn try_into_u32(field: &'static str, value: U256) -> Result<u32, GatewayError> {
    if value > U256::from(u32::MAX) {
        return Err(GatewayError::ValueOutOfRange {
            field,
            value: value.to_string(),
        });
    }
    Ok(value.as_u32())
}

fn try_into_u64(field: &'static str, value: U256) -> Result<u64, GatewayError> {
    if value > U256::from(u64::MAX) {
        return Err(GatewayError::ValueOutOfRange {
            field,
            value: value.to_string(),
        });
    }
    Ok(value.as_u64())
}

fn parse_submission(raw: RawSubmission) -> Result<Submission, GatewayError> {
    let unix_timestamp = try_into_u64("submission timestamp", raw.timestamp)?;
    let timestamp = i64::try_from(unix_timestamp)
        .ok()
        .and_then(|ts| OffsetDateTime::from_unix_timestamp(ts).ok())
        .ok_or_else(|| GatewayError::ValueOutOfRange {
            field: "submission timestamp",
            value: unix_timestamp.to_string(),
        })?;

    Ok(Submission {
        id: try_into_u64("submission id", raw.id)?,
        field: raw.field,
        description: raw.description,
        contributor: raw.contributor,
        timestamp,
        reward_amount: from_base_units("submission reward", raw.reward)?,
        approved: raw.is_approved,
    })
}

fn parse_submissions(raw: Vec<RawSubmission>) -> Result<Vec<Submission>, GatewayError> {
    raw.into_iter().map(parse_submission).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract_traits::tests::IgnoreValue;
    use std::str::FromStr;

    // it's enough that this compiles and clippy is happy about it
    #[allow(dead_code)]
    fn all_query_variants_are_covered<C: RewardsQueryClient + Send + Sync>(
        client: C,
        msg: RewardsQueryMsg,
    ) {
        match msg {
            RewardsQueryMsg::GetPagedContributions { page } => {
                client.get_paged_submissions(page).ignore()
            }
            RewardsQueryMsg::GetAllSubmissions {} => client.get_all_submissions().ignore(),
            RewardsQueryMsg::GetContributorRewards { contributor } => {
                client.get_contributor_reward(contributor).ignore()
            }
            RewardsQueryMsg::Paused {} => client.get_paused().ignore(),
            RewardsQueryMsg::RewardPerSubmission {} => client.get_reward_per_submission().ignore(),
        };
    }

    struct FixedResponse(QueryResponse);

    #[async_trait]
    impl RewardsQueryClient for FixedResponse {
        async fn query_rewards_contract(
            &self,
            _: RewardsQueryMsg,
        ) -> Result<QueryResponse, GatewayError> {
            Ok(self.0.clone())
        }
    }

    fn raw_submission(id: u64, reward: U256) -> RawSubmission {
        RawSubmission {
            id: U256::from(id),
            field: "mathematics".to_string(),
            description: "proof of the four colour theorem".to_string(),
            contributor: Address::repeat_byte(0x42),
            timestamp: U256::from(1_717_171_717u64),
            reward,
            is_approved: true,
        }
    }

    #[tokio::test]
    async fn raw_submissions_are_unscaled() {
        let client = FixedResponse(QueryResponse::PagedSubmissions {
            submissions: vec![raw_submission(7, U256::from(1_500_000_000_000_000_000u128))],
            total_pages: U256::from(3),
        });

        let page = client.get_paged_submissions(2).await.unwrap();
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items.len(), 1);

        let submission = &page.items[0];
        assert_eq!(submission.id, 7);
        assert_eq!(submission.reward_amount, Decimal::from_str("1.5").unwrap());
        assert_eq!(submission.timestamp.unix_timestamp(), 1_717_171_717);
        assert!(submission.approved);
    }

    #[tokio::test]
    async fn mismatched_response_is_rejected() {
        let client = FixedResponse(QueryResponse::Flag(true));

        let err = client.get_reward_per_submission().await.unwrap_err();
        assert_eq!(
            err,
            GatewayError::unexpected_response("rewardPerSubmission", "flag")
        );
    }

    #[tokio::test]
    async fn oversized_submission_id_is_rejected() {
        let mut raw = raw_submission(1, U256::zero());
        raw.id = U256::from(u64::MAX) + U256::one();
        let client = FixedResponse(QueryResponse::Submissions(vec![raw]));

        let err = client.get_all_submissions().await.unwrap_err();
        assert!(matches!(
            err,
            GatewayError::ValueOutOfRange {
                field: "submission id",
                ..
            }
        ));
    }
}
