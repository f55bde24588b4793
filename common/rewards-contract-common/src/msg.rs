// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

//! Raw messages exchanged with the rewards contract.
//!
//! All amounts in here are expressed in the token base unit (`10^-18` EDU)
//! and timestamps as unix seconds, exactly as the contract stores them.

use crate::types::SubmissionId;
use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
    SubmitContribution { field: String, description: String },
    ApproveSubmission { submission_id: SubmissionId },
    Pause {},
    Unpause {},
    SetRewardPerSubmission { amount: U256 },
    FundRewardPool { amount: U256 },
    ClaimRewards {},
}

impl ExecuteMsg {
    pub fn name(&self) -> &'static str {
        match self {
            ExecuteMsg::SubmitContribution { .. } => "RewardsContract::SubmitContribution",
            ExecuteMsg::ApproveSubmission { .. } => "RewardsContract::ApproveSubmission",
            ExecuteMsg::Pause {} => "RewardsContract::Pause",
            ExecuteMsg::Unpause {} => "RewardsContract::Unpause",
            ExecuteMsg::SetRewardPerSubmission { .. } => "RewardsContract::SetRewardPerSubmission",
            ExecuteMsg::FundRewardPool { .. } => "RewardsContract::FundRewardPool",
            ExecuteMsg::ClaimRewards {} => "RewardsContract::ClaimRewards",
        }
    }
}

impl Display for ExecuteMsg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMsg {
    GetPagedContributions { page: u32 },
    GetAllSubmissions {},
    GetContributorRewards { contributor: Address },
    Paused {},
    RewardPerSubmission {},
}

impl QueryMsg {
    pub fn name(&self) -> &'static str {
        match self {
            QueryMsg::GetPagedContributions { .. } => "getPagedContributions",
            QueryMsg::GetAllSubmissions {} => "getAllSubmissions",
            QueryMsg::GetContributorRewards { .. } => "getContributorRewards",
            QueryMsg::Paused {} => "paused",
            QueryMsg::RewardPerSubmission {} => "rewardPerSubmission",
        }
    }
}

/// Submission exactly as returned by the contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSubmission {
    pub id: U256,
    pub field: String,
    pub description: String,
    pub contributor: Address,
    pub timestamp: U256,
    pub reward: U256,
    pub is_approved: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryResponse {
    PagedSubmissions {
        submissions: Vec<RawSubmission>,
        total_pages: U256,
    },
    Submissions(Vec<RawSubmission>),
    Amount(U256),
    Flag(bool),
}

impl QueryResponse {
    pub fn kind(&self) -> &'static str {
        match self {
            QueryResponse::PagedSubmissions { .. } => "paged submissions",
            QueryResponse::Submissions(_) => "submissions",
            QueryResponse::Amount(_) => "amount",
            QueryResponse::Flag(_) => "flag",
        }
    }
}
