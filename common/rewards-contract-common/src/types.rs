// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use cosmwasm_std::Decimal;
use ethers::types::Address;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

pub type SubmissionId = u64;

/// A single contribution as recorded by the rewards contract,
/// with all amounts already expressed in whole tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: SubmissionId,
    pub field: String,
    pub description: String,
    pub contributor: Address,

    #[serde(with = "time::serde::timestamp")]
    pub timestamp: OffsetDateTime,

    pub reward_amount: Decimal,
    pub approved: bool,
}

/// Single page of submissions alongside the total number of pages known to the contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionsPage {
    pub items: Vec<Submission>,
    pub total_pages: u32,
}

impl SubmissionsPage {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Contract-wide parameters that are always read and replaced together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractParams {
    pub paused: bool,
    pub reward_per_submission: Decimal,
}
