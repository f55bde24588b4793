// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

/// Number of decimal places of the reward token, i.e. one EDU is `10^18` base units on chain.
pub const REWARD_TOKEN_DECIMALS: u32 = 18;

pub const REWARD_TOKEN_SYMBOL: &str = "EDU";

/// Number of submissions returned by a single `getPagedContributions` call
/// of the currently deployed contract.
pub const DEFAULT_PAGE_SIZE: usize = 10;

pub mod events {
    pub const SUBMISSION_CREATED: &str = "SubmissionCreated";
    pub const SUBMISSION_APPROVED: &str = "SubmissionApproved";
}
