// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::sync::SyncedState;
use crate::views::{format_amount, write_submissions, yes_no};
use edu_rewards_contract_common::{Address, Decimal, Submission};
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// What a contributor sees about their own participation.
#[derive(Debug, Clone, Serialize)]
pub struct ContributorStatus {
    pub account: Address,
    pub claimable_reward: Decimal,
    pub reward_per_submission: Decimal,
    pub paused: bool,
    pub submissions: Vec<Submission>,
}

impl ContributorStatus {
    /// Combine the mirrored state with the complete submission list,
    /// keeping only the submissions made by the provided account.
    pub fn new(account: Address, state: &SyncedState, all_submissions: Vec<Submission>) -> Self {
        ContributorStatus {
            account,
            claimable_reward: state.reward_balance.unwrap_or_default(),
            reward_per_submission: state.params.reward_per_submission,
            paused: state.params.paused,
            submissions: all_submissions
                .into_iter()
                .filter(|submission| submission.contributor == account)
                .collect(),
        }
    }
}

impl Display for ContributorStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Account:               {:?}", self.account)?;
        writeln!(
            f,
            "Claimable rewards:     {}",
            format_amount(self.claimable_reward)
        )?;
        writeln!(
            f,
            "Reward per submission: {}",
            format_amount(self.reward_per_submission)
        )?;
        writeln!(f, "Contract paused:       {}", yes_no(self.paused))?;
        writeln!(f)?;
        writeln!(f, "Your submissions:")?;
        write_submissions(f, &self.submissions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edu_rewards_contract_common::ContractParams;
    use std::str::FromStr;
    use time::OffsetDateTime;

    fn submission(id: u64, contributor: Address) -> Submission {
        Submission {
            id,
            field: "literature".to_string(),
            description: "book review".to_string(),
            contributor,
            timestamp: OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap(),
            reward_amount: Decimal::zero(),
            approved: false,
        }
    }

    #[test]
    fn only_own_submissions_are_listed() {
        let me = Address::repeat_byte(0x01);
        let someone_else = Address::repeat_byte(0x02);
        let state = SyncedState {
            params: ContractParams {
                paused: false,
                reward_per_submission: Decimal::one(),
            },
            reward_balance: Some(Decimal::from_str("0.75").unwrap()),
            ..Default::default()
        };

        let status = ContributorStatus::new(
            me,
            &state,
            vec![submission(1, me), submission(2, someone_else), submission(3, me)],
        );

        let ids: Vec<_> = status.submissions.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 3]);

        let rendered = status.to_string();
        assert!(rendered.contains("Claimable rewards:     0.75 EDU"));
        assert!(rendered.contains("Contract paused:       No"));
    }

    #[test]
    fn no_submissions_yet() {
        let status = ContributorStatus::new(
            Address::repeat_byte(0x01),
            &SyncedState::default(),
            Vec::new(),
        );
        let rendered = status.to_string();
        assert!(rendered.contains("Claimable rewards:     0 EDU"));
        assert!(rendered.ends_with("Your submissions:\nNo submissions found"));
    }
}
