// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use edu_rewards_contract_common::{
    Address, ContractNotification, NotificationKind, RawSubmission, TxHash, U256,
};
use ethers::prelude::abigen;

abigen!(
    RewardsContract,
    r#"[
        struct Submission { uint256 id; string field; string description; address contributor; uint256 timestamp; uint256 reward; bool isApproved; }
        function getPagedContributions(uint256 page) external view returns (Submission[], uint256)
        function getAllSubmissions() external view returns (Submission[])
        function getContributorRewards(address contributor) external view returns (uint256)
        function paused() external view returns (bool)
        function rewardPerSubmission() external view returns (uint256)
        function submitContribution(string field, string description) external
        function approveSubmission(uint256 submissionId) external
        function pause() external
        function unpause() external
        function setRewardPerSubmission(uint256 amount) external
        function fundRewardPool(uint256 amount) external
        function claimRewards() external
        event SubmissionCreated(uint256 indexed id, address indexed contributor, string field)
        event SubmissionApproved(uint256 indexed id, address indexed contributor, uint256 reward)
    ]"#
);

/// Single element of the submission arrays returned by `getPagedContributions` and `getAllSubmissions`.
pub(crate) type SubmissionTuple = (U256, String, String, Address, U256, U256, bool);

pub(crate) fn raw_submission(
    (id, field, description, contributor, timestamp, reward, is_approved): SubmissionTuple,
) -> RawSubmission {
    RawSubmission {
        id,
        field,
        description,
        contributor,
        timestamp,
        reward,
        is_approved,
    }
}

/// Contract events that are turned into client notifications.
pub(crate) trait IntoNotification {
    const KIND: NotificationKind;

    fn into_notification(self, tx_hash: Option<TxHash>) -> ContractNotification;
}

impl IntoNotification for SubmissionCreatedFilter {
    const KIND: NotificationKind = NotificationKind::SubmissionCreated;

    fn into_notification(self, tx_hash: Option<TxHash>) -> ContractNotification {
        ContractNotification {
            kind: Self::KIND,
            submission_id: self.id.low_u64(),
            contributor: self.contributor,
            tx_hash,
        }
    }
}

impl IntoNotification for SubmissionApprovedFilter {
    const KIND: NotificationKind = NotificationKind::SubmissionApproved;

    fn into_notification(self, tx_hash: Option<TxHash>) -> ContractNotification {
        ContractNotification {
            kind: Self::KIND,
            submission_id: self.id.low_u64(),
            contributor: self.contributor,
            tx_hash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_tuple_fields_keep_their_positions() {
        let contributor = Address::repeat_byte(0x42);
        let raw = raw_submission((
            U256::from(7),
            "chemistry".to_string(),
            "titration guide".to_string(),
            contributor,
            U256::from(1_700_000_012u64),
            U256::exp10(18),
            true,
        ));

        assert_eq!(raw.id, U256::from(7));
        assert_eq!(raw.field, "chemistry");
        assert_eq!(raw.description, "titration guide");
        assert_eq!(raw.contributor, contributor);
        assert_eq!(raw.timestamp, U256::from(1_700_000_012u64));
        assert_eq!(raw.reward, U256::exp10(18));
        assert!(raw.is_approved);
    }

    #[test]
    fn events_become_notifications() {
        let contributor = Address::repeat_byte(0x42);
        let tx_hash = TxHash::repeat_byte(0x01);
        let notification = SubmissionApprovedFilter {
            id: U256::from(3),
            contributor,
            reward: U256::exp10(18),
        }
        .into_notification(Some(tx_hash));

        assert_eq!(notification.kind, NotificationKind::SubmissionApproved);
        assert_eq!(notification.submission_id, 3);
        assert_eq!(notification.contributor, contributor);
        assert_eq!(notification.tx_hash, Some(tx_hash));
    }
}
