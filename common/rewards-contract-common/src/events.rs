// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::constants::events::{SUBMISSION_APPROVED, SUBMISSION_CREATED};
use crate::types::SubmissionId;
use ethers::types::{Address, TxHash};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Kinds of notifications emitted by the rewards contract that clients can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NotificationKind {
    SubmissionCreated,
    SubmissionApproved,
}

impl NotificationKind {
    pub const ALL: [NotificationKind; 2] = [
        NotificationKind::SubmissionCreated,
        NotificationKind::SubmissionApproved,
    ];

    pub fn topic(&self) -> &'static str {
        match self {
            NotificationKind::SubmissionCreated => SUBMISSION_CREATED,
            NotificationKind::SubmissionApproved => SUBMISSION_APPROVED,
        }
    }
}

impl Display for NotificationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.topic())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractNotification {
    pub kind: NotificationKind,
    pub submission_id: SubmissionId,
    pub contributor: Address,

    /// Hash of the transaction that emitted the event, if known.
    pub tx_hash: Option<TxHash>,
}
