// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

pub mod constants;
pub mod events;
pub mod msg;
pub mod types;

pub use cosmwasm_std::Decimal;
pub use ethers::types::{Address, TxHash, U256};
pub use events::{ContractNotification, NotificationKind};
pub use msg::{ExecuteMsg, QueryMsg, QueryResponse, RawSubmission};
pub use types::{ContractParams, Submission, SubmissionId, SubmissionsPage};
