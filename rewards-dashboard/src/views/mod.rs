// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::dispatcher::{ActionKind, ActionOutcome};
use edu_rewards_contract_common::constants::REWARD_TOKEN_SYMBOL;
use edu_rewards_contract_common::{Decimal, Submission, TxHash};
use serde::Serialize;
use std::fmt::{Display, Formatter};
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

pub mod admin;
pub mod contributor;

pub(crate) fn format_amount(amount: Decimal) -> String {
    format!("{amount} {REWARD_TOKEN_SYMBOL}")
}

pub(crate) fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Renders the timestamp in the local timezone, or in UTC if it can't be determined.
pub(crate) fn format_timestamp(timestamp: OffsetDateTime) -> String {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    format_timestamp_at(timestamp, offset)
}

fn format_timestamp_at(timestamp: OffsetDateTime, offset: UtcOffset) -> String {
    timestamp
        .to_offset(offset)
        .format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ))
        .unwrap_or_else(|_| timestamp.unix_timestamp().to_string())
}

pub(crate) fn write_submission(f: &mut Formatter<'_>, submission: &Submission) -> std::fmt::Result {
    writeln!(f, "ID:          {}", submission.id)?;
    writeln!(f, "Field:       {}", submission.field)?;
    writeln!(f, "Description: {}", submission.description)?;
    writeln!(f, "Contributor: {:?}", submission.contributor)?;
    writeln!(f, "Timestamp:   {}", format_timestamp(submission.timestamp))?;
    writeln!(f, "Reward:      {}", format_amount(submission.reward_amount))?;
    write!(f, "Approved:    {}", yes_no(submission.approved))
}

pub(crate) fn write_submissions(
    f: &mut Formatter<'_>,
    submissions: &[Submission],
) -> std::fmt::Result {
    if submissions.is_empty() {
        return write!(f, "No submissions found");
    }
    for (i, submission) in submissions.iter().enumerate() {
        if i > 0 {
            writeln!(f)?;
            writeln!(f)?;
        }
        write_submission(f, submission)?;
    }
    Ok(())
}

/// Result of a confirmed write action.
#[derive(Debug, Clone, Serialize)]
pub struct ActionReport {
    pub action: ActionKind,
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
}

impl From<ActionOutcome> for ActionReport {
    fn from(outcome: ActionOutcome) -> Self {
        ActionReport {
            action: outcome.action,
            tx_hash: outcome.receipt.tx_hash,
            block_number: outcome.receipt.block_number,
        }
    }
}

impl Display for ActionReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "finished {} in transaction {:?}", self.action, self.tx_hash)?;
        if let Some(block) = self.block_number {
            write!(f, " (block {block})")?;
        }
        Ok(())
    }
}
