// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::sync::PageState;
use crate::views::{format_amount, write_submissions, yes_no};
use edu_rewards_contract_common::{ContractParams, Decimal, Submission};
use serde::Serialize;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PagePosition {
    pub current_page: u32,
    pub total_pages: u32,
}

/// Submissions awaiting review, either a single page or the complete list.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionsListing {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<PagePosition>,
    pub submissions: Vec<Submission>,
}

impl SubmissionsListing {
    pub fn from_page(page: &PageState) -> Self {
        SubmissionsListing {
            position: Some(PagePosition {
                current_page: page.current_page,
                total_pages: page.total_pages,
            }),
            submissions: page.items.clone(),
        }
    }

    pub fn complete(submissions: Vec<Submission>) -> Self {
        SubmissionsListing {
            position: None,
            submissions,
        }
    }
}

impl Display for SubmissionsListing {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write_submissions(f, &self.submissions)?;
        if let Some(position) = self.position {
            if position.total_pages > 0 {
                // pages are shown 1-indexed
                write!(
                    f,
                    "\n\npage {} of {}",
                    position.current_page + 1,
                    position.total_pages
                )?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ContractOverview {
    pub paused: bool,
    pub reward_per_submission: Decimal,
}

impl From<ContractParams> for ContractOverview {
    fn from(params: ContractParams) -> Self {
        ContractOverview {
            paused: params.paused,
            reward_per_submission: params.reward_per_submission,
        }
    }
}

impl Display for ContractOverview {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Contract paused:       {}", yes_no(self.paused))?;
        write!(
            f,
            "Reward per submission: {}",
            format_amount(self.reward_per_submission)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edu_rewards_contract_common::Address;
    use std::str::FromStr;
    use time::OffsetDateTime;

    fn submission(id: u64, approved: bool) -> Submission {
        Submission {
            id,
            field: "physics".to_string(),
            description: "lecture notes".to_string(),
            contributor: Address::repeat_byte(0xc0),
            timestamp: OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap(),
            reward_amount: Decimal::from_str("1.5").unwrap(),
            approved,
        }
    }

    #[test]
    fn empty_listing() {
        let listing = SubmissionsListing::from_page(&PageState::empty());
        assert_eq!(listing.to_string(), "No submissions found");

        let listing = SubmissionsListing::complete(Vec::new());
        assert_eq!(listing.to_string(), "No submissions found");
    }

    #[test]
    fn paged_listing() {
        let page = PageState {
            current_page: 1,
            total_pages: 3,
            items: vec![submission(4, true), submission(5, false)],
        };
        let rendered = SubmissionsListing::from_page(&page).to_string();

        assert!(rendered.contains("ID:          4"));
        assert!(rendered.contains("Approved:    Yes"));
        assert!(rendered.contains("Approved:    No"));
        assert!(rendered.contains("Reward:      1.5 EDU"));
        assert!(rendered.contains("Contributor: 0xc0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0"));
        assert!(rendered.ends_with("page 2 of 3"));
    }

    #[test]
    fn json_listing_omits_missing_position() {
        let listing = SubmissionsListing::complete(vec![submission(1, false)]);
        let json = serde_json::to_value(&listing).unwrap();
        assert!(json.get("position").is_none());
        assert_eq!(json["submissions"][0]["approved"], false);
    }

    #[test]
    fn overview() {
        let overview = ContractOverview::from(ContractParams {
            paused: true,
            reward_per_submission: Decimal::from_str("2").unwrap(),
        });
        assert_eq!(
            overview.to_string(),
            "Contract paused:       Yes\nReward per submission: 2 EDU"
        );
    }
}
