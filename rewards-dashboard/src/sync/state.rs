// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use edu_rewards_contract_common::{ContractParams, Decimal, Submission};
use serde::Serialize;

/// Locally mirrored page of contract submissions.
///
/// Whenever `total_pages > 0`, `current_page < total_pages`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageState {
    pub current_page: u32,
    pub total_pages: u32,
    pub items: Vec<Submission>,
}

impl PageState {
    pub fn empty() -> Self {
        PageState::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.current_page + 1 < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 0
    }
}

/// Everything the dashboard mirrors from the contract.
/// It is always replaced as a whole, so any reader observes a consistent snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncedState {
    pub page: PageState,
    pub params: ContractParams,

    /// Claimable reward of the connected account, if it has been queried.
    pub reward_balance: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_hints() {
        let empty = PageState::empty();
        assert!(!empty.has_next());
        assert!(!empty.has_previous());

        let middle = PageState {
            current_page: 1,
            total_pages: 3,
            items: Vec::new(),
        };
        assert!(middle.has_next());
        assert!(middle.has_previous());

        let last = PageState {
            current_page: 2,
            total_pages: 3,
            items: Vec::new(),
        };
        assert!(!last.has_next());
    }
}
