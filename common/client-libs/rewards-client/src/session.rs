// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use edu_rewards_contract_common::Address;
use std::fmt::{Debug, Formatter};

/// An authenticated wallet account alongside the handle used for signing its transactions.
#[derive(Clone)]
pub struct Session<S> {
    account: Address,
    signer: S,
}

impl<S> Debug for Session<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("account", &self.account)
            .finish_non_exhaustive()
    }
}

impl<S> Session<S> {
    pub fn new(account: Address, signer: S) -> Self {
        Session { account, signer }
    }

    pub fn account(&self) -> Address {
        self.account
    }

    pub fn signer(&self) -> &S {
        &self.signer
    }

    pub fn into_signer(self) -> S {
        self.signer
    }
}
