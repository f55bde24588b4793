// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

//! Conversion between whole-token decimal amounts and the integer base units used by the contract.
//!
//! This is the only place where the `10^18` scaling happens: everything above the gateway
//! operates on [`Decimal`] amounts, everything below it on raw [`U256`] values.

use crate::error::GatewayError;
use edu_rewards_contract_common::constants::REWARD_TOKEN_DECIMALS;
use edu_rewards_contract_common::{Decimal, U256};

// the atomics of `Decimal` are exactly the token base units
const _: () = assert!(Decimal::DECIMAL_PLACES == REWARD_TOKEN_DECIMALS);

/// Scales the provided token amount into contract base units.
pub fn to_base_units(amount: Decimal) -> U256 {
    U256::from(amount.atomics().u128())
}

/// Converts the contract base units back into a token amount.
pub fn from_base_units(field: &'static str, amount: U256) -> Result<Decimal, GatewayError> {
    let out_of_range = || GatewayError::ValueOutOfRange {
        field,
        value: amount.to_string(),
    };

    if amount > U256::from(u128::MAX) {
        return Err(out_of_range());
    }

    Decimal::from_atomics(amount.as_u128(), REWARD_TOKEN_DECIMALS).map_err(|_| out_of_range())
}
