// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::cli::ConfigOverridableArgs;
use crate::config::Config;

pub trait ConfigOverride {
    fn override_config(self, config: &mut Config);
}

impl ConfigOverride for ConfigOverridableArgs {
    fn override_config(self, config: &mut Config) {
        if let Some(wallet_rpc) = self.wallet_rpc {
            config.base.wallet_rpc = Some(wallet_rpc)
        }

        if let Some(contract_address) = self.contract_address {
            config.base.contract_address = contract_address
        }

        if let Some(page_size) = self.page_size {
            config.sync.page_size = page_size
        }

        if let Some(confirmations) = self.confirmations {
            config.sync.confirmations = confirmations
        }
    }
}
