// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::cli::ConfigOverridableArgs;
use crate::config::Config;
use crate::error::{DashboardError, SyncError};
use crate::persistence::FileAccountStore;
use crate::surface::DashboardSurface;
use edu_bin_common::output_format::OutputFormat;
use edu_rewards_client::{EthRewardsGateway, JsonRpcWallet, WalletConnector};
use edu_rewards_contract_common::Address;
use serde::Serialize;
use std::fmt::Display;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

pub(crate) type EthDashboard = DashboardSurface<EthRewardsGateway>;

pub(crate) struct CommandContext {
    pub(crate) config_path: Option<PathBuf>,
    pub(crate) config_override: ConfigOverridableArgs,
    pub(crate) output: OutputFormat,
}

impl CommandContext {
    pub(crate) fn load_config(&self) -> Result<Config, DashboardError> {
        let path = self
            .config_path
            .clone()
            .unwrap_or_else(Config::default_location);

        let config = Config::read_from_toml_file(path)?.with_override(self.config_override.clone());
        config.ensure_is_valid()?;
        Ok(config)
    }

    pub(crate) fn print<T: Serialize + Display>(&self, data: &T) -> Result<(), DashboardError> {
        Ok(self.output.to_stdout(data)?)
    }
}

/// Ask the configured wallet for an account and bring up a dashboard bound to it.
pub(crate) async fn connect(config: &Config) -> Result<EthDashboard, DashboardError> {
    let store = FileAccountStore::new(&config.storage_paths.account_store);
    let wallet = config
        .base
        .wallet_rpc
        .clone()
        .map(|endpoint| JsonRpcWallet::new(endpoint, config.sync.event_poll_interval));

    let connector = WalletConnector::new(wallet, store);
    if let Some(previous) = connector.last_known_account() {
        debug!("previously connected account: {previous:?}");
    }
    let session = connector.connect().await?;
    let account = session.account();

    let gateway = Arc::new(EthRewardsGateway::new(
        config.base.contract_address,
        config.sync.confirmations,
    ));
    gateway.attach_session(session);

    let surface = DashboardSurface::init(gateway, Some(account), config.sync.page_size).await?;
    Ok(surface)
}

/// Release the contract listeners and detach the wallet session.
/// The persisted account is kept around.
pub(crate) async fn disconnect(surface: &EthDashboard) {
    surface.teardown().await;
    surface.client().detach_session();
    info!("disconnected from the rewards contract");
}

pub(crate) fn connected_account(surface: &EthDashboard) -> Result<Address, DashboardError> {
    Ok(surface
        .synchronizer()
        .account()
        .ok_or(SyncError::NoAccount)?)
}

/// Page numbers given on the command line start at 1.
pub(crate) fn page_index(page: u32) -> u32 {
    page.saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn config_loading_applies_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let contract = Address::from_str("0x5fbdb2315678afecb367f032d93f642f64180aa3").unwrap();
        Config::new(contract, None).save_to_path(&path).unwrap();

        let context = CommandContext {
            config_path: Some(path),
            config_override: ConfigOverridableArgs {
                confirmations: Some(3),
                ..Default::default()
            },
            output: OutputFormat::Text,
        };
        let config = context.load_config().unwrap();
        assert_eq!(config.sync.confirmations, 3);
        assert_eq!(config.base.contract_address, contract);
    }

    #[test]
    fn invalid_override_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        Config::new(Address::repeat_byte(0x01), None)
            .save_to_path(&path)
            .unwrap();

        let context = CommandContext {
            config_path: Some(path),
            config_override: ConfigOverridableArgs {
                page_size: Some(0),
                ..Default::default()
            },
            output: OutputFormat::Json,
        };
        assert!(matches!(
            context.load_config(),
            Err(DashboardError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn missing_config_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let context = CommandContext {
            config_path: Some(dir.path().join("nope.toml")),
            config_override: Default::default(),
            output: OutputFormat::Text,
        };
        assert!(matches!(
            context.load_config(),
            Err(DashboardError::ConfigLoadFailure { .. })
        ));
    }

    #[test]
    fn pages_are_one_indexed_on_the_command_line() {
        assert_eq!(page_index(1), 0);
        assert_eq!(page_index(3), 2);
        assert_eq!(page_index(0), 0);
    }
}
