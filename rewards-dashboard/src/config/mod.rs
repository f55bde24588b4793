// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::config::r#override::ConfigOverride;
use crate::config::template::CONFIG_TEMPLATE;
use crate::error::DashboardError;
use edu_config::{
    get_home_dir, read_config_from_toml_file, save_formatted_config_to_file, EduConfigTemplate,
    DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILENAME, DEFAULT_DATA_DIR, EDU_DIR,
};
use edu_rewards_contract_common::constants::DEFAULT_PAGE_SIZE;
use edu_rewards_contract_common::Address;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use url::Url;

pub mod r#override;
mod template;

const DEFAULT_DASHBOARD_DIR: &str = "dashboard";
const DEFAULT_ACCOUNT_STORE_FILENAME: &str = "account.json";

const DEFAULT_CONFIRMATIONS: usize = 1;
const DEFAULT_EVENT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Get default path to dashboard's config directory.
/// It should get resolved to `$HOME/.edu-rewards/dashboard/config`
pub fn default_config_directory() -> PathBuf {
    get_home_dir()
        .join(EDU_DIR)
        .join(DEFAULT_DASHBOARD_DIR)
        .join(DEFAULT_CONFIG_DIR)
}

/// Get default path to dashboard's config file.
/// It should get resolved to `$HOME/.edu-rewards/dashboard/config/config.toml`
pub fn default_config_filepath() -> PathBuf {
    default_config_directory().join(DEFAULT_CONFIG_FILENAME)
}

/// Get default path to dashboard's data directory where the account store is kept.
/// It should get resolved to `$HOME/.edu-rewards/dashboard/data`
pub fn default_data_directory() -> PathBuf {
    get_home_dir()
        .join(EDU_DIR)
        .join(DEFAULT_DASHBOARD_DIR)
        .join(DEFAULT_DATA_DIR)
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    // additional metadata holding on-disk location of this config file
    #[serde(skip)]
    pub(crate) save_path: Option<PathBuf>,

    #[serde(flatten)]
    pub base: Base,

    pub sync: SyncConfig,

    pub storage_paths: DashboardPaths,
}

impl EduConfigTemplate for Config {
    fn template(&self) -> &'static str {
        CONFIG_TEMPLATE
    }
}

impl Config {
    pub fn new(contract_address: Address, wallet_rpc: Option<Url>) -> Self {
        Config {
            save_path: None,
            base: Base {
                wallet_rpc,
                contract_address,
            },
            sync: SyncConfig::default(),
            storage_paths: DashboardPaths::new_default(),
        }
    }

    pub fn ensure_is_valid(&self) -> Result<(), DashboardError> {
        if self.base.contract_address.is_zero() {
            return Err(DashboardError::InvalidConfig {
                reason: "the contract address must not be the zero address".to_string(),
            });
        }
        self.sync.ensure_is_valid()
    }

    pub fn r#override<O: ConfigOverride>(&mut self, r#override: O) {
        r#override.override_config(self)
    }

    pub fn with_override<O: ConfigOverride>(mut self, r#override: O) -> Self {
        self.r#override(r#override);
        self
    }

    // simple wrapper that reads config file and assigns path location
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self, DashboardError> {
        let path = path.as_ref();
        let mut loaded: Config = read_config_from_toml_file(path).map_err(|source| {
            DashboardError::ConfigLoadFailure {
                path: path.to_path_buf(),
                source,
            }
        })?;
        loaded.ensure_is_valid()?;
        loaded.save_path = Some(path.to_path_buf());
        debug!("loaded config file from {}", path.display());
        Ok(loaded)
    }

    pub fn read_from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, DashboardError> {
        Self::read_from_path(path)
    }

    pub fn default_location() -> PathBuf {
        default_config_filepath()
    }

    pub fn save_path(&self) -> Option<&Path> {
        self.save_path.as_deref()
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        save_formatted_config_to_file(self, path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Base {
    /// Url to the json-rpc endpoint of the wallet used for signing transactions.
    #[serde(default)]
    pub wallet_rpc: Option<Url>,

    /// Address of the deployed rewards contract.
    pub contract_address: Address,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Number of submissions per page, as used by the contract.
    pub page_size: usize,

    /// Required number of confirmations of every transaction.
    pub confirmations: usize,

    #[serde(with = "humantime_serde")]
    pub event_poll_interval: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            page_size: DEFAULT_PAGE_SIZE,
            confirmations: DEFAULT_CONFIRMATIONS,
            event_poll_interval: DEFAULT_EVENT_POLL_INTERVAL,
        }
    }
}

impl SyncConfig {
    fn ensure_is_valid(&self) -> Result<(), DashboardError> {
        if self.page_size == 0 {
            return Err(DashboardError::InvalidConfig {
                reason: "the page size must be positive".to_string(),
            });
        }
        if self.confirmations == 0 {
            return Err(DashboardError::InvalidConfig {
                reason: "at least a single confirmation is required".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DashboardPaths {
    /// Path to the json file holding the last connected account.
    pub account_store: PathBuf,
}

impl DashboardPaths {
    pub fn new_default() -> Self {
        DashboardPaths {
            account_store: default_data_directory().join(DEFAULT_ACCOUNT_STORE_FILENAME),
        }
    }
}
