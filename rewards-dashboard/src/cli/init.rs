// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::cli::helpers::CommandContext;
use crate::config::{default_config_directory, default_data_directory, Config};
use crate::error::DashboardError;
use std::{fs, io};
use tracing::info;

#[derive(Debug, clap::Args)]
pub struct Args {
    /// Overwrite existing configuration file.
    #[clap(long, short)]
    force: bool,
}

fn init_paths() -> io::Result<()> {
    fs::create_dir_all(default_data_directory())?;
    fs::create_dir_all(default_config_directory())
}

pub(crate) fn execute(args: Args, context: CommandContext) -> Result<(), DashboardError> {
    let path = context
        .config_path
        .clone()
        .unwrap_or_else(Config::default_location);

    if path.exists() && !args.force {
        return Err(DashboardError::ExistingConfig { path });
    }

    let Some(contract_address) = context.config_override.contract_address else {
        return Err(DashboardError::InvalidConfig {
            reason: "the address of the rewards contract has to be provided with --contract-address"
                .to_string(),
        });
    };

    init_paths().map_err(|source| DashboardError::PathInitialisationFailure { source })?;

    let config = Config::new(contract_address, None).with_override(context.config_override);
    config.ensure_is_valid()?;

    config
        .save_to_path(&path)
        .map_err(|source| DashboardError::ConfigSaveFailure {
            path: path.clone(),
            source,
        })?;

    info!("saved the dashboard config to {}", path.display());
    Ok(())
}
