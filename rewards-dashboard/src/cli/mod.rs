// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::error::DashboardError;
use clap::{Parser, Subcommand};
use edu_bin_common::output_format::OutputFormat;
use edu_rewards_contract_common::Address;
use std::path::PathBuf;
use url::Url;

mod admin;
mod contributor;
mod helpers;
mod init;
mod watch;

#[derive(Parser, Debug)]
#[clap(author, version, about)]
pub struct Cli {
    /// Path to the dashboard config file. Defaults to `$HOME/.edu-rewards/dashboard/config/config.toml`.
    #[clap(long, global = true)]
    pub config_path: Option<PathBuf>,

    /// Flag used for disabling the printed banner in tty.
    #[clap(long)]
    pub no_banner: bool,

    #[clap(short, long, global = true, value_enum, default_value_t = OutputFormat::default())]
    pub output: OutputFormat,

    #[command(flatten)]
    config_override: ConfigOverridableArgs,

    #[clap(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn execute(self) -> Result<(), DashboardError> {
        let context = helpers::CommandContext {
            config_path: self.config_path,
            config_override: self.config_override,
            output: self.output,
        };

        match self.command {
            Commands::Init(args) => init::execute(args, context),
            Commands::Admin(args) => admin::execute(args, context).await,
            Commands::Contributor(args) => contributor::execute(args, context).await,
            Commands::Watch(args) => watch::execute(args, context).await,
        }
    }
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Initialise the config file of the dashboard
    Init(init::Args),

    /// Review submissions and manage the rewards contract
    Admin(admin::Args),

    /// Submit contributions and claim the earned rewards
    Contributor(contributor::Args),

    /// Keep displaying a page of submissions, refreshing it whenever the contract reports a change
    Watch(watch::Args),
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct ConfigOverridableArgs {
    /// Url of the json-rpc endpoint of the wallet used for signing transactions.
    #[clap(long, global = true, env = "EDU_REWARDS_WALLET_RPC")]
    pub wallet_rpc: Option<Url>,

    /// Address of the deployed rewards contract.
    #[clap(long, global = true, env = "EDU_REWARDS_CONTRACT_ADDRESS")]
    pub contract_address: Option<Address>,

    /// Number of submissions per page, as used by the contract.
    #[clap(long, global = true)]
    pub page_size: Option<usize>,

    /// Number of confirmations to wait for after sending a transaction.
    #[clap(long, global = true)]
    pub confirmations: Option<usize>,
}
