// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::cli::helpers::{connect, connected_account, disconnect, CommandContext, EthDashboard};
use crate::dispatcher::Action;
use crate::error::DashboardError;
use crate::views::contributor::ContributorStatus;
use crate::views::ActionReport;
use clap::Subcommand;

#[derive(Debug, clap::Args)]
pub struct Args {
    #[clap(subcommand)]
    command: ContributorCommand,
}

#[derive(Debug, Subcommand)]
enum ContributorCommand {
    /// Show the claimable rewards and the submissions made by the connected account
    Status,

    /// Submit a new contribution for review
    Submit {
        /// Field of study the contribution belongs to
        #[clap(long)]
        field: String,

        /// Description of the contribution
        #[clap(long)]
        description: String,
    },

    /// Claim all rewards credited to the connected account
    Claim,
}

async fn status(surface: &EthDashboard, context: &CommandContext) -> Result<(), DashboardError> {
    let account = connected_account(surface)?;
    let submissions = surface.synchronizer().all_submissions().await?;
    let status = ContributorStatus::new(account, &surface.synchronizer().snapshot(), submissions);
    context.print(&status)
}

async fn run(
    command: ContributorCommand,
    surface: &EthDashboard,
    context: &CommandContext,
) -> Result<(), DashboardError> {
    let action = match command {
        ContributorCommand::Status => return status(surface, context).await,
        ContributorCommand::Submit { field, description } => {
            Action::SubmitContribution { field, description }
        }
        ContributorCommand::Claim => Action::ClaimRewards,
    };

    let outcome = surface.dispatch(action).await?;
    context.print(&ActionReport::from(outcome))
}

pub(crate) async fn execute(args: Args, context: CommandContext) -> Result<(), DashboardError> {
    let config = context.load_config()?;
    let surface = connect(&config).await?;

    let result = run(args.command, &surface, &context).await;
    disconnect(&surface).await;
    result
}
