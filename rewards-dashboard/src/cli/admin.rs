// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::cli::helpers::{connect, disconnect, page_index, CommandContext, EthDashboard};
use crate::dispatcher::{Action, RefreshScope};
use crate::error::DashboardError;
use crate::views::admin::{ContractOverview, SubmissionsListing};
use crate::views::ActionReport;
use clap::Subcommand;
use edu_rewards_contract_common::{Decimal, SubmissionId};

#[derive(Debug, clap::Args)]
pub struct Args {
    #[clap(subcommand)]
    command: AdminCommand,
}

#[derive(Debug, Subcommand)]
enum AdminCommand {
    /// Show the submissions, one page at a time
    List {
        /// Page to display, starting from 1
        #[clap(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,

        /// Display every submission rather than a single page
        #[clap(long, conflicts_with = "page")]
        all: bool,
    },

    /// Approve the submission, crediting its contributor with the current reward
    Approve { submission_id: SubmissionId },

    /// Pause the contract, rejecting any new submissions
    Pause,

    /// Unpause the contract
    Unpause,

    /// Pause the contract if it's running, or unpause it otherwise
    TogglePause,

    /// Change the reward (in EDU) credited for every approved submission
    SetReward { amount: Decimal },

    /// Transfer the provided amount (in EDU) to the reward pool
    Fund { amount: Decimal },
}

async fn list(
    page: u32,
    all: bool,
    surface: &EthDashboard,
    context: &CommandContext,
) -> Result<(), DashboardError> {
    let listing = if all {
        SubmissionsListing::complete(surface.synchronizer().all_submissions().await?)
    } else {
        let page = surface.synchronizer().refresh_page(page_index(page)).await?;
        SubmissionsListing::from_page(&page)
    };
    context.print(&listing)
}

// the overview is only worth showing once the contract parameters got re-read
fn changes_params(action: &Action) -> bool {
    action.kind().refresh_scope() == RefreshScope::Params
}

async fn run(
    command: AdminCommand,
    surface: &EthDashboard,
    context: &CommandContext,
) -> Result<(), DashboardError> {
    let action = match command {
        AdminCommand::List { page, all } => return list(page, all, surface, context).await,
        AdminCommand::Approve { submission_id } => Action::ApproveSubmission { submission_id },
        AdminCommand::Pause => Action::Pause,
        AdminCommand::Unpause => Action::Unpause,
        AdminCommand::TogglePause => Action::TogglePause,
        AdminCommand::SetReward { amount } => Action::SetRewardPerSubmission { amount },
        AdminCommand::Fund { amount } => Action::FundRewardPool { amount },
    };
    let affects_params = changes_params(&action);

    let outcome = surface.dispatch(action).await?;
    context.print(&ActionReport::from(outcome))?;
    if affects_params && context.output.is_text() {
        context.print(&ContractOverview::from(surface.synchronizer().params()))?;
    }
    Ok(())
}

pub(crate) async fn execute(args: Args, context: CommandContext) -> Result<(), DashboardError> {
    let config = context.load_config()?;
    let surface = connect(&config).await?;

    let result = run(args.command, &surface, &context).await;
    disconnect(&surface).await;
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overview_follows_parameter_changes_only() {
        assert!(changes_params(&Action::Pause));
        assert!(changes_params(&Action::TogglePause));
        assert!(changes_params(&Action::SetRewardPerSubmission {
            amount: Decimal::one()
        }));

        assert!(!changes_params(&Action::ApproveSubmission { submission_id: 1 }));
        assert!(!changes_params(&Action::FundRewardPool {
            amount: Decimal::one()
        }));
        assert!(!changes_params(&Action::ClaimRewards));
    }
}
