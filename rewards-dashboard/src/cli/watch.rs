// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::cli::helpers::{connect, disconnect, page_index, CommandContext, EthDashboard};
use crate::error::DashboardError;
use crate::views::admin::SubmissionsListing;
use tracing::{info, warn};

#[derive(Debug, clap::Args)]
pub struct Args {
    /// Page to follow, starting from 1
    #[clap(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    page: u32,
}

async fn follow(
    page: u32,
    surface: &EthDashboard,
    context: &CommandContext,
) -> Result<(), DashboardError> {
    let synchronizer = surface.synchronizer();
    synchronizer.refresh_page(page_index(page)).await?;

    let mut updates = synchronizer.watch();
    let page = updates.borrow().page.clone();
    context.print(&SubmissionsListing::from_page(&page))?;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!("watching for contract notifications. press ctrl-c to stop");
    loop {
        tokio::select! {
            signal = &mut shutdown => {
                signal.map_err(|source| DashboardError::ShutdownSignalFailure { source })?;
                info!("received SIGINT");
                return Ok(());
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    warn!("the state synchronizer has gone away");
                    return Ok(());
                }
                let page = updates.borrow_and_update().page.clone();
                context.print(&SubmissionsListing::from_page(&page))?;
            }
        }
    }
}

pub(crate) async fn execute(args: Args, context: CommandContext) -> Result<(), DashboardError> {
    let config = context.load_config()?;
    let surface = connect(&config).await?;

    let result = follow(args.page, &surface, &context).await;
    disconnect(&surface).await;
    result
}
