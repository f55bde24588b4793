// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use clap::{crate_name, crate_version, Parser};
use edu_bin_common::logging::{maybe_print_banner, setup_tracing_logger};
use edu_rewards_dashboard::cli::Cli;
use tracing::trace;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing_logger();
    let cli = Cli::parse();
    trace!("args: {cli:#?}");

    if !cli.no_banner && cli.output.is_text() {
        maybe_print_banner(crate_name!(), crate_version!());
    }

    cli.execute().await?;
    Ok(())
}
