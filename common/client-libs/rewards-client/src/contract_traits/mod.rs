// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::notifications::RewardsEventSource;

mod rewards_query_client;
mod rewards_signing_client;

pub use rewards_query_client::RewardsQueryClient;
pub use rewards_signing_client::RewardsSigningClient;

/// Everything a dashboard needs from the rewards contract: queries, transactions and notifications.
pub trait RewardsGateway:
    RewardsQueryClient + RewardsSigningClient + RewardsEventSource + Send + Sync
{
}

impl<T> RewardsGateway for T where
    T: RewardsQueryClient + RewardsSigningClient + RewardsEventSource + Send + Sync
{
}
