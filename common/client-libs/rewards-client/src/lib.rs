// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

pub(crate) mod amount;
pub mod contract_traits;
pub mod error;
pub mod gateway;
pub mod notifications;
pub mod pending;
pub mod session;
pub mod wallet;

#[cfg(any(test, feature = "testing"))]
pub mod mock;

pub use contract_traits::{RewardsGateway, RewardsQueryClient, RewardsSigningClient};
pub use error::{ConnectionError, GatewayError};
pub use gateway::{EthRewardsGateway, SigningProvider};
pub use notifications::{HandleId, RewardsEventSource, SubscriptionHandle};
pub use pending::{PendingTx, TxReceipt};
pub use session::Session;
pub use wallet::{AccountStore, InjectedWallet, JsonRpcWallet, WalletConnector};
