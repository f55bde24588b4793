// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::error::GatewayError;
use edu_rewards_contract_common::TxHash;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::fmt::{Debug, Formatter};
use std::future::{Future, IntoFuture};

/// Details of a confirmed transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
}

/// A state-changing contract call that has been broadcast, but not yet confirmed.
///
/// It has to be awaited in order to learn whether the transaction got included
/// and executed successfully.
#[must_use = "pending transactions have to be awaited to learn their outcome"]
pub struct PendingTx {
    operation: &'static str,
    tx_hash: TxHash,
    confirmation: BoxFuture<'static, Result<TxReceipt, GatewayError>>,
}

impl Debug for PendingTx {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingTx")
            .field("operation", &self.operation)
            .field("tx_hash", &self.tx_hash)
            .finish_non_exhaustive()
    }
}

impl PendingTx {
    pub fn new<F>(operation: &'static str, tx_hash: TxHash, confirmation: F) -> Self
    where
        F: Future<Output = Result<TxReceipt, GatewayError>> + Send + 'static,
    {
        PendingTx {
            operation,
            tx_hash,
            confirmation: confirmation.boxed(),
        }
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn tx_hash(&self) -> TxHash {
        self.tx_hash
    }

    /// Wait until the transaction gets confirmed by the network.
    pub async fn wait(self) -> Result<TxReceipt, GatewayError> {
        self.confirmation.await
    }
}

impl IntoFuture for PendingTx {
    type Output = Result<TxReceipt, GatewayError>;
    type IntoFuture = BoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        self.confirmation
    }
}
