// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::dispatcher::ActionKind;
use edu_bin_common::output_format::OutputFormatError;
use edu_rewards_client::{ConnectionError, GatewayError};
use edu_rewards_contract_common::NotificationKind;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("failed to query {query}: {source}")]
    QueryFailed {
        query: &'static str,
        #[source]
        source: GatewayError,
    },

    #[error("the contract has returned {received} submissions while the page size is {page_size}")]
    PageOverflow { received: usize, page_size: usize },

    #[error("the contract has returned submissions for page {page} while claiming there are only {total_pages} pages")]
    InconsistentPage { page: u32, total_pages: u32 },

    #[error("failed to subscribe to {kind} notifications: {source}")]
    SubscriptionFailed {
        kind: NotificationKind,
        #[source]
        source: GatewayError,
    },

    #[error("there is no account associated with the current session")]
    NoAccount,

    #[error("the state synchronizer has already been torn down")]
    TornDown,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("can't start {requested} while {in_flight} is still in progress")]
    Busy {
        requested: ActionKind,
        in_flight: ActionKind,
    },

    #[error("error {action}: {source}")]
    Gateway {
        action: ActionKind,
        #[source]
        source: GatewayError,
    },

    #[error("{action} has succeeded, but the dashboard could not be refreshed: {source}")]
    Sync {
        action: ActionKind,
        #[source]
        source: SyncError,
    },
}

impl DispatchError {
    pub fn is_busy(&self) -> bool {
        matches!(self, DispatchError::Busy { .. })
    }
}

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(
        "failed to load config file using path '{}'. detailed message: {source}", path.display()
    )]
    ConfigLoadFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(
        "failed to save config file using path '{}'. detailed message: {source}", path.display()
    )]
    ConfigSaveFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to initialise paths")]
    PathInitialisationFailure {
        #[source]
        source: io::Error,
    },

    #[error("there already exists a config file at: {}. if you want to overwrite its content, use --force flag", path.display())]
    ExistingConfig { path: PathBuf },

    #[error("the provided configuration is invalid: {reason}")]
    InvalidConfig { reason: String },

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Output(#[from] OutputFormatError),

    #[error("failed to listen for the shutdown signal: {source}")]
    ShutdownSignalFailure {
        #[source]
        source: io::Error,
    },
}
