// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod persistence;
pub mod surface;
pub mod sync;
pub mod views;

pub use dispatcher::{Action, ActionDispatcher, ActionKind, ActionLifecycle, ActionOutcome};
pub use error::{DashboardError, DispatchError, SyncError};
pub use surface::DashboardSurface;
pub use sync::{PageState, StateSynchronizer, SyncedState};
