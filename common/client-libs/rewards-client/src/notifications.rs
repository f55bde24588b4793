// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::error::GatewayError;
use async_trait::async_trait;
use edu_rewards_contract_common::{ContractNotification, NotificationKind};
use std::fmt::{Display, Formatter};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Identity of the contract handle currently used by a gateway.
/// A new identity is assigned every time a (new) wallet session gets attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(u64);

impl HandleId {
    pub const fn new(id: u64) -> Self {
        HandleId(id)
    }

    pub const fn next(self) -> Self {
        HandleId(self.0 + 1)
    }
}

impl Display for HandleId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Registered interest in a single kind of contract notifications.
/// The underlying listener is stopped once the handle is cancelled or dropped.
#[derive(Debug)]
pub struct SubscriptionHandle {
    kind: NotificationKind,
    handle_id: HandleId,
    cancellation: CancellationToken,
}

impl SubscriptionHandle {
    pub fn new(kind: NotificationKind, handle_id: HandleId, cancellation: CancellationToken) -> Self {
        SubscriptionHandle {
            kind,
            handle_id,
            cancellation,
        }
    }

    pub fn kind(&self) -> NotificationKind {
        self.kind
    }

    pub fn handle_id(&self) -> HandleId {
        self.handle_id
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    pub fn cancel(self) {
        // the actual work is done in the drop
        drop(self)
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        if !self.cancellation.is_cancelled() {
            debug!(
                "deregistering {} listener of contract handle {}",
                self.kind, self.handle_id
            );
            self.cancellation.cancel();
        }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait RewardsEventSource {
    /// Identity of the currently used contract handle, if any session is attached.
    fn handle_id(&self) -> Option<HandleId>;

    /// Get notified whenever the contract handle changes its identity or gets detached.
    fn watch_handle(&self) -> watch::Receiver<Option<HandleId>>;

    /// Start forwarding all notifications of the provided kind into the sink
    /// until the returned handle is dropped.
    async fn subscribe(
        &self,
        kind: NotificationKind,
        sink: mpsc::UnboundedSender<ContractNotification>,
    ) -> Result<SubscriptionHandle, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropping_handle_cancels_the_listener() {
        let token = CancellationToken::new();
        let handle = SubscriptionHandle::new(
            NotificationKind::SubmissionApproved,
            HandleId::new(1),
            token.clone(),
        );
        assert!(!token.is_cancelled());

        handle.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn handle_ids_are_ordered() {
        let first = HandleId::new(1);
        assert!(first.next() > first);
        assert_eq!(first.next().to_string(), "#2");
    }
}
