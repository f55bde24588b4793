// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::dispatcher::{Action, ActionDispatcher, ActionOutcome};
use crate::error::{DispatchError, SyncError};
use crate::sync::StateSynchronizer;
use edu_rewards_client::{HandleId, RewardsGateway};
use edu_rewards_contract_common::Address;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Everything a single dashboard view needs for its lifetime:
/// the contract client, the mirrored state and the action lifecycle,
/// plus the background task applying contract notifications.
pub struct DashboardSurface<C> {
    client: Arc<C>,
    synchronizer: Arc<StateSynchronizer<C>>,
    dispatcher: ActionDispatcher<C>,

    cancellation: CancellationToken,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl<C> DashboardSurface<C>
where
    C: RewardsGateway + 'static,
{
    /// Load the initial state, subscribe to contract notifications and start applying them.
    /// The listeners follow the client whenever it gets bound to a different contract handle.
    pub async fn init(
        client: Arc<C>,
        account: Option<Address>,
        page_size: usize,
    ) -> Result<Self, SyncError> {
        let synchronizer = Arc::new(StateSynchronizer::new(
            Arc::clone(&client),
            account,
            page_size,
        ));
        synchronizer.refresh_all().await?;
        let handle_updates = client.watch_handle();
        synchronizer.ensure_subscribed().await?;

        let cancellation = CancellationToken::new();
        let listener = tokio::spawn(apply_notifications(
            Arc::clone(&synchronizer),
            handle_updates,
            cancellation.clone(),
        ));

        let dispatcher = ActionDispatcher::new(Arc::clone(&client), Arc::clone(&synchronizer));
        Ok(DashboardSurface {
            client,
            synchronizer,
            dispatcher,
            cancellation,
            listener: Mutex::new(Some(listener)),
        })
    }

    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    pub fn synchronizer(&self) -> &Arc<StateSynchronizer<C>> {
        &self.synchronizer
    }

    pub fn dispatcher(&self) -> &ActionDispatcher<C> {
        &self.dispatcher
    }

    pub async fn dispatch(&self, action: Action) -> Result<ActionOutcome, DispatchError> {
        self.dispatcher.dispatch(action).await
    }

    /// Stop applying notifications and release all contract listeners.
    /// Returns `false` if the surface has already been torn down.
    pub async fn teardown(&self) -> bool {
        self.cancellation.cancel();
        let listener = self.listener.lock().take();
        if let Some(listener) = listener {
            if let Err(err) = listener.await {
                error!("the notification listener has failed: {err}");
            }
        }

        let released = self.synchronizer.teardown().await;
        if released {
            info!("dashboard surface has been torn down");
        }
        released
    }
}

impl<C> Drop for DashboardSurface<C> {
    fn drop(&mut self) {
        self.cancellation.cancel();
    }
}

async fn follow_handle_change<C: RewardsGateway>(synchronizer: &StateSynchronizer<C>) {
    match synchronizer.ensure_subscribed().await {
        Ok(false) => {}
        Ok(true) => {
            // anything emitted while no listener was bound to the new handle got missed
            let _ = synchronizer.refresh_current_page().await.inspect_err(|err| {
                warn!("failed to refresh the page after re-subscribing: {err}")
            });
        }
        Err(err) => warn!("could not re-establish the contract listeners: {err}"),
    }
}

async fn apply_notifications<C: RewardsGateway>(
    synchronizer: Arc<StateSynchronizer<C>>,
    mut handle_updates: watch::Receiver<Option<HandleId>>,
    cancellation: CancellationToken,
) {
    let mut following_handle = true;
    loop {
        tokio::select! {
            biased;
            _ = cancellation.cancelled() => {
                debug!("notification listener: received shutdown");
                break;
            }
            changed = handle_updates.changed(), if following_handle => {
                if changed.is_err() {
                    debug!("the client has stopped publishing contract handle changes");
                    following_handle = false;
                    continue;
                }
                let handle = *handle_updates.borrow_and_update();
                match handle {
                    Some(handle) => debug!("the client is now bound to contract handle {handle}"),
                    None => debug!("the client has been detached from the contract"),
                }
                follow_handle_change(&synchronizer).await;
            }
            notification = synchronizer.next_notification() => {
                let Some(notification) = notification else {
                    debug!("notification channel has been closed");
                    break;
                };
                // failures are already logged and leave the previous state in place
                let _ = synchronizer.handle_notification(&notification).await;
            }
        }
    }
}
