// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::error::SyncError;
use edu_rewards_client::{HandleId, RewardsGateway, SubscriptionHandle};
use edu_rewards_contract_common::{
    Address, ContractNotification, ContractParams, Decimal, NotificationKind, Submission,
    SubmissionsPage,
};
use std::sync::Arc;
use tokio::sync::{mpsc, watch, Mutex};
use tracing::{debug, info, instrument, warn};

pub mod state;

pub use state::{PageState, SyncedState};

#[derive(Default)]
struct ActiveSubscriptions {
    handle_id: Option<HandleId>,
    handles: Vec<SubscriptionHandle>,
    torn_down: bool,
}

impl ActiveSubscriptions {
    fn is_complete_for(&self, handle_id: HandleId) -> bool {
        self.handle_id == Some(handle_id) && self.handles.len() == NotificationKind::ALL.len()
    }

    // dropping the handles cancels the underlying listeners
    fn release(&mut self) -> usize {
        let released = self.handles.len();
        self.handles.clear();
        self.handle_id = None;
        released
    }
}

/// Keeps a local mirror of the rewards contract state.
///
/// The mirror is only ever as fresh as the most recent successful query or notification:
/// it gets refreshed after relevant actions and whenever the contract announces
/// a new or approved submission. A failed refresh leaves the previous state in place.
pub struct StateSynchronizer<C> {
    client: Arc<C>,
    account: Option<Address>,
    page_size: usize,

    state: watch::Sender<SyncedState>,
    // held across fetching and applying a page so that replies can't overtake each other
    page_refresh: Mutex<()>,

    subscriptions: Mutex<ActiveSubscriptions>,
    notification_sink: mpsc::UnboundedSender<ContractNotification>,
    notifications: Mutex<mpsc::UnboundedReceiver<ContractNotification>>,
}

impl<C> StateSynchronizer<C>
where
    C: RewardsGateway,
{
    pub fn new(client: Arc<C>, account: Option<Address>, page_size: usize) -> Self {
        let (notification_sink, notifications) = mpsc::unbounded_channel();

        StateSynchronizer {
            client,
            account,
            page_size,
            state: watch::Sender::new(SyncedState::default()),
            page_refresh: Mutex::new(()),
            subscriptions: Mutex::new(ActiveSubscriptions::default()),
            notification_sink,
            notifications: Mutex::new(notifications),
        }
    }

    pub fn account(&self) -> Option<Address> {
        self.account
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn snapshot(&self) -> SyncedState {
        self.state.borrow().clone()
    }

    pub fn page(&self) -> PageState {
        self.state.borrow().page.clone()
    }

    pub fn params(&self) -> ContractParams {
        self.state.borrow().params
    }

    pub fn reward_balance(&self) -> Option<Decimal> {
        self.state.borrow().reward_balance
    }

    /// Get notified whenever any part of the mirrored state gets replaced.
    pub fn watch(&self) -> watch::Receiver<SyncedState> {
        self.state.subscribe()
    }

    async fn fetch_page(&self, page: u32) -> Result<SubmissionsPage, SyncError> {
        self.client
            .get_paged_submissions(page)
            .await
            .map_err(|source| SyncError::QueryFailed {
                query: "paged submissions",
                source,
            })
    }

    fn current_page(&self) -> u32 {
        self.state.borrow().page.current_page
    }

    /// Replace the mirrored page with the provided page of the contract submissions.
    /// An empty result resets the page state altogether.
    ///
    /// Page refreshes are applied one at a time, in the order they were requested.
    #[instrument(skip(self))]
    pub async fn refresh_page(&self, page: u32) -> Result<PageState, SyncError> {
        let _permit = self.page_refresh.lock().await;
        self.apply_page(page).await
    }

    // must only be called while holding `page_refresh`
    async fn apply_page(&self, mut page: u32) -> Result<PageState, SyncError> {
        let mut fetched = self.fetch_page(page).await?;

        if fetched.is_empty() && fetched.total_pages > 0 && page >= fetched.total_pages {
            let last = fetched.total_pages - 1;
            debug!("page {page} is beyond the last page ({last}) - falling back to it");
            page = last;
            fetched = self.fetch_page(page).await?;
        }

        if fetched.items.len() > self.page_size {
            return Err(SyncError::PageOverflow {
                received: fetched.items.len(),
                page_size: self.page_size,
            });
        }

        let page_state = if fetched.is_empty() {
            PageState::empty()
        } else {
            if page >= fetched.total_pages {
                return Err(SyncError::InconsistentPage {
                    page,
                    total_pages: fetched.total_pages,
                });
            }
            PageState {
                current_page: page,
                total_pages: fetched.total_pages,
                items: fetched.items,
            }
        };

        debug!(
            "mirrored page {} out of {} ({} submissions)",
            page_state.current_page,
            page_state.total_pages,
            page_state.items.len()
        );
        self.state
            .send_modify(|state| state.page = page_state.clone());
        Ok(page_state)
    }

    pub async fn refresh_current_page(&self) -> Result<PageState, SyncError> {
        let _permit = self.page_refresh.lock().await;
        self.apply_page(self.current_page()).await
    }

    /// Re-query the paused flag and the reward per submission and replace both at once.
    #[instrument(skip(self))]
    pub async fn refresh_params(&self) -> Result<ContractParams, SyncError> {
        let paused = self
            .client
            .get_paused()
            .await
            .map_err(|source| SyncError::QueryFailed {
                query: "paused flag",
                source,
            })?;
        let reward_per_submission = self
            .client
            .get_reward_per_submission()
            .await
            .map_err(|source| SyncError::QueryFailed {
                query: "reward per submission",
                source,
            })?;

        let params = ContractParams {
            paused,
            reward_per_submission,
        };
        self.state.send_modify(|state| state.params = params);
        Ok(params)
    }

    #[instrument(skip(self))]
    pub async fn refresh_reward_balance(&self) -> Result<Decimal, SyncError> {
        let account = self.account.ok_or(SyncError::NoAccount)?;
        let balance = self
            .client
            .get_contributor_reward(account)
            .await
            .map_err(|source| SyncError::QueryFailed {
                query: "contributor reward",
                source,
            })?;

        self.state
            .send_modify(|state| state.reward_balance = Some(balance));
        Ok(balance)
    }

    /// Refresh every part of the mirrored state.
    pub async fn refresh_all(&self) -> Result<(), SyncError> {
        self.refresh_current_page().await?;
        self.refresh_params().await?;
        if self.account.is_some() {
            self.refresh_reward_balance().await?;
        }
        Ok(())
    }

    /// Full, unpaginated list of submissions. It is not mirrored.
    pub async fn all_submissions(&self) -> Result<Vec<Submission>, SyncError> {
        self.client
            .get_all_submissions()
            .await
            .map_err(|source| SyncError::QueryFailed {
                query: "all submissions",
                source,
            })
    }

    /// Make sure there is exactly one listener for every notification kind
    /// bound to the current contract handle.
    ///
    /// Returns `true` if the listeners had to be (re-)established.
    pub async fn ensure_subscribed(&self) -> Result<bool, SyncError> {
        let mut subscriptions = self.subscriptions.lock().await;
        if subscriptions.torn_down {
            return Err(SyncError::TornDown);
        }

        let Some(handle_id) = self.client.handle_id() else {
            subscriptions.release();
            return Err(SyncError::SubscriptionFailed {
                kind: NotificationKind::SubmissionCreated,
                source: edu_rewards_client::GatewayError::NotConnected,
            });
        };

        if subscriptions.is_complete_for(handle_id) {
            return Ok(false);
        }

        let released = subscriptions.release();
        if released > 0 {
            debug!("released {released} listeners of the previous contract handle");
        }

        for kind in NotificationKind::ALL {
            let handle = self
                .client
                .subscribe(kind, self.notification_sink.clone())
                .await
                .map_err(|source| SyncError::SubscriptionFailed { kind, source })?;
            subscriptions.handles.push(handle);
        }
        subscriptions.handle_id = Some(handle_id);

        info!("subscribed to contract notifications of handle {handle_id}");
        Ok(true)
    }

    pub async fn subscribed_handle(&self) -> Option<HandleId> {
        self.subscriptions.lock().await.handle_id
    }

    /// Cancel all contract listeners. Subsequent calls have no effect.
    ///
    /// Returns `true` if this call has performed the teardown.
    pub async fn teardown(&self) -> bool {
        let mut subscriptions = self.subscriptions.lock().await;
        if subscriptions.torn_down {
            return false;
        }
        let released = subscriptions.release();
        subscriptions.torn_down = true;
        debug!("tore down state synchronizer ({released} listeners released)");
        true
    }

    /// Wait for the next contract notification.
    pub async fn next_notification(&self) -> Option<ContractNotification> {
        self.notifications.lock().await.recv().await
    }

    /// Bring the currently viewed page up to date after a contract notification.
    pub async fn handle_notification(
        &self,
        notification: &ContractNotification,
    ) -> Result<PageState, SyncError> {
        let _permit = self.page_refresh.lock().await;
        let current = self.current_page();
        debug!(
            "received {} notification for submission {} - refreshing page {current}",
            notification.kind, notification.submission_id
        );
        self.apply_page(current).await.inspect_err(|err| {
            warn!("failed to refresh the page after a contract notification: {err}")
        })
    }
}
