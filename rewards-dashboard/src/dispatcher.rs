// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::error::{DispatchError, SyncError};
use crate::sync::StateSynchronizer;
use edu_rewards_client::{GatewayError, PendingTx, RewardsGateway, TxReceipt};
use edu_rewards_contract_common::{Decimal, SubmissionId};
use parking_lot::Mutex;
use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// State-changing request issued by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SubmitContribution { field: String, description: String },
    ApproveSubmission { submission_id: SubmissionId },
    Pause,
    Unpause,

    /// Pause or unpause, depending on the currently mirrored paused flag.
    TogglePause,
    SetRewardPerSubmission { amount: Decimal },
    FundRewardPool { amount: Decimal },
    ClaimRewards,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::SubmitContribution { .. } => ActionKind::SubmitContribution,
            Action::ApproveSubmission { .. } => ActionKind::ApproveSubmission,
            Action::Pause => ActionKind::Pause,
            Action::Unpause => ActionKind::Unpause,
            Action::TogglePause => ActionKind::TogglePause,
            Action::SetRewardPerSubmission { .. } => ActionKind::SetRewardPerSubmission,
            Action::FundRewardPool { .. } => ActionKind::FundRewardPool,
            Action::ClaimRewards => ActionKind::ClaimRewards,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    SubmitContribution,
    ApproveSubmission,
    Pause,
    Unpause,
    TogglePause,
    SetRewardPerSubmission,
    FundRewardPool,
    ClaimRewards,
}

/// Part of the mirrored state that might have been affected by a confirmed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RefreshScope {
    CurrentPage,
    Params,
    RewardBalance,
    Nothing,
}

impl ActionKind {
    pub(crate) fn refresh_scope(&self) -> RefreshScope {
        match self {
            ActionKind::SubmitContribution | ActionKind::ApproveSubmission => {
                RefreshScope::CurrentPage
            }
            ActionKind::Pause
            | ActionKind::Unpause
            | ActionKind::TogglePause
            | ActionKind::SetRewardPerSubmission => RefreshScope::Params,
            ActionKind::ClaimRewards => RefreshScope::RewardBalance,
            ActionKind::FundRewardPool => RefreshScope::Nothing,
        }
    }
}

impl Display for ActionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionKind::SubmitContribution => write!(f, "submitting contribution"),
            ActionKind::ApproveSubmission => write!(f, "approving submission"),
            ActionKind::Pause => write!(f, "pausing contract"),
            ActionKind::Unpause => write!(f, "unpausing contract"),
            ActionKind::TogglePause => write!(f, "toggling pause"),
            ActionKind::SetRewardPerSubmission => write!(f, "setting reward per submission"),
            ActionKind::FundRewardPool => write!(f, "funding reward pool"),
            ActionKind::ClaimRewards => write!(f, "claiming rewards"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActionLifecycle {
    #[default]
    Idle,
    Busy(ActionKind),
}

impl ActionLifecycle {
    pub fn is_busy(&self) -> bool {
        matches!(self, ActionLifecycle::Busy(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionOutcome {
    pub action: ActionKind,
    pub receipt: TxReceipt,
}

// puts the lifecycle back to idle no matter how the action has ended
struct BusyGuard<'a> {
    lifecycle: &'a Mutex<ActionLifecycle>,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        *self.lifecycle.lock() = ActionLifecycle::Idle;
    }
}

/// Runs every write action through the same lifecycle:
/// mark busy, send the transaction, wait for its confirmation,
/// refresh whatever it has affected and go back to idle.
pub struct ActionDispatcher<C> {
    client: Arc<C>,
    synchronizer: Arc<StateSynchronizer<C>>,
    lifecycle: Mutex<ActionLifecycle>,
    last_error: Mutex<Option<String>>,
}

impl<C> ActionDispatcher<C>
where
    C: RewardsGateway,
{
    pub fn new(client: Arc<C>, synchronizer: Arc<StateSynchronizer<C>>) -> Self {
        ActionDispatcher {
            client,
            synchronizer,
            lifecycle: Mutex::new(ActionLifecycle::Idle),
            last_error: Mutex::new(None),
        }
    }

    pub fn lifecycle(&self) -> ActionLifecycle {
        *self.lifecycle.lock()
    }

    /// Human-readable description of the most recent failed action, if any.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }

    fn begin(&self, requested: ActionKind) -> Result<BusyGuard<'_>, DispatchError> {
        let mut lifecycle = self.lifecycle.lock();
        if let ActionLifecycle::Busy(in_flight) = *lifecycle {
            return Err(DispatchError::Busy {
                requested,
                in_flight,
            });
        }
        *lifecycle = ActionLifecycle::Busy(requested);
        Ok(BusyGuard {
            lifecycle: &self.lifecycle,
        })
    }

    pub async fn dispatch(&self, action: Action) -> Result<ActionOutcome, DispatchError> {
        let kind = action.kind();
        let _busy = self.begin(kind).inspect_err(|err| debug!("{err}"))?;

        let result = self.execute(kind, action).await;
        match &result {
            Ok(outcome) => {
                info!("finished {kind} in tx {:?}", outcome.receipt.tx_hash);
                *self.last_error.lock() = None;
            }
            Err(err) => {
                warn!("{err}");
                *self.last_error.lock() = Some(err.to_string());
            }
        }
        result
    }

    async fn send(&self, action: Action) -> Result<PendingTx, GatewayError> {
        match action {
            Action::SubmitContribution { field, description } => {
                self.client.submit_contribution(field, description).await
            }
            Action::ApproveSubmission { submission_id } => {
                self.client.approve_submission(submission_id).await
            }
            Action::Pause => self.client.pause().await,
            Action::Unpause => self.client.unpause().await,
            Action::TogglePause => {
                if self.synchronizer.params().paused {
                    self.client.unpause().await
                } else {
                    self.client.pause().await
                }
            }
            Action::SetRewardPerSubmission { amount } => {
                self.client.set_reward_per_submission(amount).await
            }
            Action::FundRewardPool { amount } => self.client.fund_reward_pool(amount).await,
            Action::ClaimRewards => self.client.claim_rewards().await,
        }
    }

    async fn execute(&self, kind: ActionKind, action: Action) -> Result<ActionOutcome, DispatchError> {
        let into_dispatch_err = |source| DispatchError::Gateway {
            action: kind,
            source,
        };

        let pending = self.send(action).await.map_err(into_dispatch_err)?;
        debug!(
            "{} broadcast as {:?}, waiting for confirmation",
            pending.operation(),
            pending.tx_hash()
        );
        let receipt = pending.await.map_err(into_dispatch_err)?;

        self.refresh(kind.refresh_scope())
            .await
            .map_err(|source| DispatchError::Sync {
                action: kind,
                source,
            })?;

        Ok(ActionOutcome {
            action: kind,
            receipt,
        })
    }

    async fn refresh(&self, scope: RefreshScope) -> Result<(), SyncError> {
        match scope {
            RefreshScope::CurrentPage => self.synchronizer.refresh_current_page().await.map(|_| ()),
            RefreshScope::Params => self.synchronizer.refresh_params().await.map(|_| ()),
            RefreshScope::RewardBalance => {
                self.synchronizer.refresh_reward_balance().await.map(|_| ())
            }
            RefreshScope::Nothing => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::PageState;
    use edu_rewards_client::mock::MockRewardsContract;
    use edu_rewards_contract_common::{Address, ExecuteMsg, U256};
    use std::str::FromStr;

    const PAGE_SIZE: usize = 5;

    fn admin() -> Address {
        Address::repeat_byte(0xad)
    }

    fn contributor() -> Address {
        Address::repeat_byte(0xc0)
    }

    fn setup(
        account: Address,
    ) -> (
        MockRewardsContract,
        Arc<StateSynchronizer<MockRewardsContract>>,
        Arc<ActionDispatcher<MockRewardsContract>>,
    ) {
        let contract = MockRewardsContract::new(admin(), PAGE_SIZE);
        contract.connect(account);
        let client = Arc::new(contract.clone());
        let synchronizer = Arc::new(StateSynchronizer::new(
            Arc::clone(&client),
            Some(account),
            PAGE_SIZE,
        ));
        let dispatcher = Arc::new(ActionDispatcher::new(client, Arc::clone(&synchronizer)));
        (contract, synchronizer, dispatcher)
    }

    #[tokio::test]
    async fn action_while_busy_is_rejected_and_never_sent() {
        let (contract, _, dispatcher) = setup(admin());
        contract.hold_confirmations();

        let in_flight = {
            let dispatcher = Arc::clone(&dispatcher);
            tokio::spawn(async move { dispatcher.dispatch(Action::Pause).await })
        };
        while !dispatcher.lifecycle().is_busy() {
            tokio::task::yield_now().await;
        }

        let err = dispatcher
            .dispatch(Action::ClaimRewards)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DispatchError::Busy {
                requested: ActionKind::ClaimRewards,
                in_flight: ActionKind::Pause,
            }
        );
        assert_eq!(contract.executions(), vec![ExecuteMsg::Pause {}]);
        assert_eq!(dispatcher.lifecycle(), ActionLifecycle::Busy(ActionKind::Pause));

        contract.release_confirmation();
        let outcome = in_flight.await.unwrap().unwrap();
        assert_eq!(outcome.action, ActionKind::Pause);
        assert_eq!(dispatcher.lifecycle(), ActionLifecycle::Idle);
        assert!(dispatcher.last_error().is_none());
    }

    #[tokio::test]
    async fn confirmed_submission_shows_up_unapproved() {
        let (_, synchronizer, dispatcher) = setup(contributor());

        dispatcher
            .dispatch(Action::SubmitContribution {
                field: "mathematics".to_string(),
                description: "proof sketches".to_string(),
            })
            .await
            .unwrap();

        let page = synchronizer.page();
        assert_eq!(page.total_pages, 1);
        let submission = page
            .items
            .iter()
            .find(|s| s.description == "proof sketches")
            .unwrap();
        assert_eq!(submission.contributor, contributor());
        assert!(!submission.approved);
        assert_eq!(dispatcher.lifecycle(), ActionLifecycle::Idle);
    }

    #[tokio::test]
    async fn reverted_approval_leaves_page_untouched() {
        let (contract, synchronizer, dispatcher) = setup(admin());
        let id = contract.add_submission("chemistry", "lab report", contributor());
        let before = synchronizer.refresh_page(0).await.unwrap();
        contract.clear_calls();

        contract.revert_next_execution("submission already approved");
        let err = dispatcher
            .dispatch(Action::ApproveSubmission { submission_id: id })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DispatchError::Gateway {
                action: ActionKind::ApproveSubmission,
                ref source,
            } if source.is_revert()
        ));
        assert_eq!(synchronizer.page(), before);
        assert!(contract.paged_queries().is_empty());
        assert_eq!(dispatcher.lifecycle(), ActionLifecycle::Idle);
        assert_eq!(
            dispatcher.last_error().unwrap(),
            "error approving submission: RewardsContract::ApproveSubmission got reverted by the contract: submission already approved"
        );
    }

    #[tokio::test]
    async fn toggle_picks_the_opposite_of_the_mirrored_flag() {
        let (contract, synchronizer, dispatcher) = setup(admin());
        contract.set_paused(true);
        synchronizer.refresh_params().await.unwrap();

        dispatcher.dispatch(Action::TogglePause).await.unwrap();
        assert_eq!(contract.executions(), vec![ExecuteMsg::Unpause {}]);
        assert!(!synchronizer.params().paused);

        dispatcher.dispatch(Action::TogglePause).await.unwrap();
        assert_eq!(
            contract.executions(),
            vec![ExecuteMsg::Unpause {}, ExecuteMsg::Pause {}]
        );
        assert!(synchronizer.params().paused);
    }

    #[tokio::test]
    async fn reward_change_is_reflected_in_params() {
        let (contract, synchronizer, dispatcher) = setup(admin());
        let amount = Decimal::from_str("0.125").unwrap();

        dispatcher
            .dispatch(Action::SetRewardPerSubmission { amount })
            .await
            .unwrap();

        assert_eq!(
            contract.reward_per_submission_units(),
            U256::from(125_000_000_000_000_000u128)
        );
        assert_eq!(synchronizer.params().reward_per_submission, amount);
    }

    #[tokio::test]
    async fn claim_refreshes_reward_balance() {
        let (contract, synchronizer, dispatcher) = setup(contributor());
        contract.credit_reward(contributor(), U256::exp10(18));
        synchronizer.refresh_reward_balance().await.unwrap();
        assert_eq!(synchronizer.reward_balance(), Some(Decimal::one()));

        dispatcher
            .dispatch(Action::FundRewardPool {
                amount: Decimal::from_str("3").unwrap(),
            })
            .await
            .unwrap();
        dispatcher.dispatch(Action::ClaimRewards).await.unwrap();

        assert_eq!(synchronizer.reward_balance(), Some(Decimal::zero()));
        assert_eq!(
            contract.reward_pool_units(),
            U256::from(2_000_000_000_000_000_000u128)
        );
    }

    #[tokio::test]
    async fn funding_does_not_query_anything() {
        let (contract, synchronizer, dispatcher) = setup(admin());

        dispatcher
            .dispatch(Action::FundRewardPool {
                amount: Decimal::from_str("10").unwrap(),
            })
            .await
            .unwrap();

        assert!(contract.queries().is_empty());
        assert_eq!(synchronizer.page(), PageState::empty());
    }

    #[tokio::test]
    async fn claim_without_rewards_surfaces_the_revert() {
        let (_, synchronizer, dispatcher) = setup(contributor());

        let err = dispatcher.dispatch(Action::ClaimRewards).await.unwrap_err();
        assert!(!err.is_busy());
        assert!(dispatcher.last_error().unwrap().contains("no rewards to claim"));
        assert_eq!(synchronizer.reward_balance(), None);
        assert_eq!(dispatcher.lifecycle(), ActionLifecycle::Idle);
    }
}
