// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

//! In-memory rewards contract implementing all client traits, for testing the layers built on top.
//!
//! It operates on the raw on-chain representation (base unit amounts, unix timestamps),
//! so that the client-side conversions are exercised as well.

use crate::contract_traits::{RewardsQueryClient, RewardsSigningClient};
use crate::error::GatewayError;
use crate::notifications::{HandleId, RewardsEventSource, SubscriptionHandle};
use crate::pending::{PendingTx, TxReceipt};
use async_trait::async_trait;
use edu_rewards_contract_common::{
    Address, ContractNotification, ExecuteMsg, NotificationKind, QueryMsg, QueryResponse,
    RawSubmission, SubmissionId, TxHash, U256,
};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::{mpsc, watch, Semaphore};
use tokio_util::sync::CancellationToken;

const GENESIS_TIMESTAMP: u64 = 1_700_000_000;
const BLOCK_TIME: u64 = 12;

struct Listener {
    kind: NotificationKind,
    sink: mpsc::UnboundedSender<ContractNotification>,
    cancellation: CancellationToken,
}

struct MockChainState {
    admin: Address,
    session: Option<(Address, HandleId)>,
    last_handle: HandleId,

    page_size: usize,
    submissions: Vec<RawSubmission>,
    paused: bool,
    reward_per_submission: U256,
    reward_pool: U256,
    pending_rewards: HashMap<Address, U256>,

    height: u64,
    emit_on_confirmation: bool,
    failing_queries: Option<GatewayError>,
    scripted_reverts: VecDeque<String>,
    hold_confirmations: bool,
    held_page_query: Option<u32>,

    queries: Vec<QueryMsg>,
    executions: Vec<ExecuteMsg>,
    listeners: Vec<Listener>,
}

impl MockChainState {
    fn now(&self) -> u64 {
        GENESIS_TIMESTAMP + self.height * BLOCK_TIME
    }

    fn total_pages(&self) -> usize {
        self.submissions.len().div_ceil(self.page_size)
    }

    fn emit(&mut self, notification: ContractNotification) {
        self.listeners
            .retain(|listener| !listener.cancellation.is_cancelled());
        for listener in &self.listeners {
            if listener.kind == notification.kind {
                // the receiver might be gone, which is not our problem
                let _ = listener.sink.send(notification.clone());
            }
        }
    }

    fn ensure_admin(&self, sender: Address) -> Result<(), String> {
        if sender != self.admin {
            return Err("caller is not the owner".to_string());
        }
        Ok(())
    }

    fn push_submission(
        &mut self,
        field: String,
        description: String,
        contributor: Address,
    ) -> SubmissionId {
        let id = self.submissions.len() as SubmissionId + 1;
        self.submissions.push(RawSubmission {
            id: U256::from(id),
            field,
            description,
            contributor,
            timestamp: U256::from(self.now()),
            reward: U256::zero(),
            is_approved: false,
        });
        id
    }

    fn apply(
        &mut self,
        sender: Address,
        msg: ExecuteMsg,
        tx_hash: TxHash,
    ) -> Result<Option<ContractNotification>, String> {
        match msg {
            ExecuteMsg::SubmitContribution { field, description } => {
                if self.paused {
                    return Err("contract is paused".to_string());
                }
                if field.is_empty() || description.is_empty() {
                    return Err("field and description must not be empty".to_string());
                }
                let id = self.push_submission(field, description, sender);
                Ok(Some(ContractNotification {
                    kind: NotificationKind::SubmissionCreated,
                    submission_id: id,
                    contributor: sender,
                    tx_hash: Some(tx_hash),
                }))
            }
            ExecuteMsg::ApproveSubmission { submission_id } => {
                self.ensure_admin(sender)?;
                let reward = self.reward_per_submission;
                let submission = self
                    .submissions
                    .iter_mut()
                    .find(|s| s.id == U256::from(submission_id))
                    .ok_or_else(|| "submission does not exist".to_string())?;
                if submission.is_approved {
                    return Err("submission already approved".to_string());
                }
                submission.is_approved = true;
                submission.reward = reward;
                let contributor = submission.contributor;
                *self.pending_rewards.entry(contributor).or_default() += reward;
                Ok(Some(ContractNotification {
                    kind: NotificationKind::SubmissionApproved,
                    submission_id,
                    contributor,
                    tx_hash: Some(tx_hash),
                }))
            }
            ExecuteMsg::Pause {} => {
                self.ensure_admin(sender)?;
                if self.paused {
                    return Err("contract is already paused".to_string());
                }
                self.paused = true;
                Ok(None)
            }
            ExecuteMsg::Unpause {} => {
                self.ensure_admin(sender)?;
                if !self.paused {
                    return Err("contract is not paused".to_string());
                }
                self.paused = false;
                Ok(None)
            }
            ExecuteMsg::SetRewardPerSubmission { amount } => {
                self.ensure_admin(sender)?;
                self.reward_per_submission = amount;
                Ok(None)
            }
            ExecuteMsg::FundRewardPool { amount } => {
                if amount.is_zero() {
                    return Err("funding amount must be positive".to_string());
                }
                self.reward_pool += amount;
                Ok(None)
            }
            ExecuteMsg::ClaimRewards {} => {
                let pending = self
                    .pending_rewards
                    .get(&sender)
                    .copied()
                    .unwrap_or_default();
                if pending.is_zero() {
                    return Err("no rewards to claim".to_string());
                }
                if pending > self.reward_pool {
                    return Err("insufficient reward pool".to_string());
                }
                self.reward_pool -= pending;
                self.pending_rewards.insert(sender, U256::zero());
                Ok(None)
            }
        }
    }
}

/// Scriptable in-memory stand-in for the deployed rewards contract.
#[derive(Clone)]
pub struct MockRewardsContract {
    state: Arc<Mutex<MockChainState>>,
    confirmations: Arc<Semaphore>,
    page_queries: Arc<Semaphore>,
    handle_updates: Arc<watch::Sender<Option<HandleId>>>,
}

impl MockRewardsContract {
    pub fn new(admin: Address, page_size: usize) -> Self {
        MockRewardsContract {
            state: Arc::new(Mutex::new(MockChainState {
                admin,
                session: None,
                last_handle: HandleId::new(0),
                page_size,
                submissions: Vec::new(),
                paused: false,
                reward_per_submission: U256::zero(),
                reward_pool: U256::zero(),
                pending_rewards: HashMap::new(),
                height: 1,
                emit_on_confirmation: true,
                failing_queries: None,
                scripted_reverts: VecDeque::new(),
                hold_confirmations: false,
                held_page_query: None,
                queries: Vec::new(),
                executions: Vec::new(),
                listeners: Vec::new(),
            })),
            confirmations: Arc::new(Semaphore::new(0)),
            page_queries: Arc::new(Semaphore::new(0)),
            handle_updates: Arc::new(watch::Sender::new(None)),
        }
    }

    /// Attach a session of the provided account. Every call yields a new handle identity.
    pub fn connect(&self, account: Address) -> HandleId {
        let handle = {
            let mut state = self.state.lock();
            state.last_handle = state.last_handle.next();
            let handle = state.last_handle;
            state.session = Some((account, handle));
            handle
        };
        self.handle_updates.send_replace(Some(handle));
        handle
    }

    pub fn disconnect(&self) {
        self.state.lock().session = None;
        self.handle_updates.send_replace(None);
    }

    pub fn add_submission(
        &self,
        field: &str,
        description: &str,
        contributor: Address,
    ) -> SubmissionId {
        let mut state = self.state.lock();
        state.height += 1;
        state.push_submission(field.to_string(), description.to_string(), contributor)
    }

    pub fn set_paused(&self, paused: bool) {
        self.state.lock().paused = paused;
    }

    pub fn set_reward_per_submission_units(&self, amount: U256) {
        self.state.lock().reward_per_submission = amount;
    }

    pub fn reward_per_submission_units(&self) -> U256 {
        self.state.lock().reward_per_submission
    }

    pub fn credit_reward(&self, contributor: Address, amount: U256) {
        *self
            .state
            .lock()
            .pending_rewards
            .entry(contributor)
            .or_default() += amount;
    }

    pub fn pending_reward_units(&self, contributor: Address) -> U256 {
        self.state
            .lock()
            .pending_rewards
            .get(&contributor)
            .copied()
            .unwrap_or_default()
    }

    pub fn reward_pool_units(&self) -> U256 {
        self.state.lock().reward_pool
    }

    pub fn submission(&self, id: SubmissionId) -> Option<RawSubmission> {
        self.state
            .lock()
            .submissions
            .iter()
            .find(|s| s.id == U256::from(id))
            .cloned()
    }

    /// Make every subsequent query fail with the provided error, until reset with `None`.
    pub fn fail_queries_with(&self, error: Option<GatewayError>) {
        self.state.lock().failing_queries = error;
    }

    /// Make the next executed transaction revert with the provided reason.
    pub fn revert_next_execution(&self, reason: &str) {
        self.state
            .lock()
            .scripted_reverts
            .push_back(reason.to_string());
    }

    /// Stop confirming transactions until explicitly released.
    pub fn hold_confirmations(&self) {
        self.state.lock().hold_confirmations = true;
    }

    /// Let exactly one held transaction get confirmed.
    pub fn release_confirmation(&self) {
        self.confirmations.add_permits(1);
    }

    /// Delay the response to the next query of the provided page until explicitly released.
    pub fn hold_page_query(&self, page: u32) {
        self.state.lock().held_page_query = Some(page);
    }

    pub fn release_page_query(&self) {
        self.page_queries.add_permits(1);
    }

    pub fn emit_events_on_confirmation(&self, emit: bool) {
        self.state.lock().emit_on_confirmation = emit;
    }

    /// Push a notification to all current listeners of its kind.
    pub fn emit(&self, notification: ContractNotification) {
        self.state.lock().emit(notification)
    }

    pub fn active_listeners(&self, kind: NotificationKind) -> usize {
        self.state
            .lock()
            .listeners
            .iter()
            .filter(|listener| listener.kind == kind && !listener.cancellation.is_cancelled())
            .count()
    }

    pub fn queries(&self) -> Vec<QueryMsg> {
        self.state.lock().queries.clone()
    }

    /// Pages requested through `getPagedContributions`, in order.
    pub fn paged_queries(&self) -> Vec<u32> {
        self.state
            .lock()
            .queries
            .iter()
            .filter_map(|query| match query {
                QueryMsg::GetPagedContributions { page } => Some(*page),
                _ => None,
            })
            .collect()
    }

    pub fn executions(&self) -> Vec<ExecuteMsg> {
        self.state.lock().executions.clone()
    }

    pub fn clear_calls(&self) {
        let mut state = self.state.lock();
        state.queries.clear();
        state.executions.clear();
    }

    fn session(&self) -> Result<(Address, HandleId), GatewayError> {
        self.state.lock().session.ok_or(GatewayError::NotConnected)
    }
}

#[async_trait]
impl RewardsQueryClient for MockRewardsContract {
    async fn query_rewards_contract(&self, query: QueryMsg) -> Result<QueryResponse, GatewayError> {
        self.session()?;

        let held = {
            let mut state = self.state.lock();
            state.queries.push(query.clone());
            match query {
                QueryMsg::GetPagedContributions { page }
                    if state.held_page_query == Some(page) =>
                {
                    state.held_page_query = None;
                    true
                }
                _ => false,
            }
        };
        if held {
            let permit = self
                .page_queries
                .acquire()
                .await
                .map_err(|err| GatewayError::network_failure(query.name(), err))?;
            permit.forget();
        }

        let state = self.state.lock();
        if let Some(err) = &state.failing_queries {
            return Err(err.clone());
        }

        let response = match query {
            QueryMsg::GetPagedContributions { page } => {
                let page_size = state.page_size;
                let submissions = state
                    .submissions
                    .iter()
                    .skip(page as usize * page_size)
                    .take(page_size)
                    .cloned()
                    .collect();
                QueryResponse::PagedSubmissions {
                    submissions,
                    total_pages: U256::from(state.total_pages()),
                }
            }
            QueryMsg::GetAllSubmissions {} => QueryResponse::Submissions(state.submissions.clone()),
            QueryMsg::GetContributorRewards { contributor } => QueryResponse::Amount(
                state
                    .pending_rewards
                    .get(&contributor)
                    .copied()
                    .unwrap_or_default(),
            ),
            QueryMsg::Paused {} => QueryResponse::Flag(state.paused),
            QueryMsg::RewardPerSubmission {} => QueryResponse::Amount(state.reward_per_submission),
        };
        Ok(response)
    }
}

#[async_trait]
impl RewardsSigningClient for MockRewardsContract {
    fn signer_address(&self) -> Result<Address, GatewayError> {
        self.session().map(|(account, _)| account)
    }

    async fn execute_rewards_contract(&self, msg: ExecuteMsg) -> Result<PendingTx, GatewayError> {
        let (sender, _) = self.session()?;
        let operation = msg.name();

        let (tx_hash, held) = {
            let mut state = self.state.lock();
            state.executions.push(msg.clone());
            (
                TxHash::from_low_u64_be(state.executions.len() as u64),
                state.hold_confirmations,
            )
        };

        let state = Arc::clone(&self.state);
        let gate = Arc::clone(&self.confirmations);
        Ok(PendingTx::new(operation, tx_hash, async move {
            if held {
                let permit = gate
                    .acquire()
                    .await
                    .map_err(|err| GatewayError::network_failure(operation, err))?;
                permit.forget();
            }

            let mut state = state.lock();
            state.height += 1;
            if let Some(reason) = state.scripted_reverts.pop_front() {
                return Err(GatewayError::reverted(operation, Some(reason)));
            }

            let notification = state
                .apply(sender, msg, tx_hash)
                .map_err(|reason| GatewayError::reverted(operation, Some(reason)))?;
            if let Some(notification) = notification {
                if state.emit_on_confirmation {
                    state.emit(notification);
                }
            }

            Ok(TxReceipt {
                tx_hash,
                block_number: Some(state.height),
            })
        }))
    }
}

#[async_trait]
impl RewardsEventSource for MockRewardsContract {
    fn handle_id(&self) -> Option<HandleId> {
        self.state.lock().session.map(|(_, handle)| handle)
    }

    fn watch_handle(&self) -> watch::Receiver<Option<HandleId>> {
        self.handle_updates.subscribe()
    }

    async fn subscribe(
        &self,
        kind: NotificationKind,
        sink: mpsc::UnboundedSender<ContractNotification>,
    ) -> Result<SubscriptionHandle, GatewayError> {
        let (_, handle) = self.session()?;
        let cancellation = CancellationToken::new();
        self.state.lock().listeners.push(Listener {
            kind,
            sink,
            cancellation: cancellation.clone(),
        });
        Ok(SubscriptionHandle::new(kind, handle, cancellation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edu_rewards_contract_common::Decimal;
    use std::str::FromStr;

    fn admin() -> Address {
        Address::repeat_byte(0xad)
    }

    #[tokio::test]
    async fn decimal_amounts_cross_the_gateway_scaled() {
        let contract = MockRewardsContract::new(admin(), 10);
        contract.connect(admin());

        let reward = Decimal::from_str("1.5").unwrap();
        contract
            .set_reward_per_submission(reward)
            .await
            .unwrap()
            .await
            .unwrap();
        assert_eq!(
            contract.reward_per_submission_units(),
            U256::from(1_500_000_000_000_000_000u128)
        );
        assert_eq!(contract.get_reward_per_submission().await.unwrap(), reward);

        let funding = Decimal::from_str("2.25").unwrap();
        contract
            .fund_reward_pool(funding)
            .await
            .unwrap()
            .await
            .unwrap();
        assert_eq!(
            contract.reward_pool_units(),
            U256::from(2_250_000_000_000_000_000u128)
        );
    }

    #[tokio::test]
    async fn approval_credits_the_contributor() {
        let contributor = Address::repeat_byte(0xc0);
        let contract = MockRewardsContract::new(admin(), 10);
        contract.connect(admin());
        contract.set_reward_per_submission_units(U256::exp10(18));
        let id = contract.add_submission("biology", "cell diagrams", contributor);

        contract
            .approve_submission(id)
            .await
            .unwrap()
            .await
            .unwrap();

        assert_eq!(
            contract.get_contributor_reward(contributor).await.unwrap(),
            Decimal::one()
        );
        let err = contract
            .approve_submission(id)
            .await
            .unwrap()
            .await
            .unwrap_err();
        assert!(err.is_revert());
    }

    #[tokio::test]
    async fn paging_follows_the_page_size() {
        let contract = MockRewardsContract::new(admin(), 2);
        contract.connect(admin());
        for i in 0..5 {
            contract.add_submission("field", &format!("entry {i}"), admin());
        }

        let last = contract.get_paged_submissions(2).await.unwrap();
        assert_eq!(last.total_pages, 3);
        assert_eq!(last.items.len(), 1);
        assert_eq!(last.items[0].id, 5);

        let beyond = contract.get_paged_submissions(3).await.unwrap();
        assert!(beyond.items.is_empty());
        assert_eq!(contract.paged_queries(), vec![2, 3]);
    }
}
