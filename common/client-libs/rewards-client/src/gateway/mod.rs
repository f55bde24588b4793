// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::contract_traits::{RewardsQueryClient, RewardsSigningClient};
use crate::error::GatewayError;
use crate::notifications::{HandleId, RewardsEventSource, SubscriptionHandle};
use crate::pending::{PendingTx, TxReceipt};
use crate::session::Session;
use async_trait::async_trait;
use bindings::{
    raw_submission, IntoNotification, RewardsContract, SubmissionApprovedFilter,
    SubmissionCreatedFilter,
};
use edu_rewards_contract_common::{
    Address, ContractNotification, ExecuteMsg as RewardsExecuteMsg, NotificationKind,
    QueryMsg as RewardsQueryMsg, QueryResponse, TxHash, U256,
};
use ethers::contract::{ContractError, EthEvent};
use ethers::providers::{Http, Middleware, PendingTransaction, Provider};
use ethers::types::U64;
use futures::StreamExt;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

mod bindings;

/// Handle used for signing the rewards contract transactions:
/// a json-rpc provider whose default sender is the connected wallet account.
pub type SigningProvider = Arc<Provider<Http>>;

#[derive(Clone)]
struct ConnectedContract {
    handle_id: HandleId,
    account: Address,
    provider: SigningProvider,
    contract: RewardsContract<Provider<Http>>,
}

/// Gateway to the rewards contract deployed on an EVM chain.
///
/// Until a wallet [`Session`] is attached, every call fails with [`GatewayError::NotConnected`].
pub struct EthRewardsGateway {
    contract_address: Address,
    confirmations: usize,
    last_handle: RwLock<HandleId>,
    connected: RwLock<Option<ConnectedContract>>,
    handle_updates: watch::Sender<Option<HandleId>>,
}

impl EthRewardsGateway {
    pub fn new(contract_address: Address, confirmations: usize) -> Self {
        EthRewardsGateway {
            contract_address,
            confirmations,
            last_handle: RwLock::new(HandleId::new(0)),
            connected: RwLock::new(None),
            handle_updates: watch::Sender::new(None),
        }
    }

    pub fn contract_address(&self) -> Address {
        self.contract_address
    }

    /// Bind the contract to the provided session.
    /// Every call changes the identity of the underlying contract handle.
    pub fn attach_session(&self, session: Session<SigningProvider>) -> HandleId {
        let handle_id = {
            let mut last = self.last_handle.write();
            *last = last.next();
            *last
        };

        let account = session.account();
        let provider = session.into_signer();
        let contract = RewardsContract::new(self.contract_address, Arc::clone(&provider));

        info!(
            "attached session of {account:?} to the rewards contract at {:?} (handle {handle_id})",
            self.contract_address
        );
        *self.connected.write() = Some(ConnectedContract {
            handle_id,
            account,
            provider,
            contract,
        });
        self.handle_updates.send_replace(Some(handle_id));
        handle_id
    }

    pub fn detach_session(&self) {
        if let Some(previous) = self.connected.write().take() {
            info!(
                "detached session of {:?} (handle {})",
                previous.account, previous.handle_id
            );
            self.handle_updates.send_replace(None);
        }
    }

    fn connected(&self) -> Result<ConnectedContract, GatewayError> {
        self.connected
            .read()
            .clone()
            .ok_or(GatewayError::NotConnected)
    }
}

fn contract_failure<M: Middleware>(operation: &str, err: ContractError<M>) -> GatewayError {
    if err.is_revert() {
        GatewayError::reverted(operation, err.decode_revert::<String>())
    } else {
        GatewayError::network_failure(operation, err)
    }
}

async fn wait_for_confirmation(
    provider: SigningProvider,
    operation: &'static str,
    tx_hash: TxHash,
    confirmations: usize,
) -> Result<TxReceipt, GatewayError> {
    let receipt = PendingTransaction::new(tx_hash, provider.as_ref())
        .confirmations(confirmations)
        .await
        .map_err(|err| GatewayError::network_failure(operation, err))?
        .ok_or(GatewayError::TransactionDropped { tx_hash })?;

    // status 0 means the execution has failed
    if receipt.status == Some(U64::zero()) {
        return Err(GatewayError::reverted(operation, None));
    }

    let block_number = receipt.block_number.map(|height| height.as_u64());
    debug!("{operation} got confirmed in block {block_number:?}");

    Ok(TxReceipt {
        tx_hash,
        block_number,
    })
}

async fn forward_events<E>(
    contract: RewardsContract<Provider<Http>>,
    sink: mpsc::UnboundedSender<ContractNotification>,
    cancellation: CancellationToken,
) where
    E: EthEvent + IntoNotification + 'static,
{
    let event = contract.event::<E>();
    let mut stream = match event.stream_with_meta().await {
        Ok(stream) => stream,
        Err(err) => {
            warn!("failed to create the {} event filter: {err}", E::KIND);
            return;
        }
    };

    loop {
        tokio::select! {
            biased;
            _ = cancellation.cancelled() => {
                debug!("{} listener has been cancelled", E::KIND);
                break
            }
            next = stream.next() => {
                let Some(next) = next else {
                    debug!("{} event stream has finished", E::KIND);
                    break;
                };
                match next {
                    Ok((log, meta)) => {
                        let notification = log.into_notification(Some(meta.transaction_hash));
                        if sink.send(notification).is_err() {
                            debug!("{} notification receiver is gone", E::KIND);
                            break;
                        }
                    }
                    Err(err) => warn!("failed to decode {} event: {err}", E::KIND),
                }
            }
        }
    }
}

#[async_trait]
impl RewardsQueryClient for EthRewardsGateway {
    #[instrument(skip(self), fields(contract = ?self.contract_address))]
    async fn query_rewards_contract(
        &self,
        query: RewardsQueryMsg,
    ) -> Result<QueryResponse, GatewayError> {
        let connected = self.connected()?;
        let contract = &connected.contract;
        let operation = query.name();

        let response = match query {
            RewardsQueryMsg::GetPagedContributions { page } => {
                let (submissions, total_pages) = contract
                    .get_paged_contributions(U256::from(page))
                    .call()
                    .await
                    .map_err(|err| contract_failure(operation, err))?;
                QueryResponse::PagedSubmissions {
                    submissions: submissions.into_iter().map(raw_submission).collect(),
                    total_pages,
                }
            }
            RewardsQueryMsg::GetAllSubmissions {} => {
                let submissions = contract
                    .get_all_submissions()
                    .call()
                    .await
                    .map_err(|err| contract_failure(operation, err))?;
                QueryResponse::Submissions(
                    submissions.into_iter().map(raw_submission).collect(),
                )
            }
            RewardsQueryMsg::GetContributorRewards { contributor } => QueryResponse::Amount(
                contract
                    .get_contributor_rewards(contributor)
                    .call()
                    .await
                    .map_err(|err| contract_failure(operation, err))?,
            ),
            RewardsQueryMsg::Paused {} => QueryResponse::Flag(
                contract
                    .paused()
                    .call()
                    .await
                    .map_err(|err| contract_failure(operation, err))?,
            ),
            RewardsQueryMsg::RewardPerSubmission {} => QueryResponse::Amount(
                contract
                    .reward_per_submission()
                    .call()
                    .await
                    .map_err(|err| contract_failure(operation, err))?,
            ),
        };

        debug!("{operation} returned {} response", response.kind());
        Ok(response)
    }
}

#[async_trait]
impl RewardsSigningClient for EthRewardsGateway {
    fn signer_address(&self) -> Result<Address, GatewayError> {
        self.connected().map(|connected| connected.account)
    }

    #[instrument(skip(self), fields(contract = ?self.contract_address))]
    async fn execute_rewards_contract(
        &self,
        msg: RewardsExecuteMsg,
    ) -> Result<PendingTx, GatewayError> {
        let connected = self.connected()?;
        let contract = &connected.contract;
        let operation = msg.name();

        let call = match msg {
            RewardsExecuteMsg::SubmitContribution { field, description } => {
                contract.submit_contribution(field, description)
            }
            RewardsExecuteMsg::ApproveSubmission { submission_id } => {
                contract.approve_submission(U256::from(submission_id))
            }
            RewardsExecuteMsg::Pause {} => contract.pause(),
            RewardsExecuteMsg::Unpause {} => contract.unpause(),
            RewardsExecuteMsg::SetRewardPerSubmission { amount } => {
                contract.set_reward_per_submission(amount)
            }
            RewardsExecuteMsg::FundRewardPool { amount } => contract.fund_reward_pool(amount),
            RewardsExecuteMsg::ClaimRewards {} => contract.claim_rewards(),
        };

        let tx_hash = {
            let pending = call
                .send()
                .await
                .map_err(|err| contract_failure(operation, err))?;
            *pending
        };
        info!("{operation} has been broadcast in transaction {tx_hash:?}");

        Ok(PendingTx::new(
            operation,
            tx_hash,
            wait_for_confirmation(connected.provider, operation, tx_hash, self.confirmations),
        ))
    }
}

#[async_trait]
impl RewardsEventSource for EthRewardsGateway {
    fn handle_id(&self) -> Option<HandleId> {
        self.connected.read().as_ref().map(|connected| connected.handle_id)
    }

    fn watch_handle(&self) -> watch::Receiver<Option<HandleId>> {
        self.handle_updates.subscribe()
    }

    async fn subscribe(
        &self,
        kind: NotificationKind,
        sink: mpsc::UnboundedSender<ContractNotification>,
    ) -> Result<SubscriptionHandle, GatewayError> {
        let connected = self.connected()?;
        let cancellation = CancellationToken::new();
        let contract = connected.contract.clone();

        let token = cancellation.clone();
        match kind {
            NotificationKind::SubmissionCreated => {
                tokio::spawn(forward_events::<SubmissionCreatedFilter>(contract, sink, token))
            }
            NotificationKind::SubmissionApproved => {
                tokio::spawn(forward_events::<SubmissionApprovedFilter>(contract, sink, token))
            }
        };

        debug!(
            "registered {kind} listener on contract handle {}",
            connected.handle_id
        );
        Ok(SubscriptionHandle::new(
            kind,
            connected.handle_id,
            cancellation,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn calls_without_session_are_rejected() {
        let gateway = EthRewardsGateway::new(Address::repeat_byte(0x11), 1);

        assert_eq!(gateway.handle_id(), None);
        assert_eq!(gateway.signer_address(), Err(GatewayError::NotConnected));
        assert_eq!(
            gateway.get_paused().await,
            Err(GatewayError::NotConnected)
        );
        assert_eq!(
            gateway.claim_rewards().await.unwrap_err(),
            GatewayError::NotConnected
        );

        let (sink, _) = mpsc::unbounded_channel();
        assert_eq!(
            gateway
                .subscribe(NotificationKind::SubmissionCreated, sink)
                .await
                .unwrap_err(),
            GatewayError::NotConnected
        );
    }

    #[tokio::test]
    async fn attaching_session_changes_handle_identity() {
        let gateway = EthRewardsGateway::new(Address::repeat_byte(0x11), 1);
        let mut handle_updates = gateway.watch_handle();
        let provider = Provider::<Http>::try_from("http://127.0.0.1:8545").unwrap();
        let signer = Arc::new(provider);
        let account = Address::repeat_byte(0x22);

        let first = gateway.attach_session(Session::new(account, Arc::clone(&signer)));
        assert_eq!(gateway.handle_id(), Some(first));
        assert!(handle_updates.has_changed().unwrap());
        assert_eq!(*handle_updates.borrow_and_update(), Some(first));
        assert_eq!(gateway.signer_address(), Ok(account));

        let second = gateway.attach_session(Session::new(account, signer));
        assert_ne!(first, second);
        assert_eq!(gateway.handle_id(), Some(second));

        assert_eq!(*handle_updates.borrow_and_update(), Some(second));

        gateway.detach_session();
        assert_eq!(gateway.handle_id(), None);
        assert_eq!(*handle_updates.borrow_and_update(), None);
        assert_eq!(gateway.signer_address(), Err(GatewayError::NotConnected));
    }
}
