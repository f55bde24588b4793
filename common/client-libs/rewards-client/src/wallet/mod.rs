// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::error::ConnectionError;
use crate::session::Session;
use async_trait::async_trait;
use edu_rewards_contract_common::Address;
use std::io;
use tracing::{info, warn};

mod json_rpc;

pub use json_rpc::JsonRpcWallet;

/// A wallet provider made available by the environment, e.g. a desktop wallet exposing
/// the standard ethereum json-rpc account api.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait InjectedWallet {
    type Signer: Clone + Send + Sync;

    fn endpoint(&self) -> String;

    /// Ask the wallet for access to its accounts. This might prompt the user.
    async fn request_accounts(&self) -> Result<Vec<Address>, ConnectionError>;

    fn signer_for(&self, account: Address) -> Self::Signer;
}

/// Durable storage of the last connected account.
pub trait AccountStore {
    fn load_account(&self) -> Option<Address>;

    fn store_account(&self, account: Address) -> io::Result<()>;
}

pub struct WalletConnector<W, S> {
    wallet: Option<W>,
    store: S,
}

impl<W, S> WalletConnector<W, S>
where
    W: InjectedWallet + Send + Sync,
    S: AccountStore,
{
    pub fn new(wallet: Option<W>, store: S) -> Self {
        WalletConnector { wallet, store }
    }

    /// Account used during the last successful connection.
    /// It is only meant for display purposes, it does not grant any access by itself.
    pub fn last_known_account(&self) -> Option<Address> {
        self.store.load_account()
    }

    /// Request account access from the wallet and establish a new session with the first
    /// returned account. The wallet is always asked, even if some account has been persisted before.
    pub async fn connect(&self) -> Result<Session<W::Signer>, ConnectionError> {
        let Some(wallet) = &self.wallet else {
            return Err(ConnectionError::provider_unavailable(
                None,
                "no wallet provider has been configured",
            ));
        };

        let accounts = wallet.request_accounts().await?;
        let Some(account) = accounts.first().copied() else {
            return Err(ConnectionError::UserRejected {
                reason: "the wallet has not exposed any accounts".to_string(),
            });
        };

        if let Err(err) = self.store.store_account(account) {
            warn!("failed to persist the connected account: {err}");
        }

        info!("connected to wallet at {} as {account:?}", wallet.endpoint());
        Ok(Session::new(account, wallet.signer_for(account)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct MemoryStore {
        account: Mutex<Option<Address>>,
        broken: bool,
    }

    impl AccountStore for MemoryStore {
        fn load_account(&self) -> Option<Address> {
            *self.account.lock()
        }

        fn store_account(&self, account: Address) -> io::Result<()> {
            if self.broken {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
            }
            *self.account.lock() = Some(account);
            Ok(())
        }
    }

    struct ScriptedWallet {
        response: Result<Vec<Address>, ConnectionError>,
    }

    #[async_trait]
    impl InjectedWallet for ScriptedWallet {
        type Signer = Address;

        fn endpoint(&self) -> String {
            "scripted".to_string()
        }

        async fn request_accounts(&self) -> Result<Vec<Address>, ConnectionError> {
            self.response.clone()
        }

        fn signer_for(&self, account: Address) -> Self::Signer {
            account
        }
    }

    #[tokio::test]
    async fn missing_wallet_is_reported_as_unavailable_provider() {
        let connector =
            WalletConnector::<ScriptedWallet, _>::new(None, MemoryStore::default());

        let err = connector.connect().await.unwrap_err();
        assert!(matches!(err, ConnectionError::ProviderUnavailable { .. }));
    }

    #[tokio::test]
    async fn rejection_is_propagated_and_nothing_gets_persisted() {
        let wallet = ScriptedWallet {
            response: Err(ConnectionError::UserRejected {
                reason: "User rejected the request.".to_string(),
            }),
        };
        let connector = WalletConnector::new(Some(wallet), MemoryStore::default());

        let err = connector.connect().await.unwrap_err();
        assert!(matches!(err, ConnectionError::UserRejected { .. }));
        assert!(connector.last_known_account().is_none());
    }

    #[tokio::test]
    async fn empty_account_list_counts_as_rejection() {
        let wallet = ScriptedWallet {
            response: Ok(Vec::new()),
        };
        let connector = WalletConnector::new(Some(wallet), MemoryStore::default());

        let err = connector.connect().await.unwrap_err();
        assert!(matches!(err, ConnectionError::UserRejected { .. }));
    }

    #[tokio::test]
    async fn first_account_is_used_and_persisted() {
        let first = Address::repeat_byte(1);
        let second = Address::repeat_byte(2);
        let wallet = ScriptedWallet {
            response: Ok(vec![first, second]),
        };
        let connector = WalletConnector::new(Some(wallet), MemoryStore::default());

        let session = connector.connect().await.unwrap();
        assert_eq!(session.account(), first);
        assert_eq!(*session.signer(), first);
        assert_eq!(connector.last_known_account(), Some(first));
    }

    #[tokio::test]
    async fn persistence_failure_does_not_prevent_connection() {
        let account = Address::repeat_byte(3);
        let wallet = ScriptedWallet {
            response: Ok(vec![account]),
        };
        let store = MemoryStore {
            broken: true,
            ..Default::default()
        };
        let connector = WalletConnector::new(Some(wallet), store);

        let session = connector.connect().await.unwrap();
        assert_eq!(session.account(), account);
        assert!(connector.last_known_account().is_none());
    }
}
