// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::error::ConnectionError;
use crate::gateway::SigningProvider;
use crate::wallet::InjectedWallet;
use async_trait::async_trait;
use edu_rewards_contract_common::Address;
use ethers::providers::{Http, Provider, ProviderError, RpcError};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

// as defined by EIP-1193
const USER_REJECTED_REQUEST: i64 = 4001;
const UNAUTHORIZED: i64 = 4100;

/// Wallet reachable through a json-rpc endpoint that manages the accounts (and their keys) itself,
/// so that the transactions are signed by the wallet rather than this client.
pub struct JsonRpcWallet {
    endpoint: Url,
    provider: Provider<Http>,
}

impl JsonRpcWallet {
    pub fn new(endpoint: Url, polling_interval: Duration) -> Self {
        let provider = Provider::new(Http::new(endpoint.clone())).interval(polling_interval);
        JsonRpcWallet { endpoint, provider }
    }

    fn classify_error(&self, err: ProviderError) -> ConnectionError {
        if let ProviderError::JsonRpcClientError(rpc_err) = &err {
            if let Some(response) = rpc_err.as_error_response() {
                debug!(
                    "wallet responded with error code {}: {}",
                    response.code, response.message
                );
                if response.code == USER_REJECTED_REQUEST || response.code == UNAUTHORIZED {
                    return ConnectionError::UserRejected {
                        reason: response.message.clone(),
                    };
                }
            }
        }

        ConnectionError::provider_unavailable(Some(self.endpoint.to_string()), err.to_string())
    }
}

#[async_trait]
impl InjectedWallet for JsonRpcWallet {
    type Signer = SigningProvider;

    fn endpoint(&self) -> String {
        self.endpoint.to_string()
    }

    async fn request_accounts(&self) -> Result<Vec<Address>, ConnectionError> {
        debug!("requesting account access from {}", self.endpoint);
        self.provider
            .request::<_, Vec<Address>>("eth_requestAccounts", ())
            .await
            .map_err(|err| self.classify_error(err))
    }

    fn signer_for(&self, account: Address) -> Self::Signer {
        Arc::new(self.provider.clone().with_sender(account))
    }
}
