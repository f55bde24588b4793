// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use edu_rewards_contract_common::TxHash;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    #[error("no wallet provider is available{}: {message}", endpoint_suffix(.endpoint))]
    ProviderUnavailable {
        endpoint: Option<String>,
        message: String,
    },

    #[error("the wallet rejected the account access request: {reason}")]
    UserRejected { reason: String },
}

impl ConnectionError {
    pub fn provider_unavailable<S: Into<String>>(endpoint: Option<String>, message: S) -> Self {
        ConnectionError::ProviderUnavailable {
            endpoint,
            message: message.into(),
        }
    }
}

fn endpoint_suffix(endpoint: &Option<String>) -> String {
    match endpoint {
        Some(endpoint) => format!(" at {endpoint}"),
        None => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("there is no wallet session attached to the rewards contract client")]
    NotConnected,

    #[error("{operation} got reverted by the contract{}", reason_suffix(.reason))]
    TransactionReverted {
        operation: String,
        reason: Option<String>,
    },

    #[error("transaction {tx_hash:?} has been dropped before getting confirmed")]
    TransactionDropped { tx_hash: TxHash },

    #[error("{operation} failed due to a network error: {message}")]
    NetworkFailure { operation: String, message: String },

    #[error("{operation} has returned an unexpected '{received}' response")]
    UnexpectedResponse { operation: String, received: String },

    #[error("value {value} does not fit into {field}")]
    ValueOutOfRange { field: &'static str, value: String },
}

fn reason_suffix(reason: &Option<String>) -> String {
    match reason {
        Some(reason) => format!(": {reason}"),
        None => String::new(),
    }
}

impl GatewayError {
    pub fn reverted<S: Into<String>>(operation: S, reason: Option<String>) -> Self {
        GatewayError::TransactionReverted {
            operation: operation.into(),
            reason,
        }
    }

    pub fn network_failure<S: Into<String>, M: ToString>(operation: S, message: M) -> Self {
        GatewayError::NetworkFailure {
            operation: operation.into(),
            message: message.to_string(),
        }
    }

    pub fn unexpected_response<S: Into<String>, R: Into<String>>(operation: S, received: R) -> Self {
        GatewayError::UnexpectedResponse {
            operation: operation.into(),
            received: received.into(),
        }
    }

    pub fn is_revert(&self) -> bool {
        matches!(self, GatewayError::TransactionReverted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revert_reason_is_included_in_message() {
        let with_reason = GatewayError::reverted(
            "RewardsContract::ApproveSubmission",
            Some("already approved".to_string()),
        );
        assert_eq!(
            with_reason.to_string(),
            "RewardsContract::ApproveSubmission got reverted by the contract: already approved"
        );

        let without_reason = GatewayError::reverted("RewardsContract::Pause", None);
        assert_eq!(
            without_reason.to_string(),
            "RewardsContract::Pause got reverted by the contract"
        );
    }

    #[test]
    fn missing_provider_message() {
        let err = ConnectionError::provider_unavailable(None, "no wallet endpoint configured");
        assert_eq!(
            err.to_string(),
            "no wallet provider is available: no wallet endpoint configured"
        );

        let err = ConnectionError::provider_unavailable(
            Some("http://127.0.0.1:1248/".to_string()),
            "connection refused",
        );
        assert_eq!(
            err.to_string(),
            "no wallet provider is available at http://127.0.0.1:1248/: connection refused"
        );
    }
}
