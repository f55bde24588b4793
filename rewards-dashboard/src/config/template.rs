// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

// Note: any changes to the template must be reflected in the appropriate structs.
pub(crate) const CONFIG_TEMPLATE: &str = r#"
# This is a TOML config file.
# For more information, see https://github.com/toml-lang/toml

# Url of the json-rpc endpoint of the wallet holding your accounts.
# Without it, the dashboard can't connect to any account.
{{#if wallet_rpc }}wallet_rpc = '{{ wallet_rpc }}'{{else}}# wallet_rpc = 'http://127.0.0.1:8545'{{/if}}

# Address of the deployed rewards contract.
contract_address = '{{ contract_address }}'

[sync]
# Maximum number of submissions the contract returns in a single page.
page_size = {{ sync.page_size }}

# Number of blocks a transaction has to be buried under before it's considered confirmed.
confirmations = {{ sync.confirmations }}

# How often the chain is polled for transaction receipts and contract events.
event_poll_interval = '{{ sync.event_poll_interval }}'

[storage_paths]
# Path to the file holding the last connected account.
account_store = '{{ storage_paths.account_store }}'
"#;
