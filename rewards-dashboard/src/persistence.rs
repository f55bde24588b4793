// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use edu_rewards_client::AccountStore;
use edu_rewards_contract_common::Address;
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const ACCOUNT_KEY: &str = "account";

/// Small json key-value file holding the last connected account.
/// Entries never expire.
pub struct FileAccountStore {
    path: PathBuf,
}

impl FileAccountStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        FileAccountStore {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> io::Result<Map<String, Value>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(err) => return Err(err),
        };
        serde_json::from_str(&content).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
    }
}

impl AccountStore for FileAccountStore {
    fn load_account(&self) -> Option<Address> {
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(err) => {
                warn!(
                    "failed to read the account store at '{}': {err}",
                    self.path.display()
                );
                return None;
            }
        };

        let value = entries.remove(ACCOUNT_KEY)?;
        serde_json::from_value(value)
            .inspect_err(|err| debug!("the stored account is malformed: {err}"))
            .ok()
    }

    fn store_account(&self, account: Address) -> io::Result<()> {
        // a corrupted file gets replaced rather than blocking the connection
        let mut entries = self.read_entries().unwrap_or_default();
        let value = serde_json::to_value(account)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        entries.insert(ACCOUNT_KEY.to_string(), value);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&entries)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        fs::write(&self.path, content)?;

        debug!("stored {account:?} at '{}'", self.path.display());
        Ok(())
    }
}
