// Copyright 2021 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use handlebars::{no_escape, Handlebars};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::{fs, io};
use tracing::{debug, warn};

pub const EDU_DIR: &str = ".edu-rewards";
pub const DEFAULT_CONFIG_DIR: &str = "config";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_CONFIG_FILENAME: &str = "config.toml";

/// Returns the home directory of the current user.
/// If it can't be determined, the current working directory is used instead.
#[cfg(feature = "dirs")]
pub fn get_home_dir() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home,
        None => {
            warn!("could not determine the home directory - falling back to the current directory");
            PathBuf::from(".")
        }
    }
}

pub trait EduConfigTemplate: Serialize {
    fn template(&self) -> &'static str;

    fn format_to_string(&self) -> io::Result<String> {
        let mut reg = Handlebars::new();
        reg.register_escape_fn(no_escape);
        reg.render_template(self.template(), &self)
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err))
    }

    fn format_to_writer<W: io::Write>(&self, writer: W) -> io::Result<()> {
        let mut reg = Handlebars::new();
        reg.register_escape_fn(no_escape);
        reg.render_template_to_write(self.template(), &self, writer)
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err))
    }
}

pub fn save_formatted_config_to_file<C, P>(config: &C, path: P) -> io::Result<()>
where
    C: EduConfigTemplate,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    debug!("saving config file to {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = fs::File::create(path)?;
    config.format_to_writer(file)
}

pub fn read_config_from_toml_file<C, P>(path: P) -> io::Result<C>
where
    C: DeserializeOwned,
    P: AsRef<Path>,
{
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}
