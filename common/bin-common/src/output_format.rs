// Copyright 2023 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;
use std::fmt::{Display, Formatter};

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug)]
pub struct OutputFormatError {
    source: serde_json::Error,
}

impl Display for OutputFormatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to serialise output: {}", self.source)
    }
}

impl std::error::Error for OutputFormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

impl OutputFormat {
    pub fn is_text(&self) -> bool {
        matches!(self, OutputFormat::Text)
    }

    /// Format the provided value either through its `Display` implementation or as pretty json.
    pub fn format<T: Serialize + ToString>(&self, data: &T) -> Result<String, OutputFormatError> {
        match self {
            OutputFormat::Text => Ok(data.to_string()),
            OutputFormat::Json => {
                serde_json::to_string_pretty(data).map_err(|source| OutputFormatError { source })
            }
        }
    }

    pub fn to_stdout<T: Serialize + ToString>(&self, data: &T) -> Result<(), OutputFormatError> {
        println!("{}", self.format(data)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Dummy {
        value: u32,
    }

    impl Display for Dummy {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            write!(f, "value: {}", self.value)
        }
    }

    #[test]
    fn text_and_json_formatting() {
        let dummy = Dummy { value: 42 };
        assert_eq!(OutputFormat::Text.format(&dummy).unwrap(), "value: 42");
        let json = OutputFormat::Json.format(&dummy).unwrap();
        assert!(json.contains("\"value\": 42"));
    }
}
