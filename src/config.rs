// Copyright 2025 Cowboy AI, LLC.

//! Builder configuration

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::WorkloadResult;

/// Authorization the generated prepare block requests from the signer
pub const DEFAULT_SIGNER_AUTHORIZATION: &str =
    "auth(Storage, Contracts, Keys, Inbox, Capabilities) &Account";

/// Configuration for the transaction builder and registry bootstrap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Number of spaces a tab expands to when normalizing fragments
    pub tab_width: usize,

    /// Indentation of fragment bodies inside the prepare and execute regions
    pub block_indentation: usize,

    /// Signer authorization of the prepare block
    pub signer_authorization: String,

    /// Optional initial-parameter override file loaded at startup
    pub initial_parameters_path: Option<PathBuf>,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            tab_width: 4,
            block_indentation: 12,
            signer_authorization: DEFAULT_SIGNER_AUTHORIZATION.to_string(),
            initial_parameters_path: None,
        }
    }
}

impl BuilderConfig {
    /// Read a configuration from a JSON file; missing fields take defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> WorkloadResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}
