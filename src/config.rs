//! Contract metadata loaded from a deployment file.
//!
//! The deployment tooling writes a `contract.json` of the form
//! `{"appId": 1234, "appAddress": "...", "network": "testnet"}`. The ledger
//! endpoint may be added as `algodUrl` or overridden through the
//! [`ALGOD_URL_ENV`] environment variable.

use crate::ledger::domain::{Address, AppId, ContractRef};
use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8::Dir};
use serde::{Deserialize, Serialize};
use std::{io, sync::Arc};
use thiserror::Error;

/// Ledger endpoint used when neither the file nor the environment names one.
pub const DEFAULT_ALGOD_URL: &str = "https://testnet-api.algonode.cloud";

/// Environment variable overriding [`ContractConfig::algod_url`].
pub const ALGOD_URL_ENV: &str = "BOUNTY_BOARD_ALGOD_URL";

/// Errors raised while loading contract metadata.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read contract config {path}: {source}")]
    Read {
        /// Path that was requested.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },

    /// The file is not valid contract metadata.
    #[error("failed to parse contract config: {0}")]
    Parse(#[source] Arc<serde_json::Error>),

    /// The recorded address is not the one derived from the app id.
    #[error("app address {found} does not belong to app {app_id}, expected {expected}")]
    InvalidAddress {
        /// Configured application.
        app_id: AppId,
        /// Address derived from the application id.
        expected: Address,
        /// Address found in the file.
        found: Address,
    },
}

/// Deployed contract metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractConfig {
    /// Application identifier of the bounty contract.
    pub app_id: AppId,
    /// Escrow address of the application.
    pub app_address: Address,
    /// Network label, e.g. `testnet`.
    pub network: String,
    /// Ledger query endpoint.
    #[serde(default = "default_algod_url")]
    pub algod_url: String,
}

fn default_algod_url() -> String {
    DEFAULT_ALGOD_URL.to_owned()
}

impl ContractConfig {
    /// Parses and validates contract metadata from JSON text.
    ///
    /// Environment overrides are not applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or fields, and
    /// [`ConfigError::InvalidAddress`] when the address does not match the
    /// application id.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(text).map_err(|err| ConfigError::Parse(Arc::new(err)))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` and applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be opened, or the
    /// errors of [`Self::from_json`].
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let text = read_file(path).map_err(|err| ConfigError::Read {
            path: path.to_string(),
            source: Arc::new(err),
        })?;
        let config = Self::from_json(&text)?;
        tracing::debug!(path = %path, app_id = %config.app_id, "loaded contract config");
        Ok(config.with_algod_url_override(std::env::var(ALGOD_URL_ENV).ok()))
    }

    /// Replaces the endpoint with `url` when it is present and non-empty.
    #[must_use]
    pub fn with_algod_url_override(mut self, url: Option<String>) -> Self {
        if let Some(value) = url.filter(|candidate| !candidate.trim().is_empty()) {
            self.algod_url = value;
        }
        self
    }

    /// Returns the contract identity used by the services.
    #[must_use]
    pub const fn contract(&self) -> ContractRef {
        ContractRef {
            app_id: self.app_id,
            address: self.app_address,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let expected = self.app_id.address();
        if expected != self.app_address {
            return Err(ConfigError::InvalidAddress {
                app_id: self.app_id,
                expected,
                found: self.app_address,
            });
        }
        Ok(())
    }
}

fn read_file(path: &Utf8Path) -> io::Result<String> {
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "path does not name a file")
    })?;
    let parent = path
        .parent()
        .filter(|dir| !dir.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.read_to_string(file_name)
}
