//! Ledger-query port: network parameters, application metadata and boxes.

use crate::ledger::domain::{Address, AppId, SuggestedParams};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for ledger queries.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Read-only ledger query contract.
///
/// Implementations own transport concerns: endpoints, retries, timeouts and
/// the wire encoding of keys. Cancellation or timeout must surface as
/// [`LedgerError::Transport`].
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Fetches the current network parameters.
    async fn suggested_params(&self) -> LedgerResult<SuggestedParams>;

    /// Reads an application's metadata and global state.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ApplicationNotFound`] when no application has
    /// the given id.
    async fn application(&self, app_id: AppId) -> LedgerResult<ApplicationInfo>;

    /// Reads the raw value of an application box by name.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::BoxNotFound`] when the box does not exist.
    async fn application_box(&self, app_id: AppId, name: &[u8]) -> LedgerResult<Vec<u8>>;
}

/// Application metadata returned by [`LedgerClient::application`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationInfo {
    /// Application identifier.
    pub app_id: AppId,
    /// Escrow address controlled by the application.
    pub address: Address,
    /// Global key/value state.
    pub global_state: Vec<GlobalStateEntry>,
}

impl ApplicationInfo {
    /// Looks up a global state value by exact raw key.
    #[must_use]
    pub fn global(&self, key: &[u8]) -> Option<&TealValue> {
        self.global_state
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| &entry.value)
    }
}

/// One global state entry.
///
/// Keys are raw bytes. Query APIs usually transmit them base64-encoded; the
/// adapter decodes them before they reach this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalStateEntry {
    /// Raw state key.
    pub key: Vec<u8>,
    /// Stored value.
    pub value: TealValue,
}

impl GlobalStateEntry {
    /// Creates a state entry.
    #[must_use]
    pub fn new(key: impl Into<Vec<u8>>, value: TealValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// A contract state value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TealValue {
    /// Unsigned 64-bit integer.
    Uint(u64),
    /// Byte string.
    Bytes(Vec<u8>),
}

/// Errors returned by ledger adapters.
#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    /// The application does not exist.
    #[error("application {0} not found")]
    ApplicationNotFound(AppId),

    /// The box does not exist.
    #[error("box {name:?} not found for application {app_id}")]
    BoxNotFound {
        /// Application owning the box.
        app_id: AppId,
        /// Requested box name.
        name: Vec<u8>,
    },

    /// Network or query failure, including cancellation and timeouts.
    #[error("ledger transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl LedgerError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }

    /// Returns `true` when the error reports a missing application or box.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ApplicationNotFound(_) | Self::BoxNotFound { .. }
        )
    }
}
