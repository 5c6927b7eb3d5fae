//! In-memory ledger for service tests and local deterministic flows.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::ledger::{
    domain::{AppId, SuggestedParams},
    ports::{
        ApplicationInfo, GlobalStateEntry, LedgerClient, LedgerError, LedgerResult, TealValue,
    },
};

/// Thread-safe in-memory ledger.
///
/// Applications, their global state and boxes are plain maps. Individual
/// box reads can be made to fail with a transport error to exercise
/// degraded paths.
#[derive(Debug, Clone)]
pub struct InMemoryLedger {
    state: Arc<RwLock<InMemoryLedgerState>>,
}

#[derive(Debug)]
struct InMemoryLedgerState {
    params: SuggestedParams,
    applications: HashMap<AppId, InMemoryApplication>,
    failing_boxes: HashSet<(AppId, Vec<u8>)>,
    offline: bool,
    box_reads: u64,
}

#[derive(Debug, Default)]
struct InMemoryApplication {
    global_state: BTreeMap<Vec<u8>, TealValue>,
    boxes: HashMap<Vec<u8>, Vec<u8>>,
}

/// Transport failure raised by the in-memory ledger.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct SimulatedTransportError(String);

fn lock_poisoned(err: impl std::fmt::Display) -> LedgerError {
    LedgerError::transport(std::io::Error::other(err.to_string()))
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryLedger {
    /// Creates an empty ledger with local-network parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::with_params(SuggestedParams {
            fee: 0,
            min_fee: 1_000,
            flat_fee: false,
            first_valid: 1,
            last_valid: 1_001,
            genesis_id: "dockernet-v1".to_owned(),
            genesis_hash: [0x42; 32],
        })
    }

    /// Creates an empty ledger reporting the given network parameters.
    #[must_use]
    pub fn with_params(params: SuggestedParams) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryLedgerState {
                params,
                applications: HashMap::new(),
                failing_boxes: HashSet::new(),
                offline: false,
                box_reads: 0,
            })),
        }
    }

    fn write<T>(&self, apply: impl FnOnce(&mut InMemoryLedgerState) -> T) -> LedgerResult<T> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        Ok(apply(&mut state))
    }

    /// Registers an application with empty state.
    ///
    /// Existing applications are left untouched.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn create_application(&self, app_id: AppId) -> LedgerResult<()> {
        self.write(|state| {
            state.applications.entry(app_id).or_default();
        })
    }

    /// Sets an unsigned integer global state value, creating the application
    /// if needed.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn set_global_uint(&self, app_id: AppId, key: &[u8], value: u64) -> LedgerResult<()> {
        self.set_global(app_id, key, TealValue::Uint(value))
    }

    /// Sets a byte-string global state value, creating the application if
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn set_global_bytes(
        &self,
        app_id: AppId,
        key: &[u8],
        value: impl Into<Vec<u8>>,
    ) -> LedgerResult<()> {
        self.set_global(app_id, key, TealValue::Bytes(value.into()))
    }

    fn set_global(&self, app_id: AppId, key: &[u8], value: TealValue) -> LedgerResult<()> {
        self.write(|state| {
            state
                .applications
                .entry(app_id)
                .or_default()
                .global_state
                .insert(key.to_vec(), value);
        })
    }

    /// Writes a box value, creating the application if needed.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn put_box(&self, app_id: AppId, name: &[u8], value: Vec<u8>) -> LedgerResult<()> {
        self.write(|state| {
            state
                .applications
                .entry(app_id)
                .or_default()
                .boxes
                .insert(name.to_vec(), value);
        })
    }

    /// Makes every subsequent read of the named box fail with a transport
    /// error.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn fail_box_reads(&self, app_id: AppId, name: &[u8]) -> LedgerResult<()> {
        self.write(|state| {
            state.failing_boxes.insert((app_id, name.to_vec()));
        })
    }

    /// Toggles simulated loss of connectivity for every query.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn set_offline(&self, offline: bool) -> LedgerResult<()> {
        self.write(|state| state.offline = offline)
    }

    /// Returns how many box reads have been attempted.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn box_reads(&self) -> LedgerResult<u64> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.box_reads)
    }
}

fn ensure_online(state: &InMemoryLedgerState) -> LedgerResult<()> {
    if state.offline {
        return Err(LedgerError::transport(SimulatedTransportError(
            "ledger unreachable".to_owned(),
        )));
    }
    Ok(())
}

#[async_trait]
impl LedgerClient for InMemoryLedger {
    async fn suggested_params(&self) -> LedgerResult<SuggestedParams> {
        let state = self.state.read().map_err(lock_poisoned)?;
        ensure_online(&state)?;
        Ok(state.params.clone())
    }

    async fn application(&self, app_id: AppId) -> LedgerResult<ApplicationInfo> {
        let state = self.state.read().map_err(lock_poisoned)?;
        ensure_online(&state)?;
        let application = state
            .applications
            .get(&app_id)
            .ok_or(LedgerError::ApplicationNotFound(app_id))?;
        Ok(ApplicationInfo {
            app_id,
            address: app_id.address(),
            global_state: application
                .global_state
                .iter()
                .map(|(key, value)| GlobalStateEntry::new(key.clone(), value.clone()))
                .collect(),
        })
    }

    async fn application_box(&self, app_id: AppId, name: &[u8]) -> LedgerResult<Vec<u8>> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        state.box_reads += 1;
        ensure_online(&state)?;
        if state.failing_boxes.contains(&(app_id, name.to_vec())) {
            return Err(LedgerError::transport(SimulatedTransportError(format!(
                "box read failed for application {app_id}"
            ))));
        }
        state
            .applications
            .get(&app_id)
            .ok_or(LedgerError::ApplicationNotFound(app_id))?
            .boxes
            .get(name)
            .cloned()
            .ok_or_else(|| LedgerError::BoxNotFound {
                app_id,
                name: name.to_vec(),
            })
    }
}
