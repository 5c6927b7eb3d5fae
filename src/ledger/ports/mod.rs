//! Port contracts for ledger access.
//!
//! Ports define infrastructure-agnostic interfaces used by bounty services.

pub mod client;

pub use client::{
    ApplicationInfo, GlobalStateEntry, LedgerClient, LedgerError, LedgerResult, TealValue,
};
