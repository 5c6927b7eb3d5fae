//! Ledger primitives and the ledger-query boundary.
//!
//! This module holds everything the bounty client needs to know about the
//! underlying ledger without talking to it directly:
//!
//! - Domain types in [`domain`]: addresses, amounts, network parameters and
//!   unsigned transactions with their canonical encoding
//! - Port contracts in [`ports`]: the [`ports::LedgerClient`] collaborator
//! - Adapter implementations in [`adapters`]: an in-memory ledger

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod tests;
