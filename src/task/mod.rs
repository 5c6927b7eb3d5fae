//! Bounty task records and the contract actions that change them.
//!
//! Tasks live on-chain, one box per task id, with a global `task_counter`
//! holding the highest issued id. This module reads those boxes and shapes
//! the unsigned transactions for each contract action. It never signs,
//! submits or caches anything. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Orchestration services in [`services`], driven through the
//!   [`crate::ledger::ports::LedgerClient`] port

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
