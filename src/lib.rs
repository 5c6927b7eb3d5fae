//! Bounty board: client library for an on-chain bounty escrow contract.
//!
//! Clients fund tasks into the contract's escrow, freelancers claim them and
//! submit work, and the client approves, rejects or reclaims the bounty.
//! Every task is stored in an application box keyed by its id. This crate
//! decodes those boxes and builds the unsigned transactions for each action;
//! signing and submission belong to the caller's wallet.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure types and codecs with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for ledger access
//! - **Adapters**: Concrete implementations of ports (in-memory ledger)
//!
//! # Modules
//!
//! - [`config`]: Deployed contract metadata
//! - [`ledger`]: Addresses, amounts, unsigned transactions and the ledger port
//! - [`task`]: Task records, status transitions, repository and builder

pub mod config;
pub mod ledger;
pub mod task;
