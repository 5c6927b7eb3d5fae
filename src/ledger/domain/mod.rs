//! Domain model for ledger values.
//!
//! Ledger domain types are pure values: they never perform I/O and every
//! identifier they derive (addresses, transaction ids, group ids) is computed
//! locally from their canonical byte form.

mod address;
mod base32;
mod error;
mod hash;
mod ids;
mod msgpack;
mod params;
mod transaction;

pub use address::{ADDRESS_LEN, Address};
pub use error::LedgerDomainError;
pub use ids::{AppId, ContractRef, MicroAlgos};
pub use params::SuggestedParams;
pub use transaction::{
    GroupId, MAX_GROUP_SIZE, TransactionGroup, TransactionId, TransactionKind,
    UnsignedTransaction,
};
