//! Error types for ledger domain validation.

use thiserror::Error;

/// Errors returned while constructing ledger domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerDomainError {
    /// The address bytes or text are not a valid 32-byte public key address.
    #[error("malformed address: {0}")]
    MalformedAddress(String),

    /// A whole-unit amount cannot be represented in micro units.
    #[error("amount of {0} ALGO overflows the micro-unit range")]
    AmountOverflow(u64),

    /// An atomic group must contain at least one transaction.
    #[error("transaction group must not be empty")]
    EmptyGroup,

    /// An atomic group exceeds the ledger's size limit.
    #[error("transaction group has {0} transactions, the ledger accepts at most {max}", max = super::MAX_GROUP_SIZE)]
    GroupTooLarge(usize),
}
