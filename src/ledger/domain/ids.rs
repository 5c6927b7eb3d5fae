//! Identifier and amount types for ledger values.

use super::{Address, LedgerDomainError, hash::sha512_256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric identifier of a deployed application (smart contract).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppId(u64);

impl AppId {
    /// Wraps a raw application identifier.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Derives the escrow address controlled by the application.
    #[must_use]
    pub fn address(self) -> Address {
        Address::new(sha512_256(b"appID", &self.0.to_be_bytes()))
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Amount in the smallest currency unit (micro-ALGO).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MicroAlgos(u64);

impl MicroAlgos {
    /// Number of micro units in one whole ALGO.
    pub const PER_ALGO: u64 = 1_000_000;

    /// Wraps a micro-unit amount.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Converts a whole-unit amount to micro units.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerDomainError::AmountOverflow`] when the product does not
    /// fit in 64 bits.
    pub const fn from_algos(algos: u64) -> Result<Self, LedgerDomainError> {
        match algos.checked_mul(Self::PER_ALGO) {
            Some(value) => Ok(Self(value)),
            None => Err(LedgerDomainError::AmountOverflow(algos)),
        }
    }

    /// Returns the underlying micro-unit value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Returns `true` for a zero amount.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Converts to whole units for display.
    ///
    /// Amounts above 2^53 micro units lose precision.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        clippy::float_arithmetic,
        reason = "display conversion accepts precision loss for very large amounts"
    )]
    pub const fn as_algos(self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }
}

impl fmt::Display for MicroAlgos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} microALGO", self.0)
    }
}

/// Identity of the bounty contract: its application id and escrow address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContractRef {
    /// Application identifier used for contract calls and box reads.
    pub app_id: AppId,
    /// Escrow address receiving bounty payments.
    pub address: Address,
}

impl ContractRef {
    /// Builds a reference whose address is derived from the application id.
    #[must_use]
    pub fn from_app_id(app_id: AppId) -> Self {
        Self {
            app_id,
            address: app_id.address(),
        }
    }
}
