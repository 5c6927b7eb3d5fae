//! Fixed-width public-key addresses.

use super::{LedgerDomainError, base32, hash::sha512_256};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Width of an address in bytes.
pub const ADDRESS_LEN: usize = 32;

const CHECKSUM_LEN: usize = 4;
const ENCODED_LEN: usize = 58;

/// A 32-byte public-key address.
///
/// The textual form is the unpadded base32 encoding of the key followed by
/// the last four bytes of its SHA-512/256 digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// The all-zero address, used on-chain as the "nobody" sentinel.
    pub const ZERO: Self = Self([0; ADDRESS_LEN]);

    /// Wraps raw public key bytes.
    #[must_use]
    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Decodes an address from a byte slice.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerDomainError::MalformedAddress`] when the slice is not
    /// exactly [`ADDRESS_LEN`] bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LedgerDomainError> {
        let key = <[u8; ADDRESS_LEN]>::try_from(bytes).map_err(|_| {
            LedgerDomainError::MalformedAddress(format!(
                "expected {ADDRESS_LEN} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(key))
    }

    /// Returns the raw public key bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Returns the raw public key bytes by value.
    #[must_use]
    pub const fn to_bytes(self) -> [u8; ADDRESS_LEN] {
        self.0
    }

    /// Returns `true` for the all-zero sentinel address.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    fn checksum(&self) -> [u8; CHECKSUM_LEN] {
        let [.., a, b, c, d] = sha512_256(&[], &self.0);
        [a, b, c, d]
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut raw = Vec::with_capacity(ADDRESS_LEN + CHECKSUM_LEN);
        raw.extend_from_slice(&self.0);
        raw.extend_from_slice(&self.checksum());
        f.write_str(&base32::encode(&raw))
    }
}

impl FromStr for Address {
    type Err = LedgerDomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let malformed =
            |reason: &str| LedgerDomainError::MalformedAddress(format!("{value}: {reason}"));

        if value.len() != ENCODED_LEN {
            return Err(malformed("expected 58 base32 characters"));
        }
        let raw = base32::decode(value).ok_or_else(|| malformed("invalid base32"))?;
        let Some((key, checksum)) = raw.split_first_chunk::<ADDRESS_LEN>() else {
            return Err(malformed("decoded key is too short"));
        };

        let address = Self(*key);
        if checksum != address.checksum().as_slice() {
            return Err(malformed("checksum mismatch"));
        }
        Ok(address)
    }
}

impl TryFrom<String> for Address {
    type Error = LedgerDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.to_string()
    }
}
