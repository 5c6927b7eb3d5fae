//! Network parameters needed to build transactions.

use super::MicroAlgos;
use serde::{Deserialize, Serialize};

/// Bytes a signature adds to an encoded transaction: the `sig` and `txn`
/// keys, a 64-byte binary value and the enclosing map header.
const SIGNATURE_OVERHEAD: u64 = 75;

/// Current network parameters as suggested by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedParams {
    /// Fee per byte, or the total fee when `flat_fee` is set.
    pub fee: u64,
    /// Minimum fee accepted by the network.
    pub min_fee: u64,
    /// Treat `fee` as the total fee instead of a per-byte rate.
    pub flat_fee: bool,
    /// First round the transaction is valid in.
    pub first_valid: u64,
    /// Last round the transaction is valid in.
    pub last_valid: u64,
    /// Human-readable network identifier.
    pub genesis_id: String,
    /// Hash of the genesis block.
    pub genesis_hash: [u8; 32],
}

impl SuggestedParams {
    /// Computes the fee for a transaction whose unsigned encoding is
    /// `unsigned_len` bytes long.
    #[must_use]
    pub fn fee_for(&self, unsigned_len: usize) -> MicroAlgos {
        if self.flat_fee {
            return MicroAlgos::new(self.fee);
        }
        let size = u64::try_from(unsigned_len)
            .unwrap_or(u64::MAX)
            .saturating_add(SIGNATURE_OVERHEAD);
        MicroAlgos::new(self.fee.saturating_mul(size).max(self.min_fee))
    }
}
