//! Domain-separated SHA-512/256 hashing.

use sha2::{Digest, Sha512_256};

/// Hashes `body` prefixed with a domain-separation tag.
pub(crate) fn sha512_256(prefix: &[u8], body: &[u8]) -> [u8; 32] {
    let mut hasher = Sha512_256::new();
    hasher.update(prefix);
    hasher.update(body);
    hasher.finalize().into()
}
