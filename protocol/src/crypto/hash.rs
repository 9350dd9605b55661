//! # Hashing Utilities
//!
//! One hash function, used everywhere: **SHA-256**.
//!
//! linkchain has to produce the exact same block hashes as the ledgers it
//! interoperates with, and those chose SHA-256 over a plain string
//! concatenation of the block fields. So that is what we do, bit for bit.
//!
//! ## Block digest preimage
//!
//! ```text
//! decimal(index) || previous_hash || decimal(timestamp) || data
//! ```
//!
//! No separators, no length prefixes. The hex digest is lowercase.
//! Yes, `("1", "2…")` and `("12", "…")` collide on the preimage level. That is
//! the format; changing it would orphan every existing chain.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 hash of the input data.
///
/// # Example
///
/// ```
/// use linkchain::crypto::sha256;
///
/// let hash = sha256(b"linkchain");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute SHA-256 over several byte slices as if they were concatenated.
///
/// Avoids building the preimage in a temporary buffer.
pub fn sha256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Compute SHA-256 and render it as lowercase hex.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// The canonical block digest.
///
/// Hashes `index`, `previous_hash`, `timestamp` and `data` in that fixed
/// order and returns 64 lowercase hex characters.
pub fn block_digest(index: u64, previous_hash: &str, timestamp: u64, data: &str) -> String {
    let index = index.to_string();
    let timestamp = timestamp.to_string();
    hex::encode(sha256_multi(&[
        index.as_bytes(),
        previous_hash.as_bytes(),
        timestamp.as_bytes(),
        data.as_bytes(),
    ]))
}

/// Returns `true` if `s` looks like a rendered digest: 64 lowercase hex chars.
pub fn is_hex_digest(s: &str) -> bool {
    s.len() == crate::config::HASH_HEX_LENGTH
        && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
