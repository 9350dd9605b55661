//! # Block Structure
//!
//! A block is one immutable ledger entry. It carries its position in the
//! chain, a link to its predecessor, a creation time, an opaque payload, and
//! the digest binding those four fields together.
//!
//! ## Block Layout
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │  index: u64             (0 = genesis)                │
//! │  hash: String           (SHA-256 hex of the below)   │
//! │  previous_hash: String  (empty only for genesis)     │
//! │  timestamp: u64         (seconds since Unix epoch)   │
//! │  data: String           (opaque payload)             │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! A block judges nothing about its neighbours. The only thing it can check
//! on its own is structural validity: does `hash` match its own fields?
//! Linkage is the chain's business.

use serde::{Deserialize, Serialize};

use crate::config::{
    GENESIS_DATA, GENESIS_HASH, GENESIS_INDEX, GENESIS_PREVIOUS_HASH, GENESIS_TIMESTAMP,
};
use crate::crypto::hash::block_digest;

/// A single ledger entry.
///
/// Fields are public for reading, but nothing in the crate mutates a block
/// after construction. Serialized with camelCase keys so JSON output lines up
/// with chains produced by other implementations of the same format.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Position in the chain. Genesis is 0.
    pub index: u64,
    /// Lowercase hex SHA-256 of `(index, previous_hash, timestamp, data)`.
    pub hash: String,
    /// Hash of the preceding block. Empty for genesis.
    pub previous_hash: String,
    /// Creation time in seconds since the Unix epoch.
    pub timestamp: u64,
    /// Opaque payload.
    pub data: String,
}

impl Block {
    /// Construct a block from caller-supplied fields.
    ///
    /// Nothing is computed or checked here. Values are accepted as given and
    /// judged later by [`Chain`](super::chain::Chain).
    pub fn new(
        index: u64,
        hash: impl Into<String>,
        previous_hash: impl Into<String>,
        timestamp: u64,
        data: impl Into<String>,
    ) -> Self {
        Block {
            index,
            hash: hash.into(),
            previous_hash: previous_hash.into(),
            timestamp,
            data: data.into(),
        }
    }

    /// The reference genesis block.
    ///
    /// Its stored hash is a fixed constant, not the digest of its fields, so
    /// [`has_valid_structure`](Self::has_valid_structure) returns `false` for
    /// it. That is fine: genesis enters the chain through the trusted path.
    pub fn genesis() -> Self {
        Block::new(
            GENESIS_INDEX,
            GENESIS_HASH,
            GENESIS_PREVIOUS_HASH,
            GENESIS_TIMESTAMP,
            GENESIS_DATA,
        )
    }

    /// Recompute the digest from this block's own four input fields.
    pub fn compute_hash(&self) -> String {
        block_digest(self.index, &self.previous_hash, self.timestamp, &self.data)
    }

    /// Structural validity: the stored hash equals the recomputed digest.
    pub fn has_valid_structure(&self) -> bool {
        self.hash == self.compute_hash()
    }

    /// Whether this block sits at the genesis position.
    pub fn is_genesis(&self) -> bool {
        self.index == GENESIS_INDEX
    }
}
