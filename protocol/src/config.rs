//! # Ledger Configuration & Constants
//!
//! Every fixed value the ledger depends on lives here. The genesis record in
//! particular is part of the chain's identity: change it and you are running
//! a different ledger.

// ---------------------------------------------------------------------------
// Versioning
// ---------------------------------------------------------------------------

/// Version of the block layout and digest preimage. Bump when either changes.
pub const LEDGER_FORMAT_VERSION: u16 = 1;

// ---------------------------------------------------------------------------
// Digest Parameters
// ---------------------------------------------------------------------------

/// Name of the block digest function, for logs and `version` output.
pub const DIGEST_ALGORITHM: &str = "SHA-256";

/// Digest length in bytes.
pub const HASH_OUTPUT_LENGTH: usize = 32;

/// Digest length once rendered as lowercase hex.
pub const HASH_HEX_LENGTH: usize = HASH_OUTPUT_LENGTH * 2;

// ---------------------------------------------------------------------------
// Genesis Record
// ---------------------------------------------------------------------------

/// Index of the genesis block.
pub const GENESIS_INDEX: u64 = 0;

/// Stored hash of the reference genesis block.
///
/// This value is fixed by the ledger format and trusted as is.
/// It is not the digest of the other genesis fields.
pub const GENESIS_HASH: &str = "816534932c2b7154836da6afc367695e6337db8a921823784c14378abed4f7d7";

/// The genesis block has no predecessor.
pub const GENESIS_PREVIOUS_HASH: &str = "";

/// 2016-06-05T19:25:05Z.
pub const GENESIS_TIMESTAMP: u64 = 1_465_154_705;

/// Payload of the genesis block.
pub const GENESIS_DATA: &str = "The Genesis Block";

// ---------------------------------------------------------------------------
// Driver Defaults
// ---------------------------------------------------------------------------

/// Payload used by the driver when no `--data` is given.
pub const DEFAULT_BLOCK_DATA: &str = "Test";
