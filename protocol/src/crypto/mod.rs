//! # Cryptographic Primitives
//!
//! Thin wrappers around `sha2`. The ledger needs exactly one primitive, a
//! 256-bit one-way hash, and this is where it lives.

pub mod hash;

pub use hash::{block_digest, is_hex_digest, sha256, sha256_hex, sha256_multi};
