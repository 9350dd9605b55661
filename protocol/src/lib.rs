// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # linkchain Core Library
//!
//! A minimal hash-linked ledger. Blocks are immutable records, each bound to
//! its predecessor by a SHA-256 digest, and the chain refuses any block that
//! breaks index continuity, linkage, or its own digest.
//!
//! ## Architecture
//!
//! - **crypto**: SHA-256 helpers and the canonical block digest.
//! - **ledger**: `Block`, `Chain`, typed errors, and a thread-safe handle.
//! - **consensus**: the fork-choice seam used by chain replacement.
//! - **config**: the genesis record and other fixed values.
//!
//! ## Usage
//!
//! ```
//! use linkchain::ledger::{Block, Chain};
//!
//! let mut chain = Chain::new();
//! chain.add_genesis_block(Block::genesis())?;
//!
//! let block = chain.generate_next_block("Test")?;
//! chain.add_block_to_chain(block)?;
//!
//! assert_eq!(chain.blocks().len(), 2);
//! # Ok::<(), linkchain::ledger::ChainError>(())
//! ```

pub mod config;
pub mod consensus;
pub mod crypto;
pub mod ledger;

pub use ledger::{Block, BlockRejection, Chain, ChainError, SharedChain};
