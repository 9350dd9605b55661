//! # Ledger Module
//!
//! The hash-linked chain itself.
//!
//! ## Architecture
//!
//! ```text
//! block.rs  : Block record, reference genesis, structural check
//! chain.rs  : Chain: generation, validation, append, replacement
//! error.rs  : ChainError / BlockRejection
//! shared.rs : SharedChain: Arc<RwLock<Chain>> for concurrent writers
//! ```
//!
//! ## Data Flow
//!
//! ```text
//! data ──► Chain::generate_next_block ──► candidate Block
//!                                             │
//!                     Chain::validate_block ◄─┘
//!                             │ ok
//!                             ▼
//!                 Chain::add_block_to_chain (append)
//! ```
//!
//! Generation and append are separate steps so a caller can inspect or drop
//! a candidate before committing it.

pub mod block;
pub mod chain;
pub mod error;
pub mod shared;

pub use block::Block;
pub use chain::Chain;
pub use error::{BlockRejection, ChainError};
pub use shared::SharedChain;
