//! Thread-safe chain handle.
//!
//! A [`Chain`] on its own is single-owner. When several callers propose
//! blocks, reading the tip, computing the candidate and appending it must
//! happen as one step, or two candidates can be built on the same tip.
//! [`SharedChain::propose`] does all three under one write lock.
//!
//! Readers take the read lock and may run concurrently with each other.

use std::sync::Arc;

use parking_lot::RwLock;

use super::block::Block;
use super::chain::Chain;
use super::error::ChainError;

/// Cloneable handle to a chain shared between threads.
#[derive(Debug, Clone, Default)]
pub struct SharedChain {
    inner: Arc<RwLock<Chain>>,
}

impl SharedChain {
    /// Wraps an existing chain.
    pub fn new(chain: Chain) -> Self {
        Self {
            inner: Arc::new(RwLock::new(chain)),
        }
    }

    /// Seeds the chain with its genesis block.
    pub fn add_genesis_block(&self, block: Block) -> Result<(), ChainError> {
        self.inner.write().add_genesis_block(block)
    }

    /// Generates a block carrying `data` on the current tip and appends it,
    /// atomically with respect to every other writer.
    ///
    /// Returns the appended block.
    pub fn propose(&self, data: impl Into<String>) -> Result<Block, ChainError> {
        let mut chain = self.inner.write();
        let block = chain.generate_next_block(data)?;
        chain.add_block_to_chain(block.clone())?;
        Ok(block)
    }

    /// Appends an externally built block after validating it against the tip.
    pub fn add_block(&self, block: Block) -> Result<(), ChainError> {
        self.inner.write().add_block_to_chain(block)
    }

    /// See [`Chain::replace_chain`].
    pub fn replace_chain(&self, blocks: Vec<Block>) -> Result<(), ChainError> {
        self.inner.write().replace_chain(blocks)
    }

    /// A copy of the current tip.
    pub fn latest_block(&self) -> Result<Block, ChainError> {
        self.inner.read().latest_block().cloned()
    }

    /// A copy of every block, genesis first.
    pub fn snapshot(&self) -> Vec<Block> {
        self.inner.read().blocks().to_vec()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Runs `f` with shared read access to the chain.
    pub fn with_chain<R>(&self, f: impl FnOnce(&Chain) -> R) -> R {
        f(&self.inner.read())
    }
}
