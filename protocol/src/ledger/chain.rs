//! In-memory chain management with validation.
//!
//! [`Chain`] owns an ordered, append-only `Vec<Block>`. After every
//! successful append, for every `i > 0`:
//!
//! ```text
//! blocks[i].index         == blocks[i-1].index + 1
//! blocks[i].previous_hash == blocks[i-1].hash
//! blocks[i].hash          == digest(index, previous_hash, timestamp, data)
//! ```
//!
//! and `blocks[0]` is the genesis block, inserted once through the trusted
//! [`Chain::add_genesis_block`] path.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;

use super::block::Block;
use super::error::{BlockRejection, ChainError};
use crate::config::GENESIS_INDEX;
use crate::consensus::ForkChoice;
use crate::crypto::hash::block_digest;

/// Ordered chain of validated blocks.
#[derive(Clone, Default)]
pub struct Chain {
    blocks: Vec<Block>,
    /// Rule consulted by `replace_chain`. `None` means replacement is disabled.
    fork_choice: Option<Arc<dyn ForkChoice>>,
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("blocks", &self.blocks)
            .field("fork_choice", &self.fork_choice.as_ref().map(|r| r.name()))
            .finish()
    }
}

impl Chain {
    /// Creates an empty chain with no fork-choice rule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a fork-choice rule, enabling [`replace_chain`](Self::replace_chain).
    pub fn with_fork_choice(mut self, rule: impl ForkChoice + 'static) -> Self {
        self.fork_choice = Some(Arc::new(rule));
        self
    }

    /// Rebuilds a chain from an ordered block sequence.
    ///
    /// The sequence is validated with [`validate_blocks`](Self::validate_blocks)
    /// first; its first block is trusted as genesis.
    pub fn from_blocks(blocks: Vec<Block>) -> Result<Self, ChainError> {
        Self::validate_blocks(&blocks)?;
        Ok(Chain {
            blocks,
            fork_choice: None,
        })
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// All blocks, genesis first.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Number of blocks, genesis included.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// `true` until a genesis block is added.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Block at `index`, if the chain is that long.
    pub fn block(&self, index: u64) -> Option<&Block> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.blocks.get(i))
    }

    /// The tip of the chain.
    ///
    /// # Errors
    ///
    /// [`ChainError::EmptyChain`] before a genesis block exists.
    pub fn latest_block(&self) -> Result<&Block, ChainError> {
        self.blocks.last().ok_or(ChainError::EmptyChain)
    }

    /// Index the next block must carry.
    ///
    /// # Errors
    ///
    /// [`ChainError::EmptyChain`] before a genesis block exists, and
    /// [`ChainError::IndexOverflow`] once the tip sits at `u64::MAX`.
    pub fn next_index(&self) -> Result<u64, ChainError> {
        let tip = self.latest_block()?;
        tip.index
            .checked_add(1)
            .ok_or(ChainError::IndexOverflow { index: tip.index })
    }

    // -----------------------------------------------------------------------
    // Block creation
    // -----------------------------------------------------------------------

    /// Digest of a block's four input fields, in the fixed order
    /// `index, previous_hash, timestamp, data`.
    pub fn calculate_block_hash(
        index: u64,
        previous_hash: &str,
        timestamp: u64,
        data: &str,
    ) -> String {
        block_digest(index, previous_hash, timestamp, data)
    }

    /// Builds the next block on top of the current tip, stamped with the
    /// current wall-clock time. The block is NOT appended.
    pub fn generate_next_block(&self, data: impl Into<String>) -> Result<Block, ChainError> {
        self.generate_next_block_at(data, current_timestamp())
    }

    /// Same as [`generate_next_block`](Self::generate_next_block) with an
    /// explicit timestamp.
    pub fn generate_next_block_at(
        &self,
        data: impl Into<String>,
        timestamp: u64,
    ) -> Result<Block, ChainError> {
        let index = self.next_index()?;
        let tip = self.latest_block()?;
        let previous_hash = tip.hash.clone();
        let data = data.into();
        let hash = Self::calculate_block_hash(index, &previous_hash, timestamp, &data);

        Ok(Block::new(index, hash, previous_hash, timestamp, data))
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    /// Checks `block` against the current tip and reports the first failed
    /// check. See [`BlockRejection`] for the order.
    pub fn validate_block(&self, block: &Block) -> Result<(), BlockRejection> {
        let tip = self.blocks.last().ok_or(BlockRejection::NoTip)?;
        validate_successor(tip, block)
    }

    /// `true` if `block` may be appended to the current tip.
    pub fn is_block_valid(&self, block: &Block) -> bool {
        self.validate_block(block).is_ok()
    }

    /// Validates a whole block sequence.
    ///
    /// The first block must be at the genesis index; its hash is trusted, the
    /// same way [`add_genesis_block`](Self::add_genesis_block) trusts it.
    /// Every following block must be a valid successor of the one before.
    pub fn validate_blocks(blocks: &[Block]) -> Result<(), ChainError> {
        let first = blocks.first().ok_or(ChainError::EmptyChain)?;
        if !first.is_genesis() {
            return Err(ChainError::InvalidCandidate {
                index: 0,
                reason: BlockRejection::IndexMismatch {
                    expected: GENESIS_INDEX,
                    got: first.index,
                },
            });
        }

        for (i, pair) in blocks.windows(2).enumerate() {
            validate_successor(&pair[0], &pair[1])
                .map_err(|reason| ChainError::InvalidCandidate { index: i + 1, reason })?;
        }
        Ok(())
    }

    /// `true` if the chain is non-empty and every invariant holds.
    pub fn is_valid(&self) -> bool {
        Self::validate_blocks(&self.blocks).is_ok()
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Seeds an empty chain with its genesis block. No validation is done.
    ///
    /// # Errors
    ///
    /// [`ChainError::GenesisAlreadySet`] if the chain already has blocks.
    pub fn add_genesis_block(&mut self, block: Block) -> Result<(), ChainError> {
        if !self.blocks.is_empty() {
            return Err(ChainError::GenesisAlreadySet);
        }
        tracing::debug!(index = block.index, hash = %block.hash, "genesis block set");
        self.blocks.push(block);
        Ok(())
    }

    /// Appends `block` if it is a valid successor of the tip.
    ///
    /// Either the block is appended or the chain is left exactly as it was.
    pub fn add_block_to_chain(&mut self, block: Block) -> Result<(), ChainError> {
        if self.blocks.is_empty() {
            return Err(ChainError::EmptyChain);
        }
        if let Err(reason) = self.validate_block(&block) {
            tracing::warn!(index = block.index, %reason, "block rejected");
            return Err(ChainError::InvalidBlock(reason));
        }

        tracing::debug!(index = block.index, hash = %block.hash, "block appended");
        self.blocks.push(block);
        Ok(())
    }

    /// Replaces the whole sequence with `blocks`, if the configured
    /// fork-choice rule prefers it.
    ///
    /// The candidate is validated end to end before the rule sees it, and
    /// must start from the same genesis block as the local chain. An empty
    /// local chain adopts any valid candidate.
    ///
    /// # Errors
    ///
    /// - [`ChainError::UnimplementedConsensus`] when no rule is installed.
    /// - [`ChainError::InvalidCandidate`] / [`ChainError::EmptyChain`] when the
    ///   candidate does not validate or its genesis differs from ours
    ///   ([`BlockRejection::GenesisMismatch`]).
    /// - [`ChainError::CandidateRejected`] when the rule keeps the current chain.
    pub fn replace_chain(&mut self, blocks: Vec<Block>) -> Result<(), ChainError> {
        let rule = self
            .fork_choice
            .clone()
            .ok_or(ChainError::UnimplementedConsensus)?;

        Self::validate_blocks(&blocks)?;

        if let (Some(local), Some(candidate)) = (self.blocks.first(), blocks.first()) {
            if local != candidate {
                tracing::warn!(
                    local = %local.hash,
                    candidate = %candidate.hash,
                    "candidate chain has a foreign genesis"
                );
                return Err(ChainError::InvalidCandidate {
                    index: 0,
                    reason: BlockRejection::GenesisMismatch {
                        expected: local.hash.clone(),
                        got: candidate.hash.clone(),
                    },
                });
            }
        }

        if !self.blocks.is_empty() && !rule.prefers(&self.blocks, &blocks) {
            return Err(ChainError::CandidateRejected {
                rule: rule.name(),
                current: self.blocks.len(),
                candidate: blocks.len(),
            });
        }

        tracing::info!(
            rule = rule.name(),
            from = self.blocks.len(),
            to = blocks.len(),
            "chain replaced"
        );
        self.blocks = blocks;
        Ok(())
    }
}

/// The four successor checks, in order.
fn validate_successor(previous: &Block, block: &Block) -> Result<(), BlockRejection> {
    // 1. Structure.
    if !block.has_valid_structure() {
        return Err(BlockRejection::MalformedStructure { index: block.index });
    }

    // 2. Index continuity.
    let expected = previous
        .index
        .checked_add(1)
        .ok_or(BlockRejection::IndexOverflow {
            index: previous.index,
        })?;
    if block.index != expected {
        return Err(BlockRejection::IndexMismatch {
            expected,
            got: block.index,
        });
    }

    // 3. Linkage.
    if block.previous_hash != previous.hash {
        return Err(BlockRejection::PreviousHashMismatch {
            expected: previous.hash.clone(),
            got: block.previous_hash.clone(),
        });
    }

    // 4. Chain-computed digest. Same digest as check 1; kept so the check
    //    order stays fixed.
    let computed = Chain::calculate_block_hash(
        block.index,
        &block.previous_hash,
        block.timestamp,
        &block.data,
    );
    if block.hash != computed {
        return Err(BlockRejection::HashMismatch {
            expected: computed,
            got: block.hash.clone(),
        });
    }

    Ok(())
}

/// Wall-clock seconds since the Unix epoch. Clamped at 0 for clocks set
/// before 1970.
fn current_timestamp() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GENESIS_HASH;
    use crate::consensus::LongestChain;

    const T0: u64 = 1_700_000_000;

    fn seeded() -> Chain {
        let mut chain = Chain::new();
        chain.add_genesis_block(Block::genesis()).unwrap();
        chain
    }

    fn extend(chain: &mut Chain, n: usize) {
        for i in 0..n {
            let block = chain
                .generate_next_block_at(format!("block {}", i), T0 + i as u64)
                .unwrap();
            chain.add_block_to_chain(block).unwrap();
        }
    }

    fn sealed(index: u64, previous_hash: &str, timestamp: u64, data: &str) -> Block {
        let hash = Chain::calculate_block_hash(index, previous_hash, timestamp, data);
        Block::new(index, hash, previous_hash, timestamp, data)
    }

    // -- empty chain ---------------------------------------------------------

    #[test]
    fn empty_chain_has_no_tip() {
        let chain = Chain::new();
        assert!(chain.is_empty());
        assert_eq!(chain.latest_block(), Err(ChainError::EmptyChain));
        assert_eq!(chain.next_index(), Err(ChainError::EmptyChain));
        assert_eq!(chain.generate_next_block("x"), Err(ChainError::EmptyChain));
    }

    #[test]
    fn empty_chain_rejects_append() {
        let mut chain = Chain::new();
        let block = sealed(1, GENESIS_HASH, T0, "x");
        assert!(!chain.is_block_valid(&block));
        assert_eq!(chain.validate_block(&block), Err(BlockRejection::NoTip));
        assert_eq!(chain.add_block_to_chain(block), Err(ChainError::EmptyChain));
        assert!(chain.is_empty());
    }

    // -- genesis -------------------------------------------------------------

    #[test]
    fn genesis_is_accepted_without_validation() {
        let chain = seeded();
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.latest_block().unwrap(), &Block::genesis());
        assert_eq!(chain.next_index(), Ok(1));
    }

    #[test]
    fn genesis_can_only_be_set_once() {
        let mut chain = seeded();
        let err = chain.add_genesis_block(Block::genesis()).unwrap_err();
        assert_eq!(err, ChainError::GenesisAlreadySet);
        assert_eq!(chain.len(), 1);
    }

    // -- generate + append ---------------------------------------------------

    #[test]
    fn generate_next_block_links_to_tip() {
        let chain = seeded();
        let block = chain.generate_next_block("Test").unwrap();

        assert_eq!(block.index, 1);
        assert_eq!(block.previous_hash, GENESIS_HASH);
        assert_eq!(block.data, "Test");
        assert_eq!(
            block.hash,
            Chain::calculate_block_hash(1, GENESIS_HASH, block.timestamp, "Test")
        );
        // Generating does not append.
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn generated_block_is_appended() {
        let mut chain = seeded();
        let block = chain.generate_next_block("Test").unwrap();
        chain.add_block_to_chain(block.clone()).unwrap();

        assert_eq!(chain.len(), 2);
        assert_eq!(chain.latest_block().unwrap(), &block);
        assert_eq!(chain.block(1), Some(&block));
        assert_eq!(chain.block(2), None);
    }

    #[test]
    fn generated_hash_matches_known_digest() {
        let chain = seeded();
        let block = chain.generate_next_block_at("Test", 1_465_154_800).unwrap();
        assert_eq!(
            block.hash,
            "1c074ed173cd61b1a0d6d9e3a8e1a7aa9ceb7047637629cc135b24df1f2d8f12"
        );
    }

    #[test]
    fn invariants_hold_after_many_appends() {
        let mut chain = seeded();
        extend(&mut chain, 25);

        assert_eq!(chain.len(), 26);
        assert!(chain.is_valid());
        for pair in chain.blocks().windows(2) {
            assert_eq!(pair[1].index, pair[0].index + 1);
            assert_eq!(pair[1].previous_hash, pair[0].hash);
            assert_eq!(
                pair[1].hash,
                Chain::calculate_block_hash(
                    pair[1].index,
                    &pair[1].previous_hash,
                    pair[1].timestamp,
                    &pair[1].data
                )
            );
        }
    }

    // -- rejection -----------------------------------------------------------

    #[test]
    fn tampered_data_is_rejected() {
        let mut chain = seeded();
        let mut block = chain.generate_next_block_at("Test", T0).unwrap();
        block.data = "Tampered".to_string();

        assert!(!chain.is_block_valid(&block));
        assert_eq!(
            chain.add_block_to_chain(block),
            Err(ChainError::InvalidBlock(BlockRejection::MalformedStructure {
                index: 1
            }))
        );
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn skipped_index_is_rejected() {
        let mut chain = seeded();
        let block = sealed(2, GENESIS_HASH, T0, "skip");

        assert_eq!(
            chain.add_block_to_chain(block),
            Err(ChainError::InvalidBlock(BlockRejection::IndexMismatch {
                expected: 1,
                got: 2
            }))
        );
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn duplicate_index_is_rejected() {
        let mut chain = seeded();
        let block = chain.generate_next_block_at("once", T0).unwrap();
        chain.add_block_to_chain(block.clone()).unwrap();

        let err = chain.add_block_to_chain(block).unwrap_err();
        assert_eq!(
            err,
            ChainError::InvalidBlock(BlockRejection::IndexMismatch {
                expected: 2,
                got: 1
            })
        );
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn broken_link_is_rejected_even_if_self_consistent() {
        let mut chain = seeded();
        let fork = sealed(1, &"ab".repeat(32), T0, "fork");
        assert!(fork.has_valid_structure());

        match chain.add_block_to_chain(fork) {
            Err(ChainError::InvalidBlock(BlockRejection::PreviousHashMismatch {
                expected,
                got,
            })) => {
                assert_eq!(expected, GENESIS_HASH);
                assert_eq!(got, "ab".repeat(32));
            }
            other => panic!("expected PreviousHashMismatch, got: {:?}", other),
        }
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn rejection_leaves_chain_untouched() {
        let mut chain = seeded();
        extend(&mut chain, 3);
        let before = chain.blocks().to_vec();

        let stale = sealed(2, &before[1].hash, T0, "stale");
        assert!(chain.add_block_to_chain(stale).is_err());
        assert_eq!(chain.blocks(), before.as_slice());
    }

    #[test]
    fn is_block_valid_is_pure() {
        let chain = seeded();
        let good = chain.generate_next_block_at("good", T0).unwrap();
        let bad = sealed(5, GENESIS_HASH, T0, "bad");

        assert_eq!(chain.is_block_valid(&good), chain.is_block_valid(&good));
        assert_eq!(chain.is_block_valid(&bad), chain.is_block_valid(&bad));
        assert!(chain.is_block_valid(&good));
        assert!(!chain.is_block_valid(&bad));
        assert_eq!(chain.len(), 1);
    }

    // -- sequence validation -------------------------------------------------

    #[test]
    fn validate_blocks_rejects_empty_sequence() {
        assert_eq!(Chain::validate_blocks(&[]), Err(ChainError::EmptyChain));
    }

    #[test]
    fn validate_blocks_requires_genesis_index_first() {
        let block = sealed(1, GENESIS_HASH, T0, "x");
        assert_eq!(
            Chain::validate_blocks(&[block]),
            Err(ChainError::InvalidCandidate {
                index: 0,
                reason: BlockRejection::IndexMismatch {
                    expected: 0,
                    got: 1
                },
            })
        );
    }

    #[test]
    fn validate_blocks_reports_failing_position() {
        let mut chain = seeded();
        extend(&mut chain, 4);
        let mut blocks = chain.blocks().to_vec();
        blocks[3].data = "rewritten history".to_string();

        match Chain::validate_blocks(&blocks) {
            Err(ChainError::InvalidCandidate { index, reason }) => {
                assert_eq!(index, 3);
                assert_eq!(reason, BlockRejection::MalformedStructure { index: 3 });
            }
            other => panic!("expected InvalidCandidate, got: {:?}", other),
        }
    }

    #[test]
    fn from_blocks_round_trips_a_valid_chain() {
        let mut chain = seeded();
        extend(&mut chain, 5);
        let rebuilt = Chain::from_blocks(chain.blocks().to_vec()).unwrap();
        assert_eq!(rebuilt.blocks(), chain.blocks());
        assert!(rebuilt.is_valid());
    }

    #[test]
    fn from_blocks_rejects_gap() {
        let mut chain = seeded();
        extend(&mut chain, 3);
        let mut blocks = chain.blocks().to_vec();
        blocks.remove(2);
        assert!(matches!(
            Chain::from_blocks(blocks),
            Err(ChainError::InvalidCandidate { index: 2, .. })
        ));
    }

    // -- replacement ---------------------------------------------------------

    #[test]
    fn replace_chain_without_rule_is_unimplemented() {
        let mut chain = seeded();
        let mut longer = seeded();
        extend(&mut longer, 3);

        assert_eq!(
            chain.replace_chain(longer.blocks().to_vec()),
            Err(ChainError::UnimplementedConsensus)
        );
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn longest_chain_rule_adopts_longer_valid_chain() {
        let mut chain = seeded().with_fork_choice(LongestChain);
        extend(&mut chain, 1);
        let mut longer = seeded();
        extend(&mut longer, 4);

        chain.replace_chain(longer.blocks().to_vec()).unwrap();
        assert_eq!(chain.blocks(), longer.blocks());
    }

    #[test]
    fn longest_chain_rule_keeps_current_on_tie() {
        let mut chain = seeded().with_fork_choice(LongestChain);
        extend(&mut chain, 2);
        let before = chain.blocks().to_vec();
        let mut other = seeded();
        extend(&mut other, 2);

        let err = chain.replace_chain(other.blocks().to_vec()).unwrap_err();
        assert_eq!(
            err,
            ChainError::CandidateRejected {
                rule: "longest-chain",
                current: 3,
                candidate: 3,
            }
        );
        assert_eq!(chain.blocks(), before.as_slice());
    }

    #[test]
    fn replacement_revalidates_candidate() {
        let mut chain = seeded().with_fork_choice(LongestChain);
        let mut longer = seeded();
        extend(&mut longer, 4);
        let mut blocks = longer.blocks().to_vec();
        blocks[2].previous_hash = "00".repeat(32);

        assert!(matches!(
            chain.replace_chain(blocks),
            Err(ChainError::InvalidCandidate { index: 2, .. })
        ));
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn empty_chain_adopts_any_valid_candidate() {
        let mut chain = Chain::new().with_fork_choice(LongestChain);
        let mut other = seeded();
        extend(&mut other, 1);

        chain.replace_chain(other.blocks().to_vec()).unwrap();
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn candidate_with_foreign_genesis_is_rejected() {
        let mut chain = seeded().with_fork_choice(LongestChain);
        extend(&mut chain, 1);
        let before = chain.blocks().to_vec();

        let forged = Block::new(0, "00".repeat(32), "", T0, "forged genesis");
        let mut other = Chain::new();
        other.add_genesis_block(forged).unwrap();
        extend(&mut other, 3);
        assert!(Chain::validate_blocks(other.blocks()).is_ok());

        assert_eq!(
            chain.replace_chain(other.blocks().to_vec()),
            Err(ChainError::InvalidCandidate {
                index: 0,
                reason: BlockRejection::GenesisMismatch {
                    expected: GENESIS_HASH.to_string(),
                    got: "00".repeat(32),
                },
            })
        );
        assert_eq!(chain.blocks(), before.as_slice());
    }

    #[test]
    fn tip_at_max_index_has_no_successor() {
        let mut chain = Chain::new();
        let top = sealed(u64::MAX, "", T0, "top");
        chain.add_genesis_block(top.clone()).unwrap();

        assert_eq!(
            chain.next_index(),
            Err(ChainError::IndexOverflow { index: u64::MAX })
        );
        assert_eq!(
            chain.generate_next_block_at("next", T0 + 1),
            Err(ChainError::IndexOverflow { index: u64::MAX })
        );

        let same_index = sealed(u64::MAX, &top.hash, T0 + 1, "next");
        assert_eq!(
            chain.add_block_to_chain(same_index),
            Err(ChainError::InvalidBlock(BlockRejection::IndexOverflow {
                index: u64::MAX
            }))
        );
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn debug_shows_rule_name() {
        let chain = Chain::new().with_fork_choice(LongestChain);
        assert!(format!("{:?}", chain).contains("longest-chain"));
    }
}
