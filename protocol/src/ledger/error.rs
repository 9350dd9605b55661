//! Error types for the ledger.
//!
//! [`ChainError`] is what chain operations return. [`BlockRejection`] says
//! which validation check a candidate block failed, so callers can branch on
//! the violated invariant instead of parsing a message.

use thiserror::Error;

/// Why a candidate block was not accepted on top of the current tip.
///
/// Variants are listed in the order the checks run; validation stops at the
/// first failure. `GenesisMismatch` only comes from chain replacement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockRejection {
    /// There is no tip to validate against (the chain is empty).
    #[error("no tip to validate against")]
    NoTip,

    /// The block's stored hash does not match the digest of its own fields.
    #[error("block {index} is malformed: stored hash does not match its fields")]
    MalformedStructure {
        /// Index claimed by the rejected block.
        index: u64,
    },

    /// The block does not sit immediately after the tip.
    #[error("index mismatch: expected {expected}, got {got}")]
    IndexMismatch {
        /// `tip.index + 1`.
        expected: u64,
        /// The candidate's index.
        got: u64,
    },

    /// The tip already sits at `u64::MAX`; no index can follow it.
    #[error("index overflow: no index follows {index}")]
    IndexOverflow {
        /// The tip's index.
        index: u64,
    },

    /// The block links to something other than the tip.
    #[error("previous hash mismatch: expected {expected}, got {got:?}")]
    PreviousHashMismatch {
        /// The tip's hash.
        expected: String,
        /// The candidate's `previous_hash`.
        got: String,
    },

    /// The block's hash differs from the chain-computed digest.
    #[error("hash mismatch: computed {expected}, stored {got:?}")]
    HashMismatch {
        /// Digest computed by the chain.
        expected: String,
        /// Hash stored in the candidate.
        got: String,
    },

    /// A candidate chain starts from a different genesis block than ours.
    #[error("genesis mismatch: local {expected}, candidate {got:?}")]
    GenesisMismatch {
        /// Hash of the local genesis block.
        expected: String,
        /// Hash of the candidate's first block.
        got: String,
    },
}

/// Errors returned by [`Chain`](super::chain::Chain) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// The operation needs a latest block and the chain has none.
    #[error("chain is empty: add a genesis block first")]
    EmptyChain,

    /// `add_block_to_chain` refused the block. The chain is unchanged.
    #[error("invalid block: {0}")]
    InvalidBlock(#[from] BlockRejection),

    /// The trusted genesis path was used on a chain that already has blocks.
    #[error("genesis block already set")]
    GenesisAlreadySet,

    /// The tip's index is `u64::MAX`, so there is no next index.
    #[error("no index follows {index}")]
    IndexOverflow {
        /// The tip's index.
        index: u64,
    },

    /// `replace_chain` was called but no fork-choice rule is configured.
    #[error("chain replacement requires a fork-choice rule; none is configured")]
    UnimplementedConsensus,

    /// A block sequence failed validation at the given position.
    #[error("invalid candidate chain at index {index}: {reason}")]
    InvalidCandidate {
        /// Position in the sequence where validation failed.
        index: usize,
        /// The failed check.
        reason: BlockRejection,
    },

    /// The candidate chain is valid but the fork-choice rule kept the current one.
    #[error("candidate chain of {candidate} blocks rejected by {rule} (current: {current})")]
    CandidateRejected {
        /// Name of the fork-choice rule.
        rule: &'static str,
        /// Current chain length.
        current: usize,
        /// Candidate chain length.
        candidate: usize,
    },
}
