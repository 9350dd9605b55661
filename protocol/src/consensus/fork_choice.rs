//! Fork-choice rules for chain replacement.
//!
//! The ledger itself has no opinion on which of two valid chains should win.
//! [`Chain::replace_chain`](crate::ledger::Chain::replace_chain) refuses to
//! run until a rule is installed with
//! [`Chain::with_fork_choice`](crate::ledger::Chain::with_fork_choice).
//!
//! A rule only ever sees chains that have already been validated end to end,
//! so implementations compare; they do not validate.

use crate::ledger::Block;

/// Decides whether a candidate chain should replace the current one.
pub trait ForkChoice: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Returns `true` if `candidate` should replace `current`.
    ///
    /// Both slices are non-empty and fully valid.
    fn prefers(&self, current: &[Block], candidate: &[Block]) -> bool;
}

/// Longest valid chain wins. Ties keep the current chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct LongestChain;

impl ForkChoice for LongestChain {
    fn name(&self) -> &'static str {
        "longest-chain"
    }

    fn prefers(&self, current: &[Block], candidate: &[Block]) -> bool {
        candidate.len() > current.len()
    }
}
