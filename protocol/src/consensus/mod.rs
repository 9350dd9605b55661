//! # Consensus Extension Point
//!
//! linkchain is single-node. This module holds the seam where a multi-node
//! rule would attach: a [`ForkChoice`] decides whether a fully validated
//! candidate chain replaces the local one.
//!
//! No rule is active by default. [`LongestChain`] is provided for callers who
//! explicitly opt in.

pub mod fork_choice;

pub use fork_choice::{ForkChoice, LongestChain};
