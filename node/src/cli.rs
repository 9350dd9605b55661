//! # CLI Interface
//!
//! Defines the command-line argument structure for `linkchain-node` using
//! `clap` derive. Supports four subcommands: `run`, `hash`, `verify`, and
//! `version`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// linkchain driver.
///
/// Builds an in-memory hash-linked chain from the reference genesis block,
/// computes block digests, and checks exported chains.
#[derive(Parser, Debug)]
#[command(
    name = "linkchain-node",
    about = "linkchain ledger driver",
    version,
    propagate_version = true
)]
pub struct LinkchainCli {
    /// Log output format: `pretty` or `json`.
    #[arg(long, global = true, env = "LINKCHAIN_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,

    /// Default log filter, used when `RUST_LOG` is not set.
    #[arg(
        long,
        global = true,
        env = "LINKCHAIN_LOG",
        default_value = "linkchain_node=info,linkchain=info"
    )]
    pub log_level: String,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Seed the genesis block, append one block per payload, print the chain.
    Run(RunArgs),
    /// Print the digest of a block's four input fields.
    Hash(HashArgs),
    /// Validate a chain exported as a JSON array of blocks.
    Verify(VerifyArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Payload for a new block. Repeat to append several blocks in order.
    ///
    /// Defaults to a single block carrying `Test`.
    #[arg(long = "data", short = 'd')]
    pub data: Vec<String>,

    /// Print the chain as pretty JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `hash` subcommand.
#[derive(Parser, Debug)]
pub struct HashArgs {
    #[arg(long)]
    pub index: u64,

    /// Hash of the preceding block. Empty for genesis.
    #[arg(long, default_value = "")]
    pub previous_hash: String,

    /// Seconds since the Unix epoch.
    #[arg(long)]
    pub timestamp: u64,

    #[arg(long, default_value = "")]
    pub data: String,
}

/// Arguments for the `verify` subcommand.
#[derive(Parser, Debug)]
pub struct VerifyArgs {
    /// Path to a JSON file holding an array of blocks, genesis first.
    pub file: PathBuf,
}
