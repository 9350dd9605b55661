// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # linkchain Driver
//!
//! Entry point for the `linkchain-node` binary. Parses CLI arguments,
//! initializes logging, and wires an explicitly owned [`Chain`] together.
//!
//! - `run`    : seed genesis, append blocks, print the chain
//! - `hash`   : print the digest of a block's fields
//! - `verify` : validate a chain exported as JSON
//! - `version`: print build version information

mod cli;
mod logging;

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use linkchain::config::{DEFAULT_BLOCK_DATA, DIGEST_ALGORITHM, LEDGER_FORMAT_VERSION};
use linkchain::crypto::is_hex_digest;
use linkchain::ledger::{Block, Chain};

use cli::{Commands, LinkchainCli};
use logging::LogFormat;

fn main() -> Result<()> {
    let cli = LinkchainCli::parse();
    logging::init_logging(&cli.log_level, LogFormat::parse(&cli.log_format));

    match cli.command {
        Commands::Run(args) => run_chain(args),
        Commands::Hash(args) => {
            print_hash(args);
            Ok(())
        }
        Commands::Verify(args) => verify_chain(args),
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Seeds the reference genesis block, appends one block per payload, and
/// prints the resulting chain.
fn run_chain(args: cli::RunArgs) -> Result<()> {
    let payloads = if args.data.is_empty() {
        vec![DEFAULT_BLOCK_DATA.to_string()]
    } else {
        args.data
    };

    let chain = build_chain(payloads)?;
    tracing::info!(blocks = chain.len(), "chain built");

    if args.json {
        let json =
            serde_json::to_string_pretty(chain.blocks()).context("failed to serialize chain")?;
        println!("{}", json);
    } else {
        print!("{}", render_table(chain.blocks()));
    }
    Ok(())
}

/// Builds a fresh chain: reference genesis plus one block per payload.
fn build_chain(payloads: Vec<String>) -> Result<Chain> {
    let mut chain = Chain::new();
    chain
        .add_genesis_block(Block::genesis())
        .context("failed to seed genesis block")?;

    for data in payloads {
        let block = chain
            .generate_next_block(data)
            .context("failed to generate block")?;
        tracing::info!(index = block.index, hash = %block.hash, "block generated");

        let index = block.index;
        chain
            .add_block_to_chain(block)
            .with_context(|| format!("block {} rejected", index))?;
    }
    Ok(chain)
}

/// One line per block, genesis first.
fn render_table(blocks: &[Block]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>5}  {:<64}  {:<64}  {:>10}  DATA",
        "INDEX", "HASH", "PREVIOUS HASH", "TIMESTAMP"
    );
    for b in blocks {
        let _ = writeln!(
            out,
            "{:>5}  {:<64}  {:<64}  {:>10}  {}",
            b.index, b.hash, b.previous_hash, b.timestamp, b.data
        );
    }
    out
}

fn print_hash(args: cli::HashArgs) {
    println!(
        "{}",
        Chain::calculate_block_hash(args.index, &args.previous_hash, args.timestamp, &args.data)
    );
}

/// Validates a chain read from a JSON file. Exits non-zero if it is invalid.
fn verify_chain(args: cli::VerifyArgs) -> Result<()> {
    let blocks = load_blocks(&args.file)?;

    match Chain::validate_blocks(&blocks) {
        Ok(()) => {
            tracing::info!(blocks = blocks.len(), file = %args.file.display(), "chain valid");
            println!("valid: {} blocks", blocks.len());
            for index in nonstandard_hashes(&blocks) {
                tracing::warn!(index, "stored hash is not a {} hex digest", DIGEST_ALGORITHM);
                println!("note: block {} carries a non-digest hash", index);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!(file = %args.file.display(), error = %e, "chain invalid");
            let context = format!("{} is not a valid chain", args.file.display());
            Err(anyhow::Error::new(e).context(context))
        }
    }
}

/// Indices of blocks whose stored hash is not a rendered digest. Only a
/// trusted genesis can get past validation like that.
fn nonstandard_hashes(blocks: &[Block]) -> Vec<u64> {
    blocks
        .iter()
        .filter(|b| !is_hex_digest(&b.hash))
        .map(|b| b.index)
        .collect()
}

/// Reads a JSON array of blocks.
fn load_blocks(path: &Path) -> Result<Vec<Block>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

/// Prints version information to stdout.
fn print_version() {
    println!("linkchain-node {}", env!("CARGO_PKG_VERSION"));
    println!("ledger format  {}", LEDGER_FORMAT_VERSION);
    println!("digest         {}", DIGEST_ALGORITHM);
}
