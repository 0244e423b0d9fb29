//! Offline verification of an exported ACL ledger (`GET /acl/blocks`).

use anyhow::{anyhow, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

use custody_ledger::acl::{load_blocks_from_file, verify_chain};

#[derive(Parser, Debug)]
#[command(name = "verify-ledger", version, about = "Verify the integrity of an exported ACL ledger")]
struct Args {
    /// Path to the JSON ledger export
    #[arg(short, long, value_name = "PATH")]
    ledger: PathBuf,

    /// Expected hash of the tail block
    #[arg(short = 'H', long, value_name = "HASH")]
    head_hash: Option<String>,

    /// Print every block
    #[arg(short, long)]
    verbose: bool,

    /// Suppress output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let args = Args::parse();

    let level = if args.quiet {
        tracing::Level::ERROR
    } else if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    if let Err(e) = run(&args) {
        error!("Ledger verification failed: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    info!("Verifying ledger export: {}", args.ledger.display());

    if !args.ledger.exists() {
        return Err(anyhow!("Ledger export not found: {}", args.ledger.display()));
    }

    let blocks = load_blocks_from_file(&args.ledger)?;
    let report = verify_chain(&blocks)?;

    if args.verbose {
        for block in &blocks {
            println!("#{} {} {} {}", block.sequence, block.timestamp, block.id, block.summary());
        }
    }

    if let Some(expected) = &args.head_hash {
        if &report.head_hash != expected {
            return Err(anyhow!(
                "Head hash mismatch: expected {}, got {}",
                expected,
                report.head_hash
            ));
        }
    }

    if !args.quiet {
        println!("✓ {} blocks verified, head hash {}", report.block_count, report.head_hash);
    }

    Ok(())
}
