//! Ledger Verification
//!
//! Walks an exported or live block sequence and checks that it is a single
//! unbroken chain: contiguous sequence numbers, id and hash links to the
//! predecessor, intact block hashes and non-decreasing timestamps.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::acl::block::{Block, ZERO_HASH};
use crate::error::{LedgerError, Result};

/// Outcome of a successful verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainReport {
    pub block_count: usize,
    pub tail_id: Option<String>,
    pub head_hash: String,
}

/// Verify a block sequence given in insertion order.
///
/// An empty sequence is a valid chain.
pub fn verify_chain(blocks: &[Block]) -> Result<ChainReport> {
    let mut previous: Option<&Block> = None;

    for (i, block) in blocks.iter().enumerate() {
        if block.sequence != i as u64 {
            return Err(LedgerError::chain_broken_at(
                i,
                format!("sequence {} out of order", block.sequence),
            ));
        }

        if !block.verify_hash() {
            return Err(LedgerError::chain_broken_at(i, "block hash mismatch"));
        }

        let expected_id = previous.map(|p| p.id.as_str());
        if block.previous_block_id.as_deref() != expected_id {
            return Err(LedgerError::chain_broken_at(
                i,
                format!(
                    "previous block id {:?}, expected {:?}",
                    block.previous_block_id, expected_id
                ),
            ));
        }

        let expected_hash = previous.map_or(ZERO_HASH, |p| p.block_hash.as_str());
        if block.previous_block_hash != expected_hash {
            return Err(LedgerError::chain_broken_at(i, "previous block hash mismatch"));
        }

        if let Some(prev) = previous {
            if block.timestamp < prev.timestamp {
                return Err(LedgerError::chain_broken_at(
                    i,
                    format!("timestamp {} precedes {}", block.timestamp, prev.timestamp),
                ));
            }
        }

        previous = Some(block);
    }

    info!("Ledger verification successful: {} blocks", blocks.len());
    Ok(ChainReport {
        block_count: blocks.len(),
        tail_id: previous.map(|b| b.id.clone()),
        head_hash: previous.map_or_else(|| ZERO_HASH.to_string(), |b| b.block_hash.clone()),
    })
}

/// Load a ledger export (a JSON array of blocks) from disk.
pub fn load_blocks_from_file(path: impl AsRef<Path>) -> Result<Vec<Block>> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}
