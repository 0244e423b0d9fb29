//! Access Control Ledger
//!
//! Append-only, hash-linked record of evidence access grants and
//! revocations, with last-writer-wins permission resolution.

pub mod block;
pub mod ledger;
pub mod verify;

pub use block::{Block, BlockAction, BlockKind, OWNER_PERMISSION};
pub use ledger::AclLedger;
pub use verify::{load_blocks_from_file, verify_chain, ChainReport};
