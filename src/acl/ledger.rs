//! ACL Ledger
//!
//! Append-only sequence of GRANT/REVOKE blocks with last-writer-wins
//! access resolution. The latest block for a (file, user) pair is
//! authoritative; older history is never reconsidered.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::acl::block::{Block, BlockAction, OWNER_PERMISSION};
use crate::acl::verify::{verify_chain, ChainReport};
use crate::error::{require_non_empty, LedgerError, Result};

/// In-memory access control ledger.
///
/// Appends hold the write lock across read-tail, link and push, so two
/// concurrent grants can never link to the same tail.
#[derive(Clone, Default)]
pub struct AclLedger {
    blocks: Arc<RwLock<Vec<Block>>>,
}

impl AclLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger pre-populated with the demonstration grants on `case-file-001`.
    pub fn with_demo_seed() -> Self {
        let now = Utc::now();
        let genesis = Block::new(
            0,
            now - Duration::days(2),
            BlockAction::Grant {
                file_id: "case-file-001".to_string(),
                user_id: "officer-jones".to_string(),
                permission: OWNER_PERMISSION.to_string(),
                actor_id: "system".to_string(),
            },
            None,
        );
        let shared = Block::new(
            1,
            now - Duration::days(1),
            BlockAction::Grant {
                file_id: "case-file-001".to_string(),
                user_id: "prosecutor-smith".to_string(),
                permission: "read".to_string(),
                actor_id: "officer-jones".to_string(),
            },
            Some(&genesis),
        );

        Self {
            blocks: Arc::new(RwLock::new(vec![genesis, shared])),
        }
    }

    /// Record a GRANT of `permission` on `file_id` to `user_id`.
    ///
    /// The ledger does not check that `actor_id` may grant; that policy
    /// belongs to the caller.
    pub async fn grant(
        &self,
        file_id: &str,
        user_id: &str,
        permission: &str,
        actor_id: &str,
    ) -> Result<Block> {
        let action = BlockAction::Grant {
            file_id: file_id.to_string(),
            user_id: user_id.to_string(),
            permission: permission.to_string(),
            actor_id: actor_id.to_string(),
        };
        self.append(None, action).await
    }

    /// Record a blanket REVOKE of every permission `user_id` holds on `file_id`.
    pub async fn revoke(&self, file_id: &str, user_id: &str, actor_id: &str) -> Result<Block> {
        let action = BlockAction::Revoke {
            file_id: file_id.to_string(),
            user_id: user_id.to_string(),
            actor_id: actor_id.to_string(),
        };
        self.append(None, action).await
    }

    /// Append `action` only if the current tail is still `expected_tail`.
    ///
    /// Fails with [`LedgerError::ConcurrencyConflict`] when another append
    /// got in first; the ledger is left untouched.
    pub async fn append_after(
        &self,
        expected_tail: Option<&str>,
        action: BlockAction,
    ) -> Result<Block> {
        self.append(Some(expected_tail), action).await
    }

    async fn append(&self, expected_tail: Option<Option<&str>>, action: BlockAction) -> Result<Block> {
        if let Err(e) = validate_action(&action) {
            warn!("Rejected {} block: {}", action.kind(), e);
            return Err(e);
        }

        let mut blocks = self.blocks.write().await;
        let tail = blocks.last();

        if let Some(expected) = expected_tail {
            let actual = tail.map(|b| b.id.as_str());
            if expected != actual {
                warn!("Stale tail: expected {:?}, found {:?}", expected, actual);
                return Err(LedgerError::ConcurrencyConflict {
                    expected: expected.map(str::to_string),
                    actual: actual.map(str::to_string),
                });
            }
        }

        let block = Block::new(
            blocks.len() as u64,
            next_timestamp(tail),
            action,
            tail,
        );
        info!("ACL: {} ({})", block.summary(), block.id);
        blocks.push(block.clone());

        Ok(block)
    }

    /// Does `user_id` currently hold `permission` on `file_id`?
    ///
    /// Only the most recent block for the pair counts: a REVOKE denies
    /// everything, a GRANT allows its own permission, and `owner` allows
    /// any permission.
    pub async fn check_access(&self, file_id: &str, user_id: &str, permission: &str) -> bool {
        let allowed = match self.effective_permission(file_id, user_id).await {
            Some(held) => held == permission || held == OWNER_PERMISSION,
            None => false,
        };
        debug!(
            "ACL: check '{}' on '{}' for '{}' -> {}",
            permission, file_id, user_id, allowed
        );
        allowed
    }

    /// Permission currently held by `user_id` on `file_id`, if any.
    pub async fn effective_permission(&self, file_id: &str, user_id: &str) -> Option<String> {
        let blocks = self.blocks.read().await;
        blocks
            .iter()
            .filter(|b| b.file_id() == file_id && b.user_id() == user_id)
            .max_by_key(|b| b.recency_key())
            .and_then(|latest| latest.action.permission().map(str::to_string))
    }

    /// All blocks governing `file_id`, newest first.
    pub async fn get_access_logs(&self, file_id: &str) -> Vec<Block> {
        let blocks = self.blocks.read().await;
        let mut logs: Vec<Block> = blocks
            .iter()
            .filter(|b| b.file_id() == file_id)
            .cloned()
            .collect();
        logs.sort_by(|a, b| b.recency_key().cmp(&a.recency_key()));

        debug!("ACL: {} log entries for '{}'", logs.len(), file_id);
        logs
    }

    /// Snapshot of the whole ledger in insertion order.
    pub async fn blocks(&self) -> Vec<Block> {
        self.blocks.read().await.clone()
    }

    pub async fn tail(&self) -> Option<Block> {
        self.blocks.read().await.last().cloned()
    }

    pub async fn len(&self) -> usize {
        self.blocks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blocks.read().await.is_empty()
    }

    /// Verify links and hashes of every block.
    pub async fn verify(&self) -> Result<ChainReport> {
        let blocks = self.blocks.read().await;
        verify_chain(&blocks)
    }
}

fn validate_action(action: &BlockAction) -> Result<()> {
    require_non_empty("fileId", action.file_id())?;
    require_non_empty("userId", action.user_id())?;
    if let BlockAction::Grant { permission, .. } = action {
        require_non_empty("permission", permission)?;
    }
    Ok(())
}

/// Wall-clock time, clamped so timestamps never go backwards.
fn next_timestamp(tail: Option<&Block>) -> DateTime<Utc> {
    let now = Utc::now();
    match tail {
        Some(prev) if prev.timestamp > now => prev.timestamp,
        _ => now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acl::block::BlockKind;

    #[tokio::test]
    async fn test_empty_ledger_denies() {
        let ledger = AclLedger::new();
        assert!(!ledger.check_access("f", "u", "read").await);
        assert!(ledger.get_access_logs("f").await.is_empty());
        assert!(ledger.is_empty().await);
        assert!(ledger.tail().await.is_none());
    }

    #[tokio::test]
    async fn test_grant_links_to_tail() {
        let ledger = AclLedger::new();
        let first = ledger.grant("f", "u", "owner", "system").await.unwrap();
        let second = ledger.grant("f", "v", "read", "u").await.unwrap();

        assert_eq!(first.previous_block_id, None);
        assert_eq!(second.previous_block_id.as_deref(), Some(first.id.as_str()));
        assert_eq!(second.sequence, 1);
        assert!(second.timestamp >= first.timestamp);
        assert_eq!(ledger.tail().await.unwrap().id, second.id);
    }

    #[tokio::test]
    async fn test_grant_rejects_missing_fields() {
        let ledger = AclLedger::new();

        for (file, user, permission) in [("", "u", "read"), ("f", " ", "read"), ("f", "u", "")] {
            let err = ledger.grant(file, user, permission, "actor").await.unwrap_err();
            assert!(matches!(err, LedgerError::InvalidArgument(_)));
        }
        assert!(ledger.is_empty().await);
    }

    #[tokio::test]
    async fn test_revoke_masks_every_permission() {
        let ledger = AclLedger::new();
        ledger.grant("f", "u", "owner", "system").await.unwrap();
        let revoke = ledger.revoke("f", "u", "system").await.unwrap();

        assert_eq!(revoke.kind(), BlockKind::Revoke);
        assert!(!ledger.check_access("f", "u", "read").await);
        assert!(!ledger.check_access("f", "u", "owner").await);
        assert_eq!(ledger.effective_permission("f", "u").await, None);
    }

    #[tokio::test]
    async fn test_later_grant_replaces_earlier_permission() {
        let ledger = AclLedger::new();
        ledger.grant("f", "u", "write", "system").await.unwrap();
        ledger.grant("f", "u", "read", "system").await.unwrap();

        assert!(ledger.check_access("f", "u", "read").await);
        assert!(!ledger.check_access("f", "u", "write").await);
    }

    #[tokio::test]
    async fn test_equal_timestamps_break_ties_by_insertion() {
        let ledger = AclLedger::new();
        let ts = Utc::now();
        {
            let mut blocks = ledger.blocks.write().await;
            let grant = Block::new(
                0,
                ts,
                BlockAction::Grant {
                    file_id: "f".to_string(),
                    user_id: "u".to_string(),
                    permission: "read".to_string(),
                    actor_id: "a".to_string(),
                },
                None,
            );
            let revoke = Block::new(
                1,
                ts,
                BlockAction::Revoke {
                    file_id: "f".to_string(),
                    user_id: "u".to_string(),
                    actor_id: "a".to_string(),
                },
                Some(&grant),
            );
            blocks.push(grant);
            blocks.push(revoke);
        }

        assert!(!ledger.check_access("f", "u", "read").await);
        let logs = ledger.get_access_logs("f").await;
        assert_eq!(logs[0].kind(), BlockKind::Revoke);
        assert_eq!(logs[1].kind(), BlockKind::Grant);
    }

    #[tokio::test]
    async fn test_append_after_detects_stale_tail() {
        let ledger = AclLedger::new();
        let first = ledger.grant("f", "u", "read", "a").await.unwrap();

        let action = BlockAction::Revoke {
            file_id: "f".to_string(),
            user_id: "u".to_string(),
            actor_id: "a".to_string(),
        };

        let err = ledger.append_after(None, action.clone()).await.unwrap_err();
        assert!(matches!(err, LedgerError::ConcurrencyConflict { .. }));
        assert_eq!(ledger.len().await, 1);

        let block = ledger.append_after(Some(first.id.as_str()), action).await.unwrap();
        assert_eq!(block.previous_block_id.as_deref(), Some(first.id.as_str()));
    }

    #[tokio::test]
    async fn test_demo_seed() {
        let ledger = AclLedger::with_demo_seed();
        assert_eq!(ledger.len().await, 2);
        assert!(ledger.check_access("case-file-001", "officer-jones", "write").await);
        assert!(ledger.check_access("case-file-001", "prosecutor-smith", "read").await);
        assert!(!ledger.check_access("case-file-001", "prosecutor-smith", "write").await);
        assert!(ledger.verify().await.is_ok());
    }

    #[tokio::test]
    async fn test_concurrent_grants_do_not_fork() {
        let ledger = AclLedger::new();
        let mut handles = Vec::new();
        for i in 0..32 {
            let ledger = ledger.clone();
            handles.push(tokio::spawn(async move {
                ledger
                    .grant("f", &format!("user-{}", i), "read", "system")
                    .await
                    .unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let report = ledger.verify().await.unwrap();
        assert_eq!(report.block_count, 32);
    }
}
