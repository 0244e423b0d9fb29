//! ACL Block
//!
//! One immutable entry of the access control ledger: a shared envelope
//! (id, sequence, timestamp, chain links) around a GRANT or REVOKE action.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use uuid::Uuid;

/// Permission that satisfies every access check.
pub const OWNER_PERMISSION: &str = "owner";

/// Previous-hash value of the first block in a ledger.
pub const ZERO_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BlockKind {
    Grant,
    Revoke,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockKind::Grant => write!(f, "GRANT"),
            BlockKind::Revoke => write!(f, "REVOKE"),
        }
    }
}

/// The permission change recorded by a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum BlockAction {
    #[serde(rename_all = "camelCase")]
    Grant {
        file_id: String,
        user_id: String,
        permission: String,
        actor_id: String,
    },
    /// Masks every permission the user held on the file.
    #[serde(rename_all = "camelCase")]
    Revoke {
        file_id: String,
        user_id: String,
        actor_id: String,
    },
}

impl BlockAction {
    pub fn kind(&self) -> BlockKind {
        match self {
            BlockAction::Grant { .. } => BlockKind::Grant,
            BlockAction::Revoke { .. } => BlockKind::Revoke,
        }
    }

    pub fn file_id(&self) -> &str {
        match self {
            BlockAction::Grant { file_id, .. } | BlockAction::Revoke { file_id, .. } => file_id,
        }
    }

    pub fn user_id(&self) -> &str {
        match self {
            BlockAction::Grant { user_id, .. } | BlockAction::Revoke { user_id, .. } => user_id,
        }
    }

    pub fn actor_id(&self) -> &str {
        match self {
            BlockAction::Grant { actor_id, .. } | BlockAction::Revoke { actor_id, .. } => actor_id,
        }
    }

    /// Granted permission; `None` for revocations.
    pub fn permission(&self) -> Option<&str> {
        match self {
            BlockAction::Grant { permission, .. } => Some(permission),
            BlockAction::Revoke { .. } => None,
        }
    }
}

/// ACL ledger entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: String,
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
    pub action: BlockAction,
    pub previous_block_id: Option<String>,
    pub previous_block_hash: String,
    pub block_hash: String,
}

impl Block {
    /// Build a block linked to `previous` (the current tail, if any).
    pub(crate) fn new(
        sequence: u64,
        timestamp: DateTime<Utc>,
        action: BlockAction,
        previous: Option<&Block>,
    ) -> Self {
        let mut block = Self {
            id: format!("blk-{}", Uuid::new_v4().simple()),
            sequence,
            timestamp,
            action,
            previous_block_id: previous.map(|b| b.id.clone()),
            previous_block_hash: previous
                .map(|b| b.block_hash.clone())
                .unwrap_or_else(|| ZERO_HASH.to_string()),
            block_hash: String::new(),
        };

        block.block_hash = block.calculate_hash();
        block
    }

    pub fn kind(&self) -> BlockKind {
        self.action.kind()
    }

    pub fn file_id(&self) -> &str {
        self.action.file_id()
    }

    pub fn user_id(&self) -> &str {
        self.action.user_id()
    }

    /// Canonical string representation for hashing.
    ///
    /// Every value is written as `key:<byte length>:value`, absent values as
    /// `key:-`, so identifiers containing separators cannot shift bytes
    /// from one field into another.
    pub fn canonical_string(&self) -> String {
        let sequence = self.sequence.to_string();
        let timestamp = self.timestamp.to_rfc3339();
        let kind = self.kind().to_string();

        let fields: [(&str, Option<&str>); 10] = [
            ("id", Some(self.id.as_str())),
            ("sequence", Some(sequence.as_str())),
            ("timestamp", Some(timestamp.as_str())),
            ("type", Some(kind.as_str())),
            ("file_id", Some(self.action.file_id())),
            ("user_id", Some(self.action.user_id())),
            ("permission", self.action.permission()),
            ("actor_id", Some(self.action.actor_id())),
            ("previous_block_id", self.previous_block_id.as_deref()),
            ("previous_block_hash", Some(self.previous_block_hash.as_str())),
        ];

        fields
            .iter()
            .map(|(key, value)| match value {
                Some(v) => format!("{}:{}:{}", key, v.len(), v),
                None => format!("{}:-", key),
            })
            .collect::<Vec<_>>()
            .join("|")
    }

    /// SHA-256 of the canonical string, hex encoded
    pub fn calculate_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.canonical_string().as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn verify_hash(&self) -> bool {
        self.block_hash == self.calculate_hash()
    }

    /// Ordering key for newest-first listings; insertion order breaks
    /// timestamp ties.
    pub(crate) fn recency_key(&self) -> (DateTime<Utc>, u64) {
        (self.timestamp, self.sequence)
    }

    pub fn summary(&self) -> String {
        match &self.action {
            BlockAction::Grant {
                file_id,
                user_id,
                permission,
                actor_id,
            } => format!(
                "GRANT '{}' on '{}' to '{}' by '{}'",
                permission, file_id, user_id, actor_id
            ),
            BlockAction::Revoke {
                file_id,
                user_id,
                actor_id,
            } => format!("REVOKE on '{}' from '{}' by '{}'", file_id, user_id, actor_id),
        }
    }
}
