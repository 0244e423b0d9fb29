//! Ledger Status
//!
//! Read-only aggregate views over the ACL ledger and the custody log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::acl::{AclLedger, BlockKind};
use crate::config::NetworkConfig;
use crate::custody::CustodyLog;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerStatus {
    pub block_count: usize,
    pub last_block_timestamp: Option<DateTime<Utc>>,
    pub network: String,
    pub status: String,
    pub gas_price: String,
    pub last_sync: DateTime<Utc>,
    pub contract_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySummary {
    pub total_anchors: usize,
    pub access_grants: usize,
    pub access_revocations: usize,
    pub custody_transfers: usize,
}

#[derive(Clone)]
pub struct StatusService {
    ledger: AclLedger,
    custody: CustodyLog,
    network: NetworkConfig,
}

impl StatusService {
    pub fn new(ledger: AclLedger, custody: CustodyLog, network: NetworkConfig) -> Self {
        Self {
            ledger,
            custody,
            network,
        }
    }

    pub async fn ledger_status(&self) -> LedgerStatus {
        let tail = self.ledger.tail().await;

        LedgerStatus {
            block_count: self.ledger.len().await,
            last_block_timestamp: tail.map(|b| b.timestamp),
            network: self.network.name.clone(),
            status: self.network.status.clone(),
            gas_price: self.network.gas_price.clone(),
            last_sync: Utc::now(),
            contract_address: self.network.contract_address.clone(),
        }
    }

    /// Counts of anchored records by kind.
    pub async fn activity(&self) -> ActivitySummary {
        let blocks = self.ledger.blocks().await;
        let access_grants = blocks.iter().filter(|b| b.kind() == BlockKind::Grant).count();
        let access_revocations = blocks.len() - access_grants;
        let custody_transfers = self.custody.len().await;

        ActivitySummary {
            total_anchors: blocks.len() + custody_transfers,
            access_grants,
            access_revocations,
            custody_transfers,
        }
    }
}
