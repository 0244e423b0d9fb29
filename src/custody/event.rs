use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A transfer of evidence between custodians
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustodyEvent {
    pub event_id: String,
    pub sequence: u64,
    pub evidence_fingerprint: String,
    pub from_custodian: String,
    pub to_custodian: String,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
    pub confirmed: bool,
}

impl CustodyEvent {
    pub(crate) fn new(
        sequence: u64,
        timestamp: DateTime<Utc>,
        evidence_fingerprint: String,
        from_custodian: String,
        to_custodian: String,
        reason: String,
    ) -> Self {
        Self {
            event_id: format!("cev-{}", Uuid::new_v4().simple()),
            sequence,
            evidence_fingerprint,
            from_custodian,
            to_custodian,
            reason,
            timestamp,
            confirmed: true,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{} -> {} ({})",
            self.from_custodian, self.to_custodian, self.evidence_fingerprint
        )
    }
}
