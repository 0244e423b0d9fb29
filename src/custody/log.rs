//! Custody Event Log
//!
//! Append-only record of evidence changing hands. Histories are returned
//! oldest first so they read as a chronological chain of custody; ACL
//! access logs use the opposite, newest-first convention.

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::custody::event::CustodyEvent;
use crate::error::{require_non_empty, Result};

#[derive(Clone, Default)]
pub struct CustodyLog {
    events: Arc<RwLock<Vec<CustodyEvent>>>,
}

impl CustodyLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a confirmed custody transfer.
    ///
    /// Whether `from_custodian` actually held the evidence is not checked
    /// here; the signature step before this call is trusted for that.
    pub async fn record_transfer(
        &self,
        evidence_fingerprint: &str,
        from_custodian: &str,
        to_custodian: &str,
        reason: &str,
    ) -> Result<CustodyEvent> {
        let validated = require_non_empty("evidenceFingerprint", evidence_fingerprint)
            .and_then(|_| require_non_empty("fromCustodian", from_custodian))
            .and_then(|_| require_non_empty("toCustodian", to_custodian));
        if let Err(e) = validated {
            warn!("Rejected custody transfer: {}", e);
            return Err(e);
        }

        let mut events = self.events.write().await;
        let now = Utc::now();
        let timestamp = match events.last() {
            Some(prev) if prev.timestamp > now => prev.timestamp,
            _ => now,
        };

        let event = CustodyEvent::new(
            events.len() as u64,
            timestamp,
            evidence_fingerprint.to_string(),
            from_custodian.to_string(),
            to_custodian.to_string(),
            reason.to_string(),
        );
        info!("Custody: {} ({})", event.summary(), event.event_id);
        events.push(event.clone());

        Ok(event)
    }

    /// Every event for `evidence_fingerprint`, oldest first.
    pub async fn get_history(&self, evidence_fingerprint: &str) -> Vec<CustodyEvent> {
        let events = self.events.read().await;
        let history: Vec<CustodyEvent> = events
            .iter()
            .filter(|e| e.evidence_fingerprint == evidence_fingerprint)
            .cloned()
            .collect();

        debug!("Custody: {} events for '{}'", history.len(), evidence_fingerprint);
        history
    }

    /// Receiving custodian of the latest transfer.
    pub async fn current_custodian(&self, evidence_fingerprint: &str) -> Option<String> {
        let events = self.events.read().await;
        events
            .iter()
            .rev()
            .find(|e| e.evidence_fingerprint == evidence_fingerprint)
            .map(|e| e.to_custodian.clone())
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}
