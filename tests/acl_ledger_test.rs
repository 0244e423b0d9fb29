//! Access control ledger properties
//!
//! End-to-end checks of last-writer-wins resolution through the public API.

use custody_ledger::acl::{AclLedger, BlockKind, OWNER_PERMISSION};
use custody_ledger::LedgerError;

#[tokio::test]
async fn test_no_blocks_means_no_access() {
    let ledger = AclLedger::new();
    for permission in ["read", "write", OWNER_PERMISSION, "anything"] {
        assert!(!ledger.check_access("case-file-404", "nobody", permission).await);
    }

    ledger.grant("case-file-001", "someone", "read", "system").await.unwrap();
    assert!(!ledger.check_access("case-file-001", "nobody", "read").await);
    assert!(!ledger.check_access("case-file-404", "someone", "read").await);
}

#[tokio::test]
async fn test_read_grant_is_exact() {
    let ledger = AclLedger::new();
    ledger.grant("f", "u", "read", "actor").await.unwrap();

    assert!(ledger.check_access("f", "u", "read").await);
    assert!(!ledger.check_access("f", "u", "write").await);
}

#[tokio::test]
async fn test_owner_satisfies_any_permission() {
    let ledger = AclLedger::new();
    ledger.grant("f", "u", OWNER_PERMISSION, "actor").await.unwrap();

    for permission in ["read", "write", "delete", OWNER_PERMISSION] {
        assert!(ledger.check_access("f", "u", permission).await);
    }
}

#[tokio::test]
async fn test_revoke_after_grant_denies() {
    let ledger = AclLedger::new();
    ledger.grant("f", "u", "read", "a1").await.unwrap();
    ledger.revoke("f", "u", "a2").await.unwrap();

    assert!(!ledger.check_access("f", "u", "read").await);
}

#[tokio::test]
async fn test_grant_after_revoke_allows() {
    let ledger = AclLedger::new();
    ledger.revoke("f", "u", "a1").await.unwrap();
    ledger.grant("f", "u", "read", "a2").await.unwrap();

    assert!(ledger.check_access("f", "u", "read").await);
}

#[tokio::test]
async fn test_access_logs_newest_first_and_complete() {
    let ledger = AclLedger::new();
    ledger.grant("f", "alice", OWNER_PERMISSION, "system").await.unwrap();
    ledger.grant("other", "bob", "read", "system").await.unwrap();
    ledger.grant("f", "bob", "read", "alice").await.unwrap();
    ledger.revoke("f", "bob", "alice").await.unwrap();
    ledger.grant("f", "carol", "write", "alice").await.unwrap();

    let logs = ledger.get_access_logs("f").await;
    assert_eq!(logs.len(), 4);
    assert!(logs.iter().all(|b| b.file_id() == "f"));
    for pair in logs.windows(2) {
        assert!(pair[0].timestamp >= pair[1].timestamp);
        assert!(pair[0].sequence > pair[1].sequence);
    }
    assert_eq!(logs[0].user_id(), "carol");
    assert_eq!(logs[1].kind(), BlockKind::Revoke);

    assert!(ledger.get_access_logs("never-seen").await.is_empty());
}

#[tokio::test]
async fn test_case_file_scenario() {
    let ledger = AclLedger::new();
    ledger
        .grant("case-file-001", "officer-jones", OWNER_PERMISSION, "system")
        .await
        .unwrap();
    ledger
        .grant("case-file-001", "prosecutor-smith", "read", "officer-jones")
        .await
        .unwrap();

    assert!(ledger.check_access("case-file-001", "officer-jones", "write").await);
    assert!(!ledger.check_access("case-file-001", "prosecutor-smith", "write").await);
    assert!(ledger.check_access("case-file-001", "prosecutor-smith", "read").await);
    assert_eq!(ledger.get_access_logs("case-file-001").await.len(), 2);
}

#[tokio::test]
async fn test_invalid_grant_leaves_ledger_untouched() {
    let ledger = AclLedger::new();
    ledger.grant("f", "u", "read", "a").await.unwrap();
    let tail_before = ledger.tail().await.unwrap();

    let err = ledger.grant("f", "u", "", "a").await.unwrap_err();
    assert!(matches!(err, LedgerError::InvalidArgument(_)));
    let err = ledger.revoke("", "u", "a").await.unwrap_err();
    assert!(matches!(err, LedgerError::InvalidArgument(_)));

    assert_eq!(ledger.len().await, 1);
    assert_eq!(ledger.tail().await.unwrap(), tail_before);
}

#[tokio::test]
async fn test_chain_stays_verifiable() {
    let ledger = AclLedger::new();
    for i in 0..10 {
        let user = format!("user-{}", i % 3);
        if i % 4 == 3 {
            ledger.revoke("f", &user, "system").await.unwrap();
        } else {
            ledger.grant("f", &user, "read", "system").await.unwrap();
        }
    }

    let report = ledger.verify().await.unwrap();
    assert_eq!(report.block_count, 10);
    assert_eq!(report.head_hash, ledger.tail().await.unwrap().block_hash);
}
