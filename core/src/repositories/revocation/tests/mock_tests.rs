//! Tests for the mock revocation repository, which the service tests rely on

use chrono::{Duration, Utc};

use crate::domain::entities::revocation::{RevocationDocument, RevocationEntry};
use crate::repositories::revocation::{MockRevocationRepository, RevocationRepository};

#[test]
fn test_add_is_idempotent() {
    let repo = MockRevocationRepository::new();

    repo.add("jti-1", "logout", None, Some(1)).unwrap();
    repo.add("jti-1", "logout", None, Some(1)).unwrap();

    assert!(repo.contains("jti-1"));
    assert_eq!(repo.count(), 1);
}

#[test]
fn test_try_add_only_inserts_once() {
    let repo = MockRevocationRepository::new();

    assert!(repo.try_add("jti-1", "refreshed", None, None).unwrap());
    assert!(!repo.try_add("jti-1", "refreshed", None, None).unwrap());
    assert_eq!(repo.count(), 1);
}

#[test]
fn test_failed_write_keeps_in_memory_entry() {
    let repo = MockRevocationRepository::new();
    repo.set_fail_writes(true);

    assert!(repo.add("jti-1", "logout", None, None).is_err());
    assert!(repo.contains("jti-1"));
}

#[test]
fn test_import_prunes_stale_entries() {
    let repo = MockRevocationRepository::new();
    let mut document = RevocationDocument::default();
    let mut stale = RevocationEntry::new("logout", None, None);
    stale.added_at = Utc::now() - Duration::days(8);
    document.blacklist.push("stale".to_string());
    document.metadata.insert("stale".to_string(), stale);
    document.blacklist.push("fresh".to_string());
    document
        .metadata
        .insert("fresh".to_string(), RevocationEntry::new("logout", None, None));

    repo.import(document, true).unwrap();

    assert!(repo.contains("fresh"));
    assert!(!repo.contains("stale"));
}
