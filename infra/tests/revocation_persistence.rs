//! Integration tests for the file-backed revocation store together with
//! the core services

use std::sync::Arc;
use std::thread;
use tempfile::tempdir;
use tg_core::domain::entities::RetentionPolicy;
use tg_core::domain::value_objects::Credential;
use tg_core::errors::AuthError;
use tg_core::repositories::RevocationRepository;
use tg_core::services::{AuthGate, AuthGateConfig, SessionRegistry, TokenCodec, TokenCodecConfig};
use tg_infra::{FileRevocationStore, InMemoryUserDirectory};

fn build_gate(store: Arc<FileRevocationStore>) -> AuthGate<FileRevocationStore> {
    let codec = TokenCodec::new(TokenCodecConfig::new("integration-secret")).unwrap();
    let sessions = Arc::new(SessionRegistry::new(store));
    AuthGate::new(
        codec,
        sessions,
        Arc::new(InMemoryUserDirectory::permissive()),
        AuthGateConfig::default(),
    )
}

#[tokio::test]
async fn test_logged_out_token_stays_revoked_after_restart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("token_blacklist.json");

    let token = {
        let store = Arc::new(FileRevocationStore::open(&path, RetentionPolicy::default()));
        let gate = build_gate(store);
        let issued = gate.issue(11, "dana", None).unwrap();

        gate.authenticate(Some(Credential::token(issued.token.clone())))
            .await
            .unwrap();
        gate.logout(&issued.token).unwrap();
        issued.token
    };

    // Fresh process: sessions are gone, revocations are not
    let store = Arc::new(FileRevocationStore::open(&path, RetentionPolicy::default()));
    let gate = build_gate(store.clone());
    gate.sessions().register(11, &token, chrono::Utc::now() + chrono::Duration::hours(1));

    assert_eq!(
        gate.authenticate(Some(Credential::token(token))).await,
        Err(AuthError::InvalidToken)
    );
    assert_eq!(store.count(), 1);
}

#[test]
fn test_concurrent_adds_are_all_persisted() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("token_blacklist.json");
    let store = Arc::new(FileRevocationStore::open(&path, RetentionPolicy::default()));

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let store = store.clone();
            thread::spawn(move || {
                for i in 0..10 {
                    store
                        .add(&format!("{}_{}_00000000", worker, i), "logout", None, Some(worker))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.count(), 80);
    let reopened = FileRevocationStore::open(&path, RetentionPolicy::default());
    assert_eq!(reopened.count(), 80);
    assert_eq!(reopened.entries_for_user(3).len(), 10);
}

#[test]
fn test_concurrent_refresh_has_one_winner() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("token_blacklist.json");
    let store = Arc::new(FileRevocationStore::open(&path, RetentionPolicy::default()));
    let codec = Arc::new(TokenCodec::new(TokenCodecConfig::new("integration-secret")).unwrap());
    let old = codec.issue(5, "eve", Some(60)).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            let codec = codec.clone();
            let token = old.token.clone();
            thread::spawn(move || codec.refresh(&token, store.as_ref()).is_ok())
        })
        .collect();
    let winners = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .filter(|won| *won)
        .count();

    assert_eq!(winners, 1);
    assert!(store.contains(&old.jti));
}
