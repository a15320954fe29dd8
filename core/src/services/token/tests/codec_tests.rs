//! Unit tests for the token codec

use chrono::Utc;
use jsonwebtoken::Algorithm;

use crate::domain::entities::revocation::REASON_REFRESHED;
use crate::domain::entities::token::Claims;
use crate::errors::{DomainError, TokenError};
use crate::repositories::{MockRevocationRepository, RevocationRepository};
use crate::services::token::{TokenCodec, TokenCodecConfig};

const SECRET: &str = "test-secret-key-for-codec";

fn create_codec() -> TokenCodec {
    TokenCodec::new(TokenCodecConfig::new(SECRET)).unwrap()
}

fn claims_with(user_id: i64, iat: i64, exp: i64) -> Claims {
    Claims {
        user_id,
        username: "alice".to_string(),
        iat,
        exp,
        jti: format!("{}_{}_0badf00d", user_id, iat),
    }
}

fn assert_token_error(result: Result<impl std::fmt::Debug, DomainError>, expected: TokenError) {
    match result {
        Err(DomainError::Token(actual)) => assert_eq!(actual, expected),
        other => panic!("expected {:?}, got {:?}", expected, other),
    }
}

#[test]
fn test_issue_then_verify() {
    let codec = create_codec();
    let issued = codec.issue(42, "alice", None).unwrap();

    assert_eq!(issued.token.split('.').count(), 3);
    assert_eq!(issued.expires_in(), 3600);
    assert!(issued.jti.starts_with("42_"));

    let claims = codec.verify(&issued.token).unwrap();
    assert_eq!(claims.user_id, 42);
    assert_eq!(claims.username, "alice");
    assert_eq!(claims.jti, issued.jti);
    assert_eq!(claims.exp - claims.iat, 3600);
}

#[test]
fn test_issue_rejects_non_positive_ttl() {
    let codec = create_codec();
    assert!(matches!(
        codec.issue(1, "alice", Some(0)),
        Err(DomainError::Validation { .. })
    ));
    assert!(codec.issue(1, "alice", Some(-5)).is_err());
}

#[test]
fn test_issue_rejects_ttl_past_timestamp_range() {
    let codec = create_codec();
    assert!(matches!(
        codec.issue(1, "alice", Some(i64::MAX)),
        Err(DomainError::Validation { .. })
    ));
    // Representable as i64 but beyond what a timestamp can hold
    assert!(matches!(
        codec.issue(1, "alice", Some(i64::MAX / 2)),
        Err(DomainError::Validation { .. })
    ));
}

#[test]
fn test_verify_fails_at_exact_expiry() {
    let codec = create_codec();
    let now = Utc::now().timestamp();
    let token = codec.encode_claims(&claims_with(1, now - 10, now)).unwrap();

    assert_token_error(codec.verify(&token), TokenError::TokenExpired);
}

#[test]
fn test_verify_fails_after_short_ttl() {
    let codec = create_codec();
    let issued = codec.issue(1, "alice", Some(1)).unwrap();

    std::thread::sleep(std::time::Duration::from_millis(2100));

    assert_token_error(codec.verify(&issued.token), TokenError::TokenExpired);
}

#[test]
fn test_verify_rejects_swapped_payload() {
    let codec = create_codec();
    let first = codec.issue(1, "alice", None).unwrap();
    let second = codec.issue(2, "bob", None).unwrap();

    let first_parts: Vec<&str> = first.token.split('.').collect();
    let second_parts: Vec<&str> = second.token.split('.').collect();
    let tampered = format!("{}.{}.{}", first_parts[0], second_parts[1], first_parts[2]);

    assert_token_error(codec.verify(&tampered), TokenError::InvalidSignature);
}

#[test]
fn test_verify_rejects_foreign_secret() {
    let codec = create_codec();
    let other = TokenCodec::new(TokenCodecConfig::new("some-other-secret")).unwrap();
    let issued = other.issue(1, "alice", None).unwrap();

    assert_token_error(codec.verify(&issued.token), TokenError::InvalidSignature);
}

#[test]
fn test_verify_rejects_algorithm_mismatch() {
    let codec = create_codec();
    let hs512 = TokenCodec::new(TokenCodecConfig {
        algorithm: Algorithm::HS512,
        ..TokenCodecConfig::new(SECRET)
    })
    .unwrap();
    let issued = hs512.issue(1, "alice", None).unwrap();

    assert_token_error(codec.verify(&issued.token), TokenError::InvalidAlgorithm);
}

#[test]
fn test_verify_rejects_malformed() {
    let codec = create_codec();

    assert_token_error(codec.verify("garbage"), TokenError::InvalidTokenFormat);
    assert_token_error(codec.verify("a.b.c"), TokenError::InvalidTokenFormat);
    assert_token_error(codec.verify(""), TokenError::InvalidTokenFormat);
}

#[test]
fn test_decode_ignores_expiry() {
    let codec = create_codec();
    let now = Utc::now().timestamp();
    let token = codec.encode_claims(&claims_with(5, now - 7200, now - 3600)).unwrap();

    let claims = codec.decode(&token).unwrap();
    assert_eq!(claims.user_id, 5);
    assert!(codec.verify(&token).is_err());
}

#[test]
fn test_decode_rejects_exp_not_after_iat() {
    let codec = create_codec();
    let now = Utc::now().timestamp();
    let token = codec.encode_claims(&claims_with(5, now + 100, now + 100)).unwrap();

    assert_token_error(codec.decode(&token), TokenError::InvalidTokenFormat);
}

#[test]
fn test_refresh_too_early_is_rejected() {
    let codec = create_codec();
    let store = MockRevocationRepository::new();
    let issued = codec.issue(1, "alice", None).unwrap();

    assert_token_error(
        codec.refresh(&issued.token, &store),
        TokenError::OutsideRefreshWindow,
    );

    // The rejected token is untouched
    assert!(codec.verify(&issued.token).is_ok());
    assert_eq!(store.count(), 0);
}

#[test]
fn test_refresh_near_expiry_revokes_old_token() {
    let codec = create_codec();
    let store = MockRevocationRepository::new();
    let old = codec.issue(7, "alice", Some(200)).unwrap();

    let new = codec.refresh(&old.token, &store).unwrap();

    assert_eq!(new.user_id, 7);
    assert_eq!(new.username, "alice");
    assert_ne!(new.jti, old.jti);
    assert_eq!(new.expires_in(), 3600);

    let entry = store.get(&old.jti).unwrap();
    assert_eq!(entry.reason, REASON_REFRESHED);
    assert_eq!(entry.user_id, Some(7));
    assert_eq!(entry.expires_at, Some(old.expires_at));

    assert!(codec.verify(&new.token).is_ok());
}

#[test]
fn test_refresh_twice_fails_second_time() {
    let codec = create_codec();
    let store = MockRevocationRepository::new();
    let old = codec.issue(7, "alice", Some(200)).unwrap();

    codec.refresh(&old.token, &store).unwrap();
    assert_token_error(codec.refresh(&old.token, &store), TokenError::TokenRevoked);
}

#[test]
fn test_refresh_recently_expired_token() {
    let codec = create_codec();
    let store = MockRevocationRepository::new();
    let now = Utc::now().timestamp();
    let token = codec.encode_claims(&claims_with(3, now - 3600, now - 10)).unwrap();

    let new = codec.refresh(&token, &store).unwrap();
    assert_eq!(new.user_id, 3);
}

#[test]
fn test_refresh_long_expired_token_is_rejected() {
    let codec = create_codec();
    let store = MockRevocationRepository::new();
    let now = Utc::now().timestamp();
    let token = codec.encode_claims(&claims_with(3, now - 7200, now - 400)).unwrap();

    assert_token_error(codec.refresh(&token, &store), TokenError::OutsideRefreshWindow);
}

#[test]
fn test_refresh_revoked_token_is_rejected() {
    let codec = create_codec();
    let store = MockRevocationRepository::new();
    let old = codec.issue(3, "alice", Some(60)).unwrap();
    store.add(&old.jti, "logout", Some(old.expires_at), Some(3)).unwrap();

    assert_token_error(codec.refresh(&old.token, &store), TokenError::TokenRevoked);
}

#[test]
fn test_refresh_survives_persist_failure() {
    let codec = create_codec();
    let store = MockRevocationRepository::new();
    store.set_fail_writes(true);
    let old = codec.issue(3, "alice", Some(60)).unwrap();

    assert!(codec.refresh(&old.token, &store).is_ok());
    assert!(store.contains(&old.jti));
}

#[test]
fn test_refresh_rejects_bad_signature() {
    let codec = create_codec();
    let store = MockRevocationRepository::new();
    let other = TokenCodec::new(TokenCodecConfig::new("some-other-secret")).unwrap();
    let foreign = other.issue(3, "alice", Some(60)).unwrap();

    assert_token_error(codec.refresh(&foreign.token, &store), TokenError::InvalidSignature);
    assert_eq!(store.count(), 0);
}

#[test]
fn test_inspect_reports_state() {
    let codec = create_codec();
    let store = MockRevocationRepository::new();
    let now = Utc::now().timestamp();
    let expired = codec.encode_claims(&claims_with(9, now - 100, now - 50)).unwrap();

    let info = codec.inspect(&expired, &store).unwrap();
    assert_eq!(info.user_id, 9);
    assert!(info.is_expired);
    assert!(!info.is_revoked);

    store.add(&info.jti, "logout", None, Some(9)).unwrap();
    assert!(codec.inspect(&expired, &store).unwrap().is_revoked);
}
