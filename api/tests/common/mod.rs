//! Shared fixtures for the HTTP integration tests

#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header::{HeaderName, AUTHORIZATION};
use actix_web::http::StatusCode;
use actix_web::{test, web};
use chrono::Duration;
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;

use tg_api::middleware::CookieSessionResolver;
use tg_api::AppState;
use tg_core::domain::entities::RetentionPolicy;
use tg_core::repositories::{RevocationRepository, UserDirectory};
use tg_core::services::{AuthGate, AuthGateConfig, SessionRegistry, TokenCodec, TokenCodecConfig};
use tg_infra::{FileRevocationStore, InMemoryUserDirectory};

pub const SECRET: &str = "api-test-secret";
pub const COOKIE_NAME: &str = "tg_test_session";

/// Cookie values of the form `user-{id}` resolve to `id`
pub struct PrefixCookieResolver;

impl CookieSessionResolver for PrefixCookieResolver {
    fn resolve(&self, cookie_value: &str) -> Option<i64> {
        cookie_value.strip_prefix("user-")?.parse().ok()
    }
}

pub struct TestContext {
    pub state: web::Data<AppState>,
    pub store: Arc<FileRevocationStore>,
    pub users: Arc<InMemoryUserDirectory>,
    // Owns the directory holding the revocation file
    pub dir: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_timeout(Duration::minutes(30))
    }

    pub fn with_timeout(session_timeout: Duration) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileRevocationStore::open(
            dir.path().join("blacklist.json"),
            RetentionPolicy::default(),
        ));
        let revocations: Arc<dyn RevocationRepository> = store.clone();
        let sessions = Arc::new(SessionRegistry::new(revocations));

        let users = Arc::new(InMemoryUserDirectory::with_active([1, 2, 3]));
        let directory: Arc<dyn UserDirectory> = users.clone();

        let codec = TokenCodec::new(TokenCodecConfig::new(SECRET)).unwrap();
        let gate = AuthGate::new(codec, sessions, directory, AuthGateConfig { session_timeout });

        let state = AppState::new(gate)
            .with_blacklist_path(store.path())
            .with_cookie_resolver(COOKIE_NAME, Arc::new(PrefixCookieResolver));

        Self {
            state: web::Data::new(state),
            store,
            users,
            dir,
        }
    }

    /// Issues a registered token
    pub fn login(&self, user_id: i64, username: &str) -> String {
        self.state.gate.issue(user_id, username, None).unwrap().token
    }

    pub fn login_with_ttl(&self, user_id: i64, username: &str, ttl_seconds: i64) -> String {
        self.state
            .gate
            .issue(user_id, username, Some(ttl_seconds))
            .unwrap()
            .token
    }
}

pub fn bearer(token: &str) -> (HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {}", token))
}

/// Calls the service and returns status and JSON body
///
/// Middleware rejections come back as `Err`; they are rendered the way the
/// server renders them.
pub async fn send<S, R, B>(app: &S, req: R) -> (StatusCode, Value)
where
    S: Service<R, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    match app.call(req).await {
        Ok(resp) => {
            let status = resp.status();
            let body = test::read_body(resp).await;
            (status, parse(&body))
        }
        Err(err) => {
            let resp = err.error_response();
            let status = resp.status();
            let body = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
            (status, parse(&body))
        }
    }
}

fn parse(body: &[u8]) -> Value {
    if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(body).unwrap()
    }
}
