//! Token entities for JWT-based authentication.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Default token lifetime (1 hour)
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 3600;

/// Default refresh window around expiry (5 minutes)
pub const DEFAULT_REFRESH_WINDOW_SECONDS: i64 = 300;

/// Claims structure for the JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Owning user
    pub user_id: i64,

    /// Username cached at issuance
    pub username: String,

    /// Issued at timestamp (epoch seconds)
    pub iat: i64,

    /// Expiration timestamp (epoch seconds)
    pub exp: i64,

    /// JWT ID, the unit of revocation
    pub jti: String,
}

impl Claims {
    /// Creates claims for a token issued now and valid for `ttl_seconds`
    ///
    /// Returns `None` when the expiry does not fit a timestamp.
    pub fn new(user_id: i64, username: impl Into<String>, ttl_seconds: i64) -> Option<Self> {
        let iat = Utc::now().timestamp();
        let exp = iat.checked_add(ttl_seconds)?;
        Utc.timestamp_opt(exp, 0).single()?;
        Some(Self {
            user_id,
            username: username.into(),
            iat,
            exp,
            jti: generate_jti(user_id, iat),
        })
    }

    /// Checks if the claims have expired
    ///
    /// A token is already expired at the exact second of `exp`.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp())
    }

    /// Checks expiry against an explicit epoch-second timestamp
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.exp
    }

    /// Seconds until expiry; negative once the token has expired
    pub fn seconds_until_expiry(&self) -> i64 {
        self.seconds_until_expiry_at(Utc::now().timestamp())
    }

    pub fn seconds_until_expiry_at(&self, now: i64) -> i64 {
        self.exp.saturating_sub(now)
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.iat, 0).single()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }

    /// Reads the payload segment of an encoded token WITHOUT checking the signature
    ///
    /// Only for recovering bookkeeping data (the `jti`) from a token this
    /// process already issued or is about to discard. Never use the result to
    /// make a trust decision.
    pub fn peek(token: &str) -> Option<Self> {
        let mut segments = token.split('.');
        let (_header, payload, _signature) = (segments.next()?, segments.next()?, segments.next()?);
        if segments.next().is_some() {
            return None;
        }
        let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}

/// Builds a token identifier of the form `{user_id}_{issued_at}_{random_hex8}`
pub fn generate_jti(user_id: i64, issued_at: i64) -> String {
    let suffix: u32 = rand::thread_rng().gen();
    format!("{}_{}_{:08x}", user_id, issued_at, suffix)
}

/// A freshly issued token together with its bookkeeping data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedToken {
    /// Encoded `header.payload.signature` string
    pub token: String,
    pub jti: String,
    pub user_id: i64,
    pub username: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl IssuedToken {
    /// Lifetime in seconds as seen at issuance
    pub fn expires_in(&self) -> i64 {
        (self.expires_at - self.issued_at).num_seconds()
    }
}

/// Introspection view of a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub user_id: i64,
    pub username: String,
    pub jti: String,
    pub issued_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_expired: bool,
    pub is_revoked: bool,
}
