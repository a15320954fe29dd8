//! In-memory session records tracked per issued token.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Number of leading token characters shown in session listings
pub const TOKEN_PREVIEW_LENGTH: usize = 20;

/// Liveness record for one issued token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: i64,
    /// Token identifier, when the token payload could be read at registration
    pub jti: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: i64, jti: Option<String>, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            jti,
            created_at: now,
            expires_at,
            last_activity: now,
        }
    }

    /// Whether the underlying token has expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Whether more than `timeout` has elapsed since the last activity
    pub fn is_idle_longer_than(&self, timeout: Duration, now: DateTime<Utc>) -> bool {
        now - self.last_activity > timeout
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_activity = now;
    }
}

/// Detailed view of a single session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub is_expired: bool,
    pub seconds_until_expiry: i64,
}

impl SessionInfo {
    pub fn from_session(session: &Session, now: DateTime<Utc>) -> Self {
        let is_expired = session.is_expired_at(now);
        Self {
            user_id: session.user_id,
            expires_at: session.expires_at,
            last_activity: session.last_activity,
            is_expired,
            seconds_until_expiry: if is_expired {
                0
            } else {
                (session.expires_at - now).num_seconds()
            },
        }
    }
}

/// Redacted listing entry for a user's live sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub token_preview: String,
    pub expires_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl SessionSummary {
    pub fn new(token: &str, session: &Session) -> Self {
        Self {
            token_preview: preview_token(token),
            expires_at: session.expires_at,
            last_activity: session.last_activity,
        }
    }
}

fn preview_token(token: &str) -> String {
    let prefix: String = token.chars().take(TOKEN_PREVIEW_LENGTH).collect();
    format!("{}...", prefix)
}
