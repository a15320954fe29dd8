use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tg_core::domain::entities::{RevokedToken, SessionInfo, SessionSummary};

/// Success envelope: `{ "success": true, "data": ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub token: String,
    pub expires_in: i64,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionsResponse {
    pub sessions: Vec<SessionSummary>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RevokeAllQuery {
    /// Keep the session of the token making the request
    #[serde(default)]
    pub keep_current: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevokeAllResponse {
    pub success: bool,
    pub message: String,
    pub revoked_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfoResponse {
    pub session_info: Option<SessionInfo>,
    pub user_id: i64,
    pub username: String,
    pub jti: String,
    pub exp: Option<DateTime<Utc>>,
    pub iat: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlacklistInfoResponse {
    pub total_blacklisted: usize,
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlacklistCleanupResponse {
    pub removed_count: usize,
    pub remaining_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserBlacklistedTokensResponse {
    pub tokens: Vec<RevokedToken>,
    pub total_blacklisted: usize,
}
