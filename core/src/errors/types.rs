//! Error types for token handling and request authentication
//!
//! Messages are bilingual (English | Chinese). [`AuthError`] is the taxonomy
//! surfaced to callers; [`TokenError`] carries the internal reason a token
//! was rejected and is collapsed into [`AuthError::InvalidToken`] at the gate.

use tg_shared::errors::{error_codes, ErrorResponse, IntoErrorResponse};
use thiserror::Error;

/// Authentication outcomes surfaced to the request layer
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// Malformed, badly signed, expired or revoked token
    #[error("Invalid or expired token | Token无效或已过期")]
    InvalidToken,

    /// Valid token whose session has been idle for too long
    #[error("Session timed out | 会话超时")]
    SessionTimeout,

    /// No credential of any kind
    #[error("Login required to access this resource | 需要登录才能访问此资源")]
    Unauthorized,

    /// Authenticated but lacking a required grant
    #[error("Insufficient permissions | 权限不足")]
    InsufficientPermissions,
}

impl AuthError {
    /// Stable error code for programmatic handling
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidToken => error_codes::INVALID_TOKEN,
            AuthError::SessionTimeout => error_codes::SESSION_TIMEOUT,
            AuthError::Unauthorized => error_codes::UNAUTHORIZED,
            AuthError::InsufficientPermissions => error_codes::INSUFFICIENT_PERMISSIONS,
        }
    }
}

impl IntoErrorResponse for AuthError {
    fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse::new(self.code(), self.to_string())
    }
}

/// Token-related errors with bilingual messages
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired | 令牌已过期")]
    TokenExpired,

    #[error("Invalid token format | 无效的令牌格式")]
    InvalidTokenFormat,

    #[error("Token signature verification failed | 令牌签名验证失败")]
    InvalidSignature,

    #[error("Token algorithm mismatch | 令牌算法不匹配")]
    InvalidAlgorithm,

    #[error("Token revoked | 令牌已被撤销")]
    TokenRevoked,

    #[error("Token is outside the refresh window | 令牌不在刷新窗口期内")]
    OutsideRefreshWindow,

    #[error("Token generation failed | 令牌生成失败")]
    TokenGenerationFailed,
}

impl TokenError {
    pub fn code(&self) -> &'static str {
        match self {
            TokenError::TokenExpired => "TOKEN_EXPIRED",
            TokenError::InvalidTokenFormat => "INVALID_TOKEN_FORMAT",
            TokenError::InvalidSignature => "INVALID_SIGNATURE",
            TokenError::InvalidAlgorithm => "INVALID_ALGORITHM",
            TokenError::TokenRevoked => "TOKEN_REVOKED",
            TokenError::OutsideRefreshWindow => "OUTSIDE_REFRESH_WINDOW",
            TokenError::TokenGenerationFailed => "TOKEN_GENERATION_FAILED",
        }
    }
}

/// Helper function to extract English message from bilingual error
pub fn extract_english_message(message: &str) -> &str {
    message.split(" | ").next().unwrap_or(message)
}

/// Helper function to extract Chinese message from bilingual error
pub fn extract_chinese_message(message: &str) -> &str {
    message.split(" | ").nth(1).unwrap_or(message)
}
