//! Domain entities for tokens, sessions and revocations.

pub mod revocation;
pub mod session;
pub mod token;

// Re-export commonly used types
pub use revocation::{
    RetentionPolicy, RevocationDocument, RevocationEntry, RevokedToken, REASON_LOGOUT,
    REASON_MANUAL, REASON_REFRESHED, REASON_REVOKE_ALL, REASON_SESSION_TIMEOUT, REASON_UNKNOWN,
};
pub use session::{Session, SessionInfo, SessionSummary};
pub use token::{
    generate_jti, Claims, IssuedToken, TokenInfo, DEFAULT_REFRESH_WINDOW_SECONDS,
    DEFAULT_TOKEN_TTL_SECONDS,
};
