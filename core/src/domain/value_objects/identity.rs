//! Resolved identity of an authenticated request.

use serde::{Deserialize, Serialize};

/// Which credential path produced an identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMethod {
    Token,
    Cookie,
}

impl AuthMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMethod::Token => "token",
            AuthMethod::Cookie => "cookie",
        }
    }
}

impl std::fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity attached to a request once it reaches `Authenticated`
///
/// Permission checks layered on top use this value regardless of which
/// credential path produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: i64,
    /// Username claim; only present on the token path
    pub username: Option<String>,
    pub auth_method: AuthMethod,
    /// The bearer token the request was authenticated with
    #[serde(skip)]
    pub token: Option<String>,
    pub jti: Option<String>,
}

impl Identity {
    pub fn from_token(user_id: i64, username: String, token: String, jti: String) -> Self {
        Self {
            user_id,
            username: Some(username),
            auth_method: AuthMethod::Token,
            token: Some(token),
            jti: Some(jti),
        }
    }

    pub fn from_cookie(user_id: i64) -> Self {
        Self {
            user_id,
            username: None,
            auth_method: AuthMethod::Cookie,
            token: None,
            jti: None,
        }
    }
}
