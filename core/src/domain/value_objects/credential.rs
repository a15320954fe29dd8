//! Credentials a request can present to the authentication gate.

/// Bearer token taken from an `Authorization: Bearer <token>` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenCredential {
    pub token: String,
}

/// Identity resolved by the ambient session-cookie layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookieCredential {
    pub user_id: i64,
}

/// The single credential a request is authenticated with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    Token(TokenCredential),
    Cookie(CookieCredential),
}

impl Credential {
    pub fn token(token: impl Into<String>) -> Self {
        Credential::Token(TokenCredential { token: token.into() })
    }

    pub fn cookie(user_id: i64) -> Self {
        Credential::Cookie(CookieCredential { user_id })
    }

    /// Picks the credential for a request; a bearer token always wins over the cookie
    pub fn from_parts(bearer: Option<&str>, cookie_user: Option<i64>) -> Option<Self> {
        match (bearer, cookie_user) {
            (Some(token), _) => Some(Self::token(token)),
            (None, Some(user_id)) => Some(Self::cookie(user_id)),
            (None, None) => None,
        }
    }

    /// Parses an `Authorization` header value of the form `Bearer <token>`
    pub fn bearer_from_header(value: &str) -> Option<&str> {
        value
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }
}
