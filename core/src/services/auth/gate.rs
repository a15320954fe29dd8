//! Request-time authentication and token lifecycle facade

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::entities::revocation::{REASON_LOGOUT, REASON_SESSION_TIMEOUT};
use crate::domain::entities::session::{SessionInfo, SessionSummary};
use crate::domain::entities::token::{Claims, IssuedToken, TokenInfo};
use crate::domain::value_objects::{CookieCredential, Credential, Identity, TokenCredential};
use crate::errors::{AuthError, DomainError};
use crate::repositories::{RevocationRepository, UserDirectory};
use crate::services::session::SessionRegistry;
use crate::services::token::TokenCodec;

use super::config::AuthGateConfig;

/// Step of the token path at which a request was turned away
#[derive(Debug, Clone, Copy)]
enum Stage {
    Signature,
    Revocation,
    Account,
    Timeout,
}

/// Authentication gate combining the codec, the session registry and the
/// revocation store
pub struct AuthGate<R: RevocationRepository + ?Sized> {
    codec: TokenCodec,
    sessions: Arc<SessionRegistry<R>>,
    revocations: Arc<R>,
    users: Arc<dyn UserDirectory>,
    config: AuthGateConfig,
}

impl<R: RevocationRepository + ?Sized> AuthGate<R> {
    /// Create a new gate
    ///
    /// # Arguments
    ///
    /// * `codec` - Token codec
    /// * `sessions` - Session registry; its revocation store is shared with the gate
    /// * `users` - Account-status lookup
    /// * `config` - Gate configuration
    pub fn new(
        codec: TokenCodec,
        sessions: Arc<SessionRegistry<R>>,
        users: Arc<dyn UserDirectory>,
        config: AuthGateConfig,
    ) -> Self {
        let revocations = sessions.revocations().clone();
        Self {
            codec,
            sessions,
            revocations,
            users,
            config,
        }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    pub fn sessions(&self) -> &Arc<SessionRegistry<R>> {
        &self.sessions
    }

    pub fn revocations(&self) -> &Arc<R> {
        &self.revocations
    }

    /// Issues a token and registers its session
    pub fn issue(
        &self,
        user_id: i64,
        username: &str,
        ttl_seconds: Option<i64>,
    ) -> Result<IssuedToken, DomainError> {
        let issued = self.codec.issue(user_id, username, ttl_seconds)?;
        self.sessions
            .register(issued.user_id, &issued.token, issued.expires_at);
        info!(user_id, jti = %issued.jti, "Token issued");
        Ok(issued)
    }

    /// Authenticates a request
    ///
    /// A bearer token is checked in order: signature and expiry, revocation,
    /// account status, inactivity. Every token failure except the timeout is
    /// reported as [`AuthError::InvalidToken`]. Without a token the cookie
    /// identity is accepted if the account is active.
    ///
    /// # Returns
    ///
    /// * `Ok(Identity)` - The authenticated identity
    /// * `Err(AuthError)` - `InvalidToken`, `SessionTimeout` or `Unauthorized`
    pub async fn authenticate(&self, credential: Option<Credential>) -> Result<Identity, AuthError> {
        match credential {
            Some(Credential::Token(TokenCredential { token })) => {
                self.authenticate_token(token).await
            }
            Some(Credential::Cookie(CookieCredential { user_id })) => {
                if self.user_is_active(user_id).await {
                    Ok(Identity::from_cookie(user_id))
                } else {
                    debug!(user_id, "Cookie identity rejected: account not active");
                    Err(AuthError::Unauthorized)
                }
            }
            None => Err(AuthError::Unauthorized),
        }
    }

    async fn authenticate_token(&self, token: String) -> Result<Identity, AuthError> {
        let claims = match self.codec.verify(&token) {
            Ok(claims) => claims,
            Err(e) => {
                debug!(stage = ?Stage::Signature, error = %e, "Token rejected");
                return Err(AuthError::InvalidToken);
            }
        };

        if self.revocations.contains(&claims.jti) {
            return Err(self.reject(Stage::Revocation, &claims, AuthError::InvalidToken));
        }

        if !self.user_is_active(claims.user_id).await {
            return Err(self.reject(Stage::Account, &claims, AuthError::InvalidToken));
        }

        if self
            .sessions
            .is_idle_longer_than(&token, self.config.session_timeout)
        {
            self.revoke(&claims, REASON_SESSION_TIMEOUT);
            self.sessions.remove(&token);
            return Err(self.reject(Stage::Timeout, &claims, AuthError::SessionTimeout));
        }

        self.sessions.touch(&token);

        Ok(Identity::from_token(
            claims.user_id,
            claims.username,
            token,
            claims.jti,
        ))
    }

    fn reject(&self, stage: Stage, claims: &Claims, error: AuthError) -> AuthError {
        debug!(stage = ?stage, user_id = claims.user_id, jti = %claims.jti, "Token rejected");
        error
    }

    /// Lookup failures count as inactive
    async fn user_is_active(&self, user_id: i64) -> bool {
        match self.users.is_active(user_id).await {
            Ok(active) => active,
            Err(e) => {
                warn!(user_id, error = %e, "User lookup failed, treating account as inactive");
                false
            }
        }
    }

    fn revoke(&self, claims: &Claims, reason: &str) {
        if let Err(e) = self.revocations.add(
            &claims.jti,
            reason,
            claims.expires_at(),
            Some(claims.user_id),
        ) {
            warn!(jti = %claims.jti, reason, error = %e, "Failed to persist token revocation");
        }
    }

    /// Exchanges a token near its expiry for a new one
    ///
    /// The old session is dropped and the new token registered.
    pub fn refresh(&self, old_token: &str) -> Result<IssuedToken, DomainError> {
        let issued = self.codec.refresh(old_token, self.revocations.as_ref())?;

        self.sessions.remove(old_token);
        self.sessions
            .register(issued.user_id, &issued.token, issued.expires_at);

        info!(user_id = issued.user_id, jti = %issued.jti, "Token refreshed");
        Ok(issued)
    }

    /// Revokes a token and drops its session
    ///
    /// Expired tokens with a valid signature can still be logged out.
    pub fn logout(&self, token: &str) -> Result<(), DomainError> {
        let claims = self.codec.decode(token)?;

        self.revoke(&claims, REASON_LOGOUT);
        self.sessions.remove(token);

        info!(user_id = claims.user_id, jti = %claims.jti, "Logged out");
        Ok(())
    }

    /// Revokes every session of a user, optionally keeping one token
    pub fn revoke_all_sessions(&self, user_id: i64, except: Option<&str>) -> usize {
        self.sessions.revoke_all(user_id, except)
    }

    pub fn token_info(&self, token: &str) -> Result<TokenInfo, DomainError> {
        self.codec.inspect(token, self.revocations.as_ref())
    }

    pub fn session_info(&self, token: &str) -> Option<SessionInfo> {
        self.sessions.session_info(token)
    }

    pub fn user_sessions(&self, user_id: i64) -> Vec<SessionSummary> {
        self.sessions.user_sessions(user_id)
    }
}
