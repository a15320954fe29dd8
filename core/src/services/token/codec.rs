//! Token codec: issues, verifies, decodes and refreshes signed bearer tokens

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, warn};

use crate::domain::entities::revocation::REASON_REFRESHED;
use crate::domain::entities::token::{Claims, IssuedToken, TokenInfo};
use crate::errors::{DomainError, TokenError};
use crate::repositories::RevocationRepository;

use super::config::TokenCodecConfig;

/// Stateless codec for the `header.payload.signature` bearer token
///
/// Holds only the keys derived from its configuration; session registration
/// and revocation bookkeeping belong to the caller.
pub struct TokenCodec {
    config: TokenCodecConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Creates a new codec
    ///
    /// # Returns
    ///
    /// A new `TokenCodec`, or a validation error when the configuration names
    /// a non-HMAC algorithm, an empty secret or a non-positive TTL
    pub fn new(config: TokenCodecConfig) -> Result<Self, DomainError> {
        config.validate()?;

        let encoding_key = EncodingKey::from_secret(config.secret_key.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret_key.as_bytes());

        // Expiry is checked by `verify` itself so that `now == exp` is rejected
        // without the library's leeway.
        let mut validation = Validation::new(config.algorithm);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        })
    }

    pub fn config(&self) -> &TokenCodecConfig {
        &self.config
    }

    /// Issues a token for a user
    ///
    /// # Arguments
    ///
    /// * `user_id` - Owning user
    /// * `username` - Username cached in the claims
    /// * `ttl_seconds` - Lifetime; `None` uses the configured default
    ///
    /// # Returns
    ///
    /// * `Ok(IssuedToken)` - The encoded token and its `jti`
    /// * `Err(DomainError)` - Non-positive or out-of-range TTL, or signing failure
    pub fn issue(
        &self,
        user_id: i64,
        username: &str,
        ttl_seconds: Option<i64>,
    ) -> Result<IssuedToken, DomainError> {
        let ttl = ttl_seconds.unwrap_or(self.config.token_ttl_seconds);
        if ttl <= 0 {
            return Err(DomainError::Validation {
                message: format!("token ttl must be positive, got {}", ttl),
            });
        }

        let claims = Claims::new(user_id, username, ttl).ok_or_else(|| DomainError::Validation {
            message: format!("token ttl {} is out of range", ttl),
        })?;
        let token = self.encode_claims(&claims)?;

        let issued_at = claims
            .issued_at()
            .ok_or(DomainError::Token(TokenError::TokenGenerationFailed))?;
        let expires_at = claims
            .expires_at()
            .ok_or(DomainError::Token(TokenError::TokenGenerationFailed))?;

        debug!(user_id, jti = %claims.jti, ttl, "Issued token");

        Ok(IssuedToken {
            token,
            jti: claims.jti,
            user_id,
            username: claims.username,
            issued_at,
            expires_at,
        })
    }

    /// Encodes claims into a signed token
    pub(crate) fn encode_claims(&self, claims: &Claims) -> Result<String, DomainError> {
        let header = Header::new(self.config.algorithm);
        encode(&header, claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))
    }

    /// Verifies a token and returns its claims
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - Signature and algorithm match and `now < exp`
    /// * `Err(TokenError)` - Bad signature, wrong algorithm, malformed, or expired
    pub fn verify(&self, token: &str) -> Result<Claims, DomainError> {
        let claims = self.decode(token)?;

        if claims.is_expired() {
            return Err(DomainError::Token(TokenError::TokenExpired));
        }

        Ok(claims)
    }

    /// Decodes a token, checking the signature but not the expiry
    ///
    /// Used by refresh and introspection, which need the claims of tokens
    /// that have already expired.
    pub fn decode(&self, token: &str) -> Result<Claims, DomainError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => DomainError::Token(TokenError::InvalidSignature),
                ErrorKind::InvalidAlgorithm => DomainError::Token(TokenError::InvalidAlgorithm),
                ErrorKind::ExpiredSignature => DomainError::Token(TokenError::TokenExpired),
                _ => DomainError::Token(TokenError::InvalidTokenFormat),
            })?;

        if claims.exp <= claims.iat {
            return Err(DomainError::Token(TokenError::InvalidTokenFormat));
        }

        Ok(claims)
    }

    /// Exchanges a token that is about to expire (or just expired) for a new one
    ///
    /// The old `jti` is revoked with reason `"refreshed"` through a
    /// check-and-insert on the store, so of two concurrent refreshes of the
    /// same token at most one succeeds.
    ///
    /// # Returns
    ///
    /// * `Ok(IssuedToken)` - The replacement token
    /// * `Err(TokenError::TokenRevoked)` - The old token was already revoked
    /// * `Err(TokenError::OutsideRefreshWindow)` - `|exp - now|` exceeds the window
    pub fn refresh<R>(&self, old_token: &str, revocations: &R) -> Result<IssuedToken, DomainError>
    where
        R: RevocationRepository + ?Sized,
    {
        let claims = self.decode(old_token)?;

        if revocations.contains(&claims.jti) {
            return Err(DomainError::Token(TokenError::TokenRevoked));
        }

        let now = Utc::now().timestamp();
        let window = self.config.refresh_window_seconds;
        let time_until_expiry = claims.seconds_until_expiry_at(now);
        let time_since_expiry = time_until_expiry.saturating_neg();

        if time_until_expiry > window || time_since_expiry > window {
            debug!(
                jti = %claims.jti,
                time_until_expiry,
                window,
                "Refresh rejected outside window"
            );
            return Err(DomainError::Token(TokenError::OutsideRefreshWindow));
        }

        match revocations.try_add(
            &claims.jti,
            REASON_REFRESHED,
            claims.expires_at(),
            Some(claims.user_id),
        ) {
            Ok(true) => {}
            Ok(false) => return Err(DomainError::Token(TokenError::TokenRevoked)),
            Err(e) => {
                // The in-memory revocation stands even when the write failed
                warn!(jti = %claims.jti, error = %e, "Failed to persist refreshed token revocation");
            }
        }

        self.issue(claims.user_id, &claims.username, None)
    }

    /// Introspects a token without requiring it to be unexpired
    pub fn inspect<R>(&self, token: &str, revocations: &R) -> Result<TokenInfo, DomainError>
    where
        R: RevocationRepository + ?Sized,
    {
        let claims = self.decode(token)?;
        let is_revoked = revocations.contains(&claims.jti);

        Ok(TokenInfo {
            issued_at: claims.issued_at(),
            expires_at: claims.expires_at(),
            is_expired: claims.is_expired(),
            is_revoked,
            user_id: claims.user_id,
            username: claims.username,
            jti: claims.jti,
        })
    }
}
