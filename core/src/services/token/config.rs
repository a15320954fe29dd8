//! Configuration for the token codec

use jsonwebtoken::Algorithm;
use std::str::FromStr;
use tg_shared::config::JwtConfig;

use crate::domain::entities::token::{DEFAULT_REFRESH_WINDOW_SECONDS, DEFAULT_TOKEN_TTL_SECONDS};
use crate::errors::DomainError;

/// Configuration for the token codec
#[derive(Debug, Clone)]
pub struct TokenCodecConfig {
    /// JWT signing secret
    pub secret_key: String,
    /// JWT signing algorithm; must be an HMAC algorithm
    pub algorithm: Algorithm,
    /// Default token lifetime in seconds
    pub token_ttl_seconds: i64,
    /// Refresh is allowed while `|exp - now| <= refresh_window_seconds`
    pub refresh_window_seconds: i64,
}

impl Default for TokenCodecConfig {
    fn default() -> Self {
        Self {
            secret_key: "development-secret-please-change-in-production".to_string(),
            algorithm: Algorithm::HS256,
            token_ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
            refresh_window_seconds: DEFAULT_REFRESH_WINDOW_SECONDS,
        }
    }
}

impl TokenCodecConfig {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            ..Default::default()
        }
    }

    /// Checks the settings the codec cannot work without
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.secret_key.is_empty() {
            return Err(DomainError::Validation {
                message: "secret_key must not be empty".to_string(),
            });
        }
        if !matches!(
            self.algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(DomainError::Validation {
                message: format!(
                    "algorithm {:?} is not supported with a shared secret; use HS256, HS384 or HS512",
                    self.algorithm
                ),
            });
        }
        if self.token_ttl_seconds <= 0 {
            return Err(DomainError::Validation {
                message: "token_ttl_seconds must be positive".to_string(),
            });
        }
        if self.refresh_window_seconds < 0 {
            return Err(DomainError::Validation {
                message: "refresh_window_seconds must not be negative".to_string(),
            });
        }
        Ok(())
    }
}

impl TryFrom<&JwtConfig> for TokenCodecConfig {
    type Error = DomainError;

    fn try_from(config: &JwtConfig) -> Result<Self, Self::Error> {
        let algorithm = Algorithm::from_str(&config.algorithm).map_err(|_| DomainError::Validation {
            message: format!("unknown JWT algorithm: {}", config.algorithm),
        })?;

        let codec_config = Self {
            secret_key: config.secret_key.clone(),
            algorithm,
            token_ttl_seconds: config.token_ttl_seconds,
            refresh_window_seconds: config.refresh_window_seconds,
        };
        codec_config.validate()?;
        Ok(codec_config)
    }
}
