//! Authentication, session and revocation configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DEFAULT_SECRET: &str = "development-secret-please-change-in-production";

/// JWT signing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct JwtConfig {
    /// Shared secret used to sign and verify tokens
    pub secret_key: String,

    /// Algorithm for JWT signing (default: HS256)
    pub algorithm: String,

    /// Token lifetime in seconds
    pub token_ttl_seconds: i64,

    /// Distance from expiry (either side) within which a token may be refreshed
    pub refresh_window_seconds: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret_key: String::from(DEFAULT_SECRET),
            algorithm: String::from("HS256"),
            token_ttl_seconds: 3600,
            refresh_window_seconds: 300,
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            ..Default::default()
        }
    }

    /// Set token lifetime in seconds
    pub fn with_ttl_seconds(mut self, seconds: i64) -> Self {
        self.token_ttl_seconds = seconds;
        self
    }

    /// Set the refresh window in seconds
    pub fn with_refresh_window_seconds(mut self, seconds: i64) -> Self {
        self.refresh_window_seconds = seconds;
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET
    }
}

/// Session tracking configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Inactivity timeout in minutes
    pub timeout_minutes: i64,

    /// How often the sweeper evicts expired sessions (seconds)
    pub sweep_interval_seconds: u64,

    /// Sweeper back-off after a failed cycle (seconds)
    pub sweep_error_backoff_seconds: u64,

    /// Name of the ambient session cookie used as fallback credential
    pub cookie_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout_minutes: 30,
            sweep_interval_seconds: 300,
            sweep_error_backoff_seconds: 60,
            cookie_name: String::from("tokengate_session"),
        }
    }
}

/// Durable revocation store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RevocationConfig {
    /// Location of the JSON blacklist document
    pub blacklist_file_path: PathBuf,

    /// Keep entries with a known expiry this long after the token expired
    pub expired_retention_hours: i64,

    /// Keep entries without expiry information this long after they were added
    pub fallback_retention_days: i64,
}

impl Default for RevocationConfig {
    fn default() -> Self {
        Self {
            blacklist_file_path: PathBuf::from("instance/token_blacklist.json"),
            expired_retention_hours: 24,
            fallback_retention_days: 7,
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,

    /// Session configuration
    pub session: SessionConfig,

    /// Revocation store configuration
    pub revocation: RevocationConfig,
}

impl AuthConfig {
    /// Create from environment variables
    ///
    /// Reads `JWT_SECRET_KEY` (falling back to `SECRET_KEY`), `JWT_ALGORITHM`,
    /// `JWT_EXPIRATION_DELTA`, `JWT_REFRESH_WINDOW`, `SESSION_TIMEOUT_MINUTES`
    /// and `JWT_BLACKLIST_FILE`. Unset or unparsable values keep their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let secret_key = std::env::var("JWT_SECRET_KEY")
            .or_else(|_| std::env::var("SECRET_KEY"))
            .unwrap_or(defaults.jwt.secret_key);
        let algorithm = std::env::var("JWT_ALGORITHM").unwrap_or(defaults.jwt.algorithm);
        let token_ttl_seconds = env_or("JWT_EXPIRATION_DELTA", defaults.jwt.token_ttl_seconds);
        let refresh_window_seconds =
            env_or("JWT_REFRESH_WINDOW", defaults.jwt.refresh_window_seconds);
        let timeout_minutes = env_or("SESSION_TIMEOUT_MINUTES", defaults.session.timeout_minutes);
        let blacklist_file_path = std::env::var("JWT_BLACKLIST_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.revocation.blacklist_file_path);

        Self {
            jwt: JwtConfig {
                secret_key,
                algorithm,
                token_ttl_seconds,
                refresh_window_seconds,
            },
            session: SessionConfig {
                timeout_minutes,
                ..defaults.session
            },
            revocation: RevocationConfig {
                blacklist_file_path,
                ..defaults.revocation
            },
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_config_default() {
        let config = JwtConfig::default();
        assert_eq!(config.token_ttl_seconds, 3600);
        assert_eq!(config.refresh_window_seconds, 300);
        assert_eq!(config.algorithm, "HS256");
        assert!(config.is_using_default_secret());
    }

    #[test]
    fn test_jwt_config_builder() {
        let config = JwtConfig::new("my-secret")
            .with_ttl_seconds(1800)
            .with_refresh_window_seconds(60);

        assert_eq!(config.token_ttl_seconds, 1800);
        assert_eq!(config.refresh_window_seconds, 60);
        assert!(!config.is_using_default_secret());
    }

    #[test]
    fn test_session_config_default() {
        let config = SessionConfig::default();
        assert_eq!(config.timeout_minutes, 30);
        assert_eq!(config.sweep_interval_seconds, 300);
        assert_eq!(config.sweep_error_backoff_seconds, 60);
        assert_eq!(config.cookie_name, "tokengate_session");
    }

    #[test]
    fn test_revocation_config_default() {
        let config = RevocationConfig::default();
        assert_eq!(
            config.blacklist_file_path,
            PathBuf::from("instance/token_blacklist.json")
        );
        assert_eq!(config.expired_retention_hours, 24);
        assert_eq!(config.fallback_retention_days, 7);
    }

    #[test]
    fn test_partial_config_deserializes_with_defaults() {
        let config: AuthConfig = serde_json::from_str(
            r#"{ "jwt": { "secret_key": "abc", "token_ttl_seconds": 120 } }"#,
        )
        .unwrap();

        assert_eq!(config.jwt.secret_key, "abc");
        assert_eq!(config.jwt.token_ttl_seconds, 120);
        assert_eq!(config.jwt.refresh_window_seconds, 300);
        assert_eq!(config.session.timeout_minutes, 30);
    }
}
