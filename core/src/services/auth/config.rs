//! Configuration for the authentication gate

use tg_shared::config::SessionConfig;

use crate::errors::DomainError;

/// Configuration for the authentication gate
#[derive(Debug, Clone)]
pub struct AuthGateConfig {
    /// Idle time after which a token session is timed out
    pub session_timeout: chrono::Duration,
}

impl Default for AuthGateConfig {
    fn default() -> Self {
        Self {
            session_timeout: chrono::Duration::minutes(30),
        }
    }
}

impl AuthGateConfig {
    /// Builds a config with an idle timeout in minutes
    ///
    /// Rejects non-positive values and values too large for a duration.
    pub fn with_timeout_minutes(minutes: i64) -> Result<Self, DomainError> {
        let session_timeout = chrono::Duration::try_minutes(minutes)
            .filter(|timeout| *timeout > chrono::Duration::zero())
            .ok_or_else(|| DomainError::Validation {
                message: format!("session timeout must be a positive number of minutes, got {}", minutes),
            })?;
        Ok(Self { session_timeout })
    }
}

impl TryFrom<&SessionConfig> for AuthGateConfig {
    type Error = DomainError;

    fn try_from(config: &SessionConfig) -> Result<Self, Self::Error> {
        Self::with_timeout_minutes(config.timeout_minutes)
    }
}
