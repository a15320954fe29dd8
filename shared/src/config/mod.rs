//! Configuration module with business-specific sub-modules
//!
//! - `auth` - token signing, session tracking and revocation store settings
//! - `environment` - environment detection and logging configuration
//! - `server` - HTTP server binding

pub mod auth;
pub mod environment;
pub mod server;

use serde::{Deserialize, Serialize};
use std::path::Path;

// Re-export commonly used types
pub use auth::{AuthConfig, JwtConfig, RevocationConfig, SessionConfig};
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use server::ServerConfig;

/// Prefix for environment overrides, e.g. `TOKENGATE__AUTH__JWT__SECRET_KEY`
pub const ENV_PREFIX: &str = "TOKENGATE";

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Create configuration for development environment
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig::default(),
            auth: AuthConfig::from_env(),
            logging: LoggingConfig::for_environment(Environment::Development),
        }
    }

    /// Create configuration for production environment
    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig::new("0.0.0.0", 8080),
            auth: AuthConfig::from_env(),
            logging: LoggingConfig::for_environment(Environment::Production),
        }
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let env = Environment::from_env();
        match env {
            Environment::Development => Self::development(),
            Environment::Production => Self::production(),
            Environment::Staging => {
                let mut config = Self::development();
                config.environment = Environment::Staging;
                config.logging = LoggingConfig::for_environment(Environment::Staging);
                config
            }
        }
    }

    /// Load configuration by layering sources
    ///
    /// Starts from [`AppConfig::from_env`], overlays the optional TOML file at
    /// `path`, then overlays `TOKENGATE__*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let base = config::Config::try_from(&Self::from_env())?;
        let mut builder = config::Config::builder().add_source(base);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }

        builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}
