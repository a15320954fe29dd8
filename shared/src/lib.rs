//! Shared utilities and common types for the TokenGate server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types (token signing, sessions, revocation store, logging)
//! - Error response structures and error codes

pub mod config;
pub mod errors;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, Environment, JwtConfig, LoggingConfig, RevocationConfig, ServerConfig,
    SessionConfig,
};
pub use errors::{error_codes, ApiResult, ErrorResponse, IntoErrorResponse};
