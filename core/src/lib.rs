//! # TokenGate Core
//!
//! Token lifecycle and session-trust layer: domain entities, the error
//! taxonomy, repository interfaces, and the services built on them (token
//! codec, session registry with its sweeper, and the authentication gate).

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{
    Claims, IssuedToken, RetentionPolicy, RevocationDocument, RevocationEntry, RevokedToken,
    SessionInfo, SessionSummary, TokenInfo,
};
pub use domain::value_objects::{AuthMethod, Credential, Identity};
pub use errors::{AuthError, DomainError, DomainResult, TokenError};
pub use repositories::{RevocationRepository, UserDirectory};
pub use services::{
    spawn_sweeper, AuthGate, AuthGateConfig, SessionRegistry, SweepReport, SweeperConfig,
    SweeperHandle, TokenCodec, TokenCodecConfig,
};
