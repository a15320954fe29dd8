//! User directory trait: the external account-status lookup.

use async_trait::async_trait;

use crate::errors::DomainError;

/// Account-status lookup supplied by the surrounding application
///
/// The gate treats this as an opaque external service. An `Err` is handled
/// fail-closed, the same as an inactive account.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Whether `user_id` names an existing, active account
    async fn is_active(&self, user_id: i64) -> Result<bool, DomainError>;
}
