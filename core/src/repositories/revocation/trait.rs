//! Revocation repository trait defining the interface for the token blacklist.

use chrono::{DateTime, Utc};

use crate::domain::entities::revocation::{RevocationDocument, RevocationEntry, RevokedToken};
use crate::errors::DomainError;

/// Repository trait for the durable set of revoked token identifiers
///
/// Implementations keep an in-memory mirror for O(1) membership checks and
/// serialize every mutation behind a single lock. A mutation is applied to
/// the in-memory set before it is persisted; an `Err` from a mutating method
/// means the durable write failed, not that the revocation was lost for the
/// running process.
///
/// A `jti` present in the set is invalid regardless of its signature until
/// it is pruned.
pub trait RevocationRepository: Send + Sync {
    /// Insert or overwrite the entry for `jti`
    ///
    /// # Example
    /// ```no_run
    /// # use tg_core::repositories::RevocationRepository;
    /// # fn example(store: &impl RevocationRepository) -> Result<(), Box<dyn std::error::Error>> {
    /// store.add("42_1700000000_1a2b3c4d", "logout", None, Some(42))?;
    /// assert!(store.contains("42_1700000000_1a2b3c4d"));
    /// # Ok(())
    /// # }
    /// ```
    fn add(
        &self,
        jti: &str,
        reason: &str,
        expires_at: Option<DateTime<Utc>>,
        user_id: Option<i64>,
    ) -> Result<(), DomainError>;

    /// Insert the entry only if `jti` is not yet revoked
    ///
    /// # Returns
    /// * `Ok(true)` - The entry was inserted
    /// * `Ok(false)` - `jti` was already revoked; nothing changed
    fn try_add(
        &self,
        jti: &str,
        reason: &str,
        expires_at: Option<DateTime<Utc>>,
        user_id: Option<i64>,
    ) -> Result<bool, DomainError>;

    /// Membership check against the in-memory mirror
    fn contains(&self, jti: &str) -> bool;

    /// Administrative un-revoke
    ///
    /// # Returns
    /// * `Ok(true)` - The entry existed and was removed
    /// * `Ok(false)` - No entry for `jti`
    fn remove(&self, jti: &str) -> Result<bool, DomainError>;

    /// Prune entries past their retention horizon
    ///
    /// Persists only when something was removed.
    fn cleanup(&self) -> Result<usize, DomainError>;

    /// Metadata for a revoked `jti`
    fn get(&self, jti: &str) -> Option<RevocationEntry>;

    /// Number of revoked identifiers
    fn count(&self) -> usize;

    /// Revoked tokens recorded against `user_id`
    fn entries_for_user(&self, user_id: i64) -> Vec<RevokedToken>;

    /// Drop every entry
    fn clear(&self) -> Result<(), DomainError>;

    /// Snapshot of the full set in its document form
    fn export(&self) -> RevocationDocument;

    /// Load entries from a document, replacing the set unless `merge` is true
    ///
    /// Prunes after importing.
    fn import(&self, document: RevocationDocument, merge: bool) -> Result<(), DomainError>;

    /// Write the current set to durable storage
    fn flush(&self) -> Result<(), DomainError>;
}
