//! JSON-file backed revocation store
//!
//! The whole revocation set is mirrored in memory and rewritten on every
//! mutation. Writes go to a temp file in the target directory, are fsynced,
//! and then renamed over the old file, so readers only ever see a complete
//! document.
//!
//! File layout:
//! `{ "blacklist": [jti, ...], "metadata": { jti: {...} }, "last_updated": iso }`

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tempfile::NamedTempFile;
use tg_core::domain::entities::{
    RetentionPolicy, RevocationDocument, RevocationEntry, RevokedToken,
};
use tg_core::errors::DomainError;
use tg_core::repositories::RevocationRepository;
use tg_shared::config::RevocationConfig;
use tracing::{debug, info, warn};

use super::error::StorageError;

/// Durable, thread-safe set of revoked token identifiers
pub struct FileRevocationStore {
    path: PathBuf,
    policy: RetentionPolicy,
    entries: Mutex<HashMap<String, RevocationEntry>>,
}

impl FileRevocationStore {
    /// Opens the store at `path`, loading whatever is already there
    ///
    /// A missing file starts an empty store. An unreadable or corrupt file is
    /// logged and also starts empty; it is overwritten on the next mutation.
    /// Entries past their retention are dropped while loading.
    ///
    /// # Arguments
    /// * `path` - Location of the JSON document
    /// * `policy` - Retention used for pruning
    pub fn open(path: impl Into<PathBuf>, policy: RetentionPolicy) -> Self {
        let path = path.into();
        let mut entries = Self::load(&path);

        let pruned = policy.prune(&mut entries, Utc::now());
        if pruned > 0 {
            info!(path = %path.display(), pruned, "Pruned stale revocations on load");
        }
        info!(path = %path.display(), count = entries.len(), "Revocation store loaded");

        Self {
            path,
            policy,
            entries: Mutex::new(entries),
        }
    }

    pub fn from_config(config: &RevocationConfig) -> Result<Self, DomainError> {
        let policy =
            RetentionPolicy::new(config.expired_retention_hours, config.fallback_retention_days)?;
        Ok(Self::open(&config.blacklist_file_path, policy))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn policy(&self) -> &RetentionPolicy {
        &self.policy
    }

    fn load(path: &Path) -> HashMap<String, RevocationEntry> {
        let raw = match fs::read(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No revocation file yet, starting empty");
                return HashMap::new();
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cannot read revocation file, starting empty");
                return HashMap::new();
            }
        };

        match serde_json::from_slice::<RevocationDocument>(&raw) {
            Ok(document) => document.into_entries(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Corrupt revocation file, starting empty");
                HashMap::new()
            }
        }
    }

    /// Writes the full set atomically
    fn save(&self, entries: &HashMap<String, RevocationEntry>) -> Result<(), StorageError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| StorageError::io(dir, e))?;

        let bytes = serde_json::to_vec_pretty(&RevocationDocument::from_entries(entries))?;

        let mut temp = NamedTempFile::new_in(dir).map_err(|e| StorageError::io(dir, e))?;
        temp.as_file_mut()
            .write_all(&bytes)
            .map_err(|e| StorageError::io(dir, e))?;
        temp.as_file()
            .sync_all()
            .map_err(|e| StorageError::io(dir, e))?;
        temp.persist(&self.path).map_err(|e| StorageError::Persist {
            path: self.path.clone(),
            detail: e.error.to_string(),
        })?;

        debug!(path = %self.path.display(), count = entries.len(), "Revocation file written");
        Ok(())
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, RevocationEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| {
            warn!("Revocation store lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

impl RevocationRepository for FileRevocationStore {
    fn add(
        &self,
        jti: &str,
        reason: &str,
        expires_at: Option<DateTime<Utc>>,
        user_id: Option<i64>,
    ) -> Result<(), DomainError> {
        let mut entries = self.entries();
        entries.insert(jti.to_string(), RevocationEntry::new(reason, expires_at, user_id));
        debug!(jti, reason, "Token revoked");
        self.save(&entries)?;
        Ok(())
    }

    fn try_add(
        &self,
        jti: &str,
        reason: &str,
        expires_at: Option<DateTime<Utc>>,
        user_id: Option<i64>,
    ) -> Result<bool, DomainError> {
        let mut entries = self.entries();
        if entries.contains_key(jti) {
            return Ok(false);
        }
        entries.insert(jti.to_string(), RevocationEntry::new(reason, expires_at, user_id));
        debug!(jti, reason, "Token revoked");
        self.save(&entries)?;
        Ok(true)
    }

    fn contains(&self, jti: &str) -> bool {
        self.entries().contains_key(jti)
    }

    fn remove(&self, jti: &str) -> Result<bool, DomainError> {
        let mut entries = self.entries();
        if entries.remove(jti).is_none() {
            return Ok(false);
        }
        info!(jti, "Token revocation lifted");
        self.save(&entries)?;
        Ok(true)
    }

    fn cleanup(&self) -> Result<usize, DomainError> {
        let mut entries = self.entries();
        let removed = self.policy.prune(&mut entries, Utc::now());
        if removed > 0 {
            info!(removed, remaining = entries.len(), "Pruned stale revocations");
            self.save(&entries)?;
        }
        Ok(removed)
    }

    fn get(&self, jti: &str) -> Option<RevocationEntry> {
        self.entries().get(jti).cloned()
    }

    fn count(&self) -> usize {
        self.entries().len()
    }

    fn entries_for_user(&self, user_id: i64) -> Vec<RevokedToken> {
        let mut tokens: Vec<RevokedToken> = self
            .entries()
            .iter()
            .filter(|(_, entry)| entry.user_id == Some(user_id))
            .map(|(jti, entry)| RevokedToken {
                jti: jti.clone(),
                entry: entry.clone(),
            })
            .collect();
        tokens.sort_by(|a, b| b.entry.added_at.cmp(&a.entry.added_at));
        tokens
    }

    fn clear(&self) -> Result<(), DomainError> {
        let mut entries = self.entries();
        let removed = entries.len();
        entries.clear();
        warn!(removed, "Revocation store cleared");
        self.save(&entries)?;
        Ok(())
    }

    fn export(&self) -> RevocationDocument {
        RevocationDocument::from_entries(&self.entries())
    }

    fn import(&self, document: RevocationDocument, merge: bool) -> Result<(), DomainError> {
        let mut entries = self.entries();
        if !merge {
            entries.clear();
        }
        entries.extend(document.into_entries());
        self.policy.prune(&mut entries, Utc::now());
        info!(merge, count = entries.len(), "Revocations imported");
        self.save(&entries)?;
        Ok(())
    }

    fn flush(&self) -> Result<(), DomainError> {
        let entries = self.entries();
        self.save(&entries)?;
        Ok(())
    }
}
