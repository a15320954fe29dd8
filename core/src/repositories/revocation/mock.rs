//! Mock implementation of RevocationRepository for testing

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::domain::entities::revocation::{
    RetentionPolicy, RevocationDocument, RevocationEntry, RevokedToken,
};
use crate::errors::DomainError;

use super::r#trait::RevocationRepository;

/// In-memory revocation repository with switchable write failures
pub struct MockRevocationRepository {
    entries: Mutex<HashMap<String, RevocationEntry>>,
    policy: RetentionPolicy,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MockRevocationRepository {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            policy: RetentionPolicy::default(),
            fail_writes: AtomicBool::new(false),
            writes: AtomicUsize::new(0),
        }
    }

    /// Make every subsequent persistence attempt fail
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of persistence attempts so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn persist(&self) -> Result<(), DomainError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::Storage {
                message: "simulated write failure".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for MockRevocationRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl RevocationRepository for MockRevocationRepository {
    fn add(
        &self,
        jti: &str,
        reason: &str,
        expires_at: Option<DateTime<Utc>>,
        user_id: Option<i64>,
    ) -> Result<(), DomainError> {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(jti.to_string(), RevocationEntry::new(reason, expires_at, user_id));
        self.persist()
    }

    fn try_add(
        &self,
        jti: &str,
        reason: &str,
        expires_at: Option<DateTime<Utc>>,
        user_id: Option<i64>,
    ) -> Result<bool, DomainError> {
        let mut entries = self.entries.lock().unwrap();
        if entries.contains_key(jti) {
            return Ok(false);
        }
        entries.insert(jti.to_string(), RevocationEntry::new(reason, expires_at, user_id));
        self.persist().map(|_| true)
    }

    fn contains(&self, jti: &str) -> bool {
        self.entries.lock().unwrap().contains_key(jti)
    }

    fn remove(&self, jti: &str) -> Result<bool, DomainError> {
        let mut entries = self.entries.lock().unwrap();
        if entries.remove(jti).is_none() {
            return Ok(false);
        }
        self.persist().map(|_| true)
    }

    fn cleanup(&self) -> Result<usize, DomainError> {
        let mut entries = self.entries.lock().unwrap();
        let removed = self.policy.prune(&mut entries, Utc::now());
        if removed > 0 {
            self.persist()?;
        }
        Ok(removed)
    }

    fn get(&self, jti: &str) -> Option<RevocationEntry> {
        self.entries.lock().unwrap().get(jti).cloned()
    }

    fn count(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    fn entries_for_user(&self, user_id: i64) -> Vec<RevokedToken> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, entry)| entry.user_id == Some(user_id))
            .map(|(jti, entry)| RevokedToken {
                jti: jti.clone(),
                entry: entry.clone(),
            })
            .collect()
    }

    fn clear(&self) -> Result<(), DomainError> {
        self.entries.lock().unwrap().clear();
        self.persist()
    }

    fn export(&self) -> RevocationDocument {
        RevocationDocument::from_entries(&self.entries.lock().unwrap())
    }

    fn import(&self, document: RevocationDocument, merge: bool) -> Result<(), DomainError> {
        let mut entries = self.entries.lock().unwrap();
        if !merge {
            entries.clear();
        }
        entries.extend(document.into_entries());
        self.policy.prune(&mut entries, Utc::now());
        self.persist()
    }

    fn flush(&self) -> Result<(), DomainError> {
        self.persist()
    }
}
