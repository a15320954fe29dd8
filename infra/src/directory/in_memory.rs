//! In-memory account-status lookup

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tg_core::errors::DomainError;
use tg_core::repositories::UserDirectory;
use tracing::warn;

/// User directory backed by a set of active account ids
///
/// In permissive mode every id is reported active except the ones explicitly
/// deactivated.
pub struct InMemoryUserDirectory {
    permissive: bool,
    active: RwLock<HashSet<i64>>,
    deactivated: RwLock<HashSet<i64>>,
}

impl InMemoryUserDirectory {
    /// Only the listed ids are active
    pub fn with_active(ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            permissive: false,
            active: RwLock::new(ids.into_iter().collect()),
            deactivated: RwLock::new(HashSet::new()),
        }
    }

    /// Every id is active until deactivated
    pub fn permissive() -> Self {
        Self {
            permissive: true,
            active: RwLock::new(HashSet::new()),
            deactivated: RwLock::new(HashSet::new()),
        }
    }

    pub fn is_permissive(&self) -> bool {
        self.permissive
    }

    pub fn activate(&self, user_id: i64) {
        write(&self.deactivated).remove(&user_id);
        write(&self.active).insert(user_id);
    }

    pub fn deactivate(&self, user_id: i64) {
        write(&self.active).remove(&user_id);
        write(&self.deactivated).insert(user_id);
    }
}

fn read(lock: &RwLock<HashSet<i64>>) -> RwLockReadGuard<'_, HashSet<i64>> {
    lock.read().unwrap_or_else(|poisoned| {
        warn!("User directory lock was poisoned, recovering");
        poisoned.into_inner()
    })
}

fn write(lock: &RwLock<HashSet<i64>>) -> RwLockWriteGuard<'_, HashSet<i64>> {
    lock.write().unwrap_or_else(|poisoned| {
        warn!("User directory lock was poisoned, recovering");
        poisoned.into_inner()
    })
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn is_active(&self, user_id: i64) -> Result<bool, DomainError> {
        if read(&self.deactivated).contains(&user_id) {
            return Ok(false);
        }
        Ok(self.permissive || read(&self.active).contains(&user_id))
    }
}
