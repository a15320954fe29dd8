//! Mock implementation of UserDirectory for testing

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::errors::DomainError;

use super::r#trait::UserDirectory;

/// Mock user directory backed by a set of active ids
pub struct MockUserDirectory {
    active: Mutex<HashSet<i64>>,
    unavailable: AtomicBool,
}

impl MockUserDirectory {
    pub fn with_active(ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            active: Mutex::new(ids.into_iter().collect()),
            unavailable: AtomicBool::new(false),
        }
    }

    pub fn deactivate(&self, user_id: i64) {
        self.active.lock().unwrap().remove(&user_id);
    }

    /// Make every lookup fail
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserDirectory for MockUserDirectory {
    async fn is_active(&self, user_id: i64) -> Result<bool, DomainError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::Internal {
                message: "user directory unavailable".to_string(),
            });
        }
        Ok(self.active.lock().unwrap().contains(&user_id))
    }
}
