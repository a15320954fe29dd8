//! In-memory registry of active sessions keyed by encoded token

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

use crate::domain::entities::revocation::REASON_REVOKE_ALL;
use crate::domain::entities::session::{Session, SessionInfo, SessionSummary};
use crate::domain::entities::token::Claims;
use crate::repositories::RevocationRepository;

/// Thread-safe registry of live sessions
///
/// One mutex guards the whole map. Revocations triggered from here are
/// written after the lock is released so a slow store write never blocks
/// request-time lookups.
pub struct SessionRegistry<R: RevocationRepository + ?Sized> {
    sessions: Mutex<HashMap<String, Session>>,
    revocations: Arc<R>,
}

impl<R: RevocationRepository + ?Sized> SessionRegistry<R> {
    pub fn new(revocations: Arc<R>) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            revocations,
        }
    }

    pub fn revocations(&self) -> &Arc<R> {
        &self.revocations
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<String, Session>> {
        self.sessions.lock().unwrap_or_else(|poisoned| {
            warn!("Session registry lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Registers (or replaces) the session for a freshly issued token
    pub fn register(&self, user_id: i64, token: &str, expires_at: DateTime<Utc>) {
        let jti = Claims::peek(token).map(|claims| claims.jti);
        if jti.is_none() {
            warn!(user_id, "Registering session for a token without a readable jti");
        }

        self.sessions()
            .insert(token.to_string(), Session::new(user_id, jti, expires_at));
        debug!(user_id, "Session registered");
    }

    /// Marks the session as active now; returns false if there is no session
    pub fn touch(&self, token: &str) -> bool {
        match self.sessions().get_mut(token) {
            Some(session) => {
                session.touch(Utc::now());
                true
            }
            None => false,
        }
    }

    /// Whether the session has been idle for more than `timeout_minutes`
    ///
    /// A token with no session counts as timed out.
    pub fn is_timed_out(&self, token: &str, timeout_minutes: i64) -> bool {
        self.is_idle_longer_than(token, Duration::minutes(timeout_minutes))
    }

    pub fn is_idle_longer_than(&self, token: &str, timeout: Duration) -> bool {
        match self.sessions().get(token) {
            Some(session) => session.is_idle_longer_than(timeout, Utc::now()),
            None => true,
        }
    }

    /// Drops a session without revoking its token
    pub fn remove(&self, token: &str) -> bool {
        self.sessions().remove(token).is_some()
    }

    /// Revokes and removes every session of a user
    ///
    /// # Arguments
    ///
    /// * `user_id` - Owner of the sessions
    /// * `except` - Token to keep (typically the caller's own)
    ///
    /// # Returns
    ///
    /// Number of sessions removed
    pub fn revoke_all(&self, user_id: i64, except: Option<&str>) -> usize {
        let removed: Vec<(String, Session)> = {
            let mut sessions = self.sessions();
            let tokens: Vec<String> = sessions
                .iter()
                .filter(|(token, session)| {
                    session.user_id == user_id && Some(token.as_str()) != except
                })
                .map(|(token, _)| token.clone())
                .collect();

            tokens
                .into_iter()
                .filter_map(|token| sessions.remove(&token).map(|session| (token, session)))
                .collect()
        };

        for (_, session) in &removed {
            let Some(jti) = session.jti.as_deref() else {
                warn!(user_id, "Removed session without jti; token cannot be revoked");
                continue;
            };
            if let Err(e) = self.revocations.add(
                jti,
                REASON_REVOKE_ALL,
                Some(session.expires_at),
                Some(user_id),
            ) {
                warn!(user_id, jti, error = %e, "Failed to persist session revocation");
            }
        }

        info!(user_id, count = removed.len(), "Revoked user sessions");
        removed.len()
    }

    /// Number of unexpired sessions, optionally for one user
    pub fn active_count(&self, user_id: Option<i64>) -> usize {
        let now = Utc::now();
        self.sessions()
            .values()
            .filter(|session| !session.is_expired_at(now))
            .filter(|session| user_id.map_or(true, |id| session.user_id == id))
            .count()
    }

    /// Unexpired sessions of a user with a redacted token preview
    pub fn user_sessions(&self, user_id: i64) -> Vec<SessionSummary> {
        let now = Utc::now();
        let mut summaries: Vec<SessionSummary> = self
            .sessions()
            .iter()
            .filter(|(_, session)| session.user_id == user_id && !session.is_expired_at(now))
            .map(|(token, session)| SessionSummary::new(token, session))
            .collect();
        summaries.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
        summaries
    }

    pub fn session_info(&self, token: &str) -> Option<SessionInfo> {
        self.sessions()
            .get(token)
            .map(|session| SessionInfo::from_session(session, Utc::now()))
    }

    /// Removes every session whose token has expired
    pub fn sweep_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions();
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired_at(now));
        before - sessions.len()
    }
}
