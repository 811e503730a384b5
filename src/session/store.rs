//! Session storage and management.

use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::time::Instant;

use super::{Identity, SessionId, SessionStatus};
use crate::error::GatewayError;
use crate::Result;

/// Client descriptor recorded when none is supplied.
pub const UNKNOWN_CLIENT: &str = "Unknown";

/// A gateway session.
#[derive(Debug, Clone)]
pub struct Session {
    /// Unique identifier.
    pub id: SessionId,
    /// Authentication status.
    pub status: SessionStatus,
    /// Declared client identity (typically the user agent).
    pub client: String,
    /// Verified identity, present once authenticated.
    pub identity: Option<Identity>,
    /// Time when session was created.
    pub created_at: Instant,
    /// Time of last activity.
    pub last_activity: Instant,
}

impl Session {
    /// Create a new session in the `Connected` state.
    pub fn new(id: SessionId, client: impl Into<String>) -> Self {
        let now = Instant::now();
        let client = client.into();
        let client = if client.trim().is_empty() {
            UNKNOWN_CLIENT.to_string()
        } else {
            client
        };

        Self {
            id,
            status: SessionStatus::Connected,
            client,
            identity: None,
            created_at: now,
            last_activity: now,
        }
    }

    /// Update the last activity timestamp.
    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    /// Get the idle duration since last activity.
    pub fn idle_duration(&self) -> Duration {
        self.last_activity.elapsed()
    }

    /// Check if the session has been authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.status.can_dispatch()
    }
}

/// Thread-safe storage for sessions.
///
/// Records live in a sharded map: operations on different sessions only
/// contend when they hash to the same shard, and reads never block each
/// other. Every accessor hands out clones so no caller holds a shard lock
/// past the call.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<SessionId, Session>,
}

impl SessionStore {
    /// Create a new empty session store.
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Create a new `Connected` session for the given client descriptor.
    ///
    /// Always succeeds. The returned id is unique among live sessions.
    pub fn create(&self, client: impl Into<String>) -> Session {
        let client = client.into();
        loop {
            let id = SessionId::new();
            if let Entry::Vacant(slot) = self.sessions.entry(id) {
                let session = Session::new(id, client.as_str());
                slot.insert(session.clone());
                return session;
            }
        }
    }

    /// Get a snapshot of the session with the given ID.
    pub fn get(&self, id: &SessionId) -> Option<Session> {
        self.sessions.get(id).map(|entry| entry.value().clone())
    }

    /// Check if a session exists.
    pub fn contains(&self, id: &SessionId) -> bool {
        self.sessions.contains_key(id)
    }

    /// Mark a session as authenticated and attach the verified identity.
    ///
    /// A second call overwrites the identity. Fails with
    /// [`GatewayError::InvalidSession`] if the session is gone; a missing
    /// session is never recreated.
    pub fn authenticate(&self, id: &SessionId, identity: Identity) -> Result<Session> {
        let mut entry = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| GatewayError::InvalidSession(id.to_string()))?;

        let session = entry.value_mut();
        debug_assert!(session.status.can_authenticate());
        session.status = SessionStatus::Authenticated;
        session.identity = Some(identity);
        session.touch();
        Ok(session.clone())
    }

    /// Refresh a session's activity timestamp.
    ///
    /// Returns `false` if the session no longer exists.
    pub fn touch(&self, id: &SessionId) -> bool {
        match self.sessions.get_mut(id) {
            Some(mut entry) => {
                entry.value_mut().touch();
                true
            }
            None => false,
        }
    }

    /// Remove a session from the store.
    ///
    /// Returns the removed session, or None if it didn't exist.
    pub fn remove(&self, id: &SessionId) -> Option<Session> {
        self.sessions.remove(id).map(|(_, session)| session)
    }

    /// Get the number of sessions in the store.
    pub fn count(&self) -> usize {
        self.sessions.len()
    }

    /// Get the number of authenticated sessions.
    pub fn authenticated_count(&self) -> usize {
        self.sessions
            .iter()
            .filter(|entry| entry.value().is_authenticated())
            .count()
    }

    /// List all session IDs.
    pub fn list_ids(&self) -> Vec<SessionId> {
        self.sessions.iter().map(|entry| *entry.key()).collect()
    }

    /// Remove all sessions matching a predicate.
    ///
    /// Returns the number of sessions removed.
    pub fn remove_matching<F>(&self, predicate: F) -> usize
    where
        F: Fn(&Session) -> bool,
    {
        let mut removed = 0;
        self.sessions.retain(|_, session| {
            if predicate(session) {
                removed += 1;
                false
            } else {
                true
            }
        });
        removed
    }

    /// Remove every session idle for longer than `ttl`.
    pub fn expire_idle(&self, ttl: Duration) -> usize {
        self.remove_matching(|s| s.idle_duration() > ttl)
    }
}
