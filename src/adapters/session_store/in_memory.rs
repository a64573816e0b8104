//! In-memory session store implementation for testing and development.
//!
//! Sessions live in a HashMap inside this process, so they are only shared
//! between app instances that hold the same `InMemorySessionStore`.
//! Not suitable for production multi-server deployments.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{SessionId, Timestamp};
use crate::domain::session::Session;
use crate::ports::{SessionStore, SessionStoreError};

/// In-memory session store for testing and single-server deployments.
///
/// Clones share the same underlying map. Expired sessions are dropped
/// lazily when next accessed.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
}

impl InMemorySessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions currently held, expired ones included.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Returns true if no sessions are held.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drops the session if it has expired. Returns whether it is still live.
    fn evict_if_expired(
        sessions: &mut HashMap<SessionId, Session>,
        id: &SessionId,
        at: Timestamp,
    ) -> bool {
        match sessions.get(id).map(|session| session.is_expired(at)) {
            Some(false) => true,
            Some(true) => {
                sessions.remove(id);
                false
            }
            None => false,
        }
    }

    /// Snapshot of a stored session, ignoring expiry.
    pub async fn get(&self, id: &SessionId) -> Option<Session> {
        self.sessions.read().await.get(id).cloned()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, session: &Session) -> Result<(), SessionStoreError> {
        self.sessions
            .write()
            .await
            .insert(*session.id(), session.clone());
        Ok(())
    }

    async fn touch(&self, id: &SessionId, at: Timestamp) -> Result<bool, SessionStoreError> {
        let mut sessions = self.sessions.write().await;

        if !Self::evict_if_expired(&mut sessions, id, at) {
            return Ok(false);
        }
        if let Some(session) = sessions.get_mut(id) {
            session.touch(at);
        }
        Ok(true)
    }

    async fn get_attribute(
        &self,
        id: &SessionId,
        name: &str,
    ) -> Result<Option<String>, SessionStoreError> {
        let now = Timestamp::now();
        let sessions = self.sessions.read().await;

        Ok(sessions
            .get(id)
            .filter(|session| !session.is_expired(now))
            .and_then(|session| session.attribute(name))
            .map(str::to_string))
    }

    async fn set_attribute(
        &self,
        id: &SessionId,
        name: &str,
        value: &str,
        at: Timestamp,
    ) -> Result<(), SessionStoreError> {
        let mut sessions = self.sessions.write().await;

        if !Self::evict_if_expired(&mut sessions, id, at) {
            return Err(SessionStoreError::Expired(*id));
        }
        if let Some(session) = sessions.get_mut(id) {
            session.set_attribute(name, value);
            session.touch(at);
        }
        Ok(())
    }
}
