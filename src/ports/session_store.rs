//! Session store port for sharing HTTP session state between instances.
//!
//! This port defines the contract the HTTP layer needs from an external
//! session store. Implementations can use in-memory storage for testing
//! or Redis for production multi-instance deployments.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{SessionId, Timestamp};
use crate::domain::session::Session;

/// Port for session persistence.
///
/// Implementations should be thread-safe and support concurrent access.
/// Idle expiry is owned by the store: every write re-arms the session's
/// time-to-live. No read-modify-write atomicity is promised across calls;
/// concurrent writers to the same attribute race and the last write wins.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a newly created session, including any initial attributes.
    async fn create(&self, session: &Session) -> Result<(), SessionStoreError>;

    /// Record an access to an existing session and re-arm its expiry.
    ///
    /// Returns `false` if the session is unknown or has expired.
    async fn touch(&self, id: &SessionId, at: Timestamp) -> Result<bool, SessionStoreError>;

    /// Read one attribute. Unknown sessions and unset attributes yield `None`.
    async fn get_attribute(
        &self,
        id: &SessionId,
        name: &str,
    ) -> Result<Option<String>, SessionStoreError>;

    /// Write one attribute into an existing session.
    ///
    /// Returns `SessionStoreError::Expired` if the session no longer exists;
    /// stores never resurrect an expired session as a side effect.
    async fn set_attribute(
        &self,
        id: &SessionId,
        name: &str,
        value: &str,
        at: Timestamp,
    ) -> Result<(), SessionStoreError>;
}

/// Errors from session store operations.
#[derive(Debug, Clone, Error)]
pub enum SessionStoreError {
    /// The store could not be reached or rejected the command.
    #[error("Session store unavailable: {0}")]
    Unavailable(String),

    /// The session disappeared between lookup and write.
    #[error("Session expired: {0}")]
    Expired(SessionId),
}

impl SessionStoreError {
    /// Returns true if the error is worth surfacing as a store outage.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, SessionStoreError::Unavailable(_))
    }
}
