//! Session aggregate entity.
//!
//! A session is server-side state tied to one client across requests.
//! It is addressed by an opaque [`SessionId`] and holds named text
//! attributes. Persistence lives behind the `SessionStore` port; this type
//! only models the state and its idle-expiry rule.

use std::collections::HashMap;
use std::time::Duration;

use crate::domain::foundation::{SessionId, Timestamp};

/// Session aggregate - named attributes shared across server instances.
///
/// # Invariants
///
/// - `id` is globally unique and issued by the server
/// - `last_accessed_at` is never before `created_at`
/// - an attribute write replaces any previous value (last write wins)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: SessionId,
    created_at: Timestamp,
    last_accessed_at: Timestamp,
    /// Idle time after which the session is discarded.
    max_inactive_interval: Duration,
    attributes: HashMap<String, String>,
}

impl Session {
    /// Create a new, empty session with a fresh identifier.
    pub fn new(max_inactive_interval: Duration) -> Self {
        Self::started_at(SessionId::new(), Timestamp::now(), max_inactive_interval)
    }

    /// Create an empty session with a known id and creation time.
    pub fn started_at(id: SessionId, created_at: Timestamp, max_inactive_interval: Duration) -> Self {
        Self {
            id,
            created_at,
            last_accessed_at: created_at,
            max_inactive_interval,
            attributes: HashMap::new(),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn last_accessed_at(&self) -> Timestamp {
        self.last_accessed_at
    }

    pub fn max_inactive_interval(&self) -> Duration {
        self.max_inactive_interval
    }

    /// Returns the value of an attribute, if set.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Returns all attributes.
    pub fn attributes(&self) -> &HashMap<String, String> {
        &self.attributes
    }

    /// Set an attribute, replacing any previous value.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Record an access, pushing back idle expiry.
    ///
    /// Accesses older than the current `last_accessed_at` are ignored.
    pub fn touch(&mut self, at: Timestamp) {
        if at.is_after(&self.last_accessed_at) {
            self.last_accessed_at = at;
        }
    }

    /// Returns the moment after which the session is considered expired.
    pub fn expires_at(&self) -> Timestamp {
        self.last_accessed_at
            .plus_secs(self.max_inactive_interval.as_secs())
    }

    /// Checks whether the session has been idle longer than allowed.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now.is_after(&self.expires_at())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THIRTY_MINUTES: Duration = Duration::from_secs(1800);

    fn at_secs(secs: i64) -> Timestamp {
        Timestamp::from_unix_millis(secs * 1000).unwrap()
    }

    #[test]
    fn new_session_is_empty() {
        let session = Session::new(THIRTY_MINUTES);
        assert!(session.attributes().is_empty());
        assert_eq!(session.created_at(), session.last_accessed_at());
        assert_eq!(session.max_inactive_interval(), THIRTY_MINUTES);
    }

    #[test]
    fn new_sessions_get_distinct_ids() {
        let a = Session::new(THIRTY_MINUTES);
        let b = Session::new(THIRTY_MINUTES);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn set_attribute_last_write_wins() {
        let mut session = Session::new(THIRTY_MINUTES);
        session.set_attribute("user", "alice");
        session.set_attribute("user", "gitzmf");
        assert_eq!(session.attribute("user"), Some("gitzmf"));
        assert_eq!(session.attributes().len(), 1);
    }

    #[test]
    fn missing_attribute_is_none() {
        let session = Session::new(THIRTY_MINUTES);
        assert_eq!(session.attribute("user"), None);
    }

    #[test]
    fn touch_moves_last_access_forward_only() {
        let mut session = Session::started_at(SessionId::new(), at_secs(1000), THIRTY_MINUTES);

        session.touch(at_secs(1500));
        assert_eq!(session.last_accessed_at(), at_secs(1500));

        session.touch(at_secs(1200));
        assert_eq!(session.last_accessed_at(), at_secs(1500));
    }

    #[test]
    fn session_expires_after_idle_interval() {
        let session = Session::started_at(SessionId::new(), at_secs(1000), THIRTY_MINUTES);

        assert!(!session.is_expired(at_secs(1000)));
        assert!(!session.is_expired(at_secs(2800)));
        assert!(session.is_expired(at_secs(2801)));
    }

    #[test]
    fn touch_extends_expiry() {
        let mut session = Session::started_at(SessionId::new(), at_secs(1000), THIRTY_MINUTES);
        session.touch(at_secs(2000));
        assert!(!session.is_expired(at_secs(2801)));
        assert_eq!(session.expires_at(), at_secs(3800));
    }

    #[test]
    fn huge_idle_interval_never_expires() {
        let session = Session::started_at(SessionId::new(), at_secs(1000), Duration::from_secs(u64::MAX));
        assert!(!session.is_expired(Timestamp::now()));
        assert!(session.expires_at().is_after(&Timestamp::now()));
    }
}
