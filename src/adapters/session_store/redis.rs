//! Redis-backed session store implementation for production deployments.
//!
//! Each session is one Redis hash at `<namespace>:sessions:<id>`:
//!
//! | Field                 | Value                          |
//! |-----------------------|--------------------------------|
//! | `creationTime`        | Unix milliseconds              |
//! | `lastAccessedTime`    | Unix milliseconds              |
//! | `maxInactiveInterval` | seconds                        |
//! | `sessionAttr:<name>`  | attribute value                |
//!
//! Every write re-arms `EXPIRE <maxInactiveInterval>` on the hash, so Redis
//! owns idle expiry. Writes to existing sessions run as a Lua script that
//! checks existence first, which keeps an expired session from being
//! recreated as a partial hash.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Script};
use std::time::Duration;

use crate::domain::foundation::{SessionId, Timestamp};
use crate::domain::session::Session;
use crate::ports::{SessionStore, SessionStoreError};

const CREATION_TIME: &str = "creationTime";
const LAST_ACCESSED_TIME: &str = "lastAccessedTime";
const MAX_INACTIVE_INTERVAL: &str = "maxInactiveInterval";
const ATTRIBUTE_PREFIX: &str = "sessionAttr:";

/// KEYS[1] = session key; ARGV = field/value pairs followed by ttl seconds.
/// Returns 0 without writing if the key is gone.
const UPDATE_IF_EXISTS: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 0 then
    return 0
end
local ttl = table.remove(ARGV)
redis.call('HSET', KEYS[1], unpack(ARGV))
redis.call('EXPIRE', KEYS[1], ttl)
return 1
"#;

/// Redis-backed session store for production multi-server deployments.
///
/// Any number of app instances pointed at the same Redis and namespace
/// see the same sessions.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: MultiplexedConnection,
    namespace: String,
    max_inactive_interval: Duration,
    update_script: Script,
}

impl RedisSessionStore {
    /// Create a new Redis session store.
    pub fn new(
        conn: MultiplexedConnection,
        namespace: impl Into<String>,
        max_inactive_interval: Duration,
    ) -> Self {
        Self {
            conn,
            namespace: namespace.into(),
            max_inactive_interval,
            update_script: Script::new(UPDATE_IF_EXISTS),
        }
    }

    /// Redis key holding the session hash.
    fn session_key(&self, id: &SessionId) -> String {
        session_key(&self.namespace, id)
    }

    fn ttl_secs(&self) -> u64 {
        self.max_inactive_interval.as_secs().max(1)
    }

    /// Run the conditional update script. Returns false if the session is gone.
    async fn update_if_exists(
        &self,
        id: &SessionId,
        fields: &[(&str, String)],
    ) -> Result<bool, SessionStoreError> {
        let mut invocation = self.update_script.key(self.session_key(id));
        for (field, value) in fields {
            invocation.arg(*field).arg(value);
        }
        invocation.arg(self.ttl_secs());

        let mut conn = self.conn.clone();
        let updated: i64 = invocation
            .invoke_async(&mut conn)
            .await
            .map_err(unavailable)?;

        Ok(updated == 1)
    }
}

/// Builds `<namespace>:sessions:<id>`.
fn session_key(namespace: &str, id: &SessionId) -> String {
    format!("{}:sessions:{}", namespace, id)
}

/// Hash field name for a session attribute.
fn attribute_field(name: &str) -> String {
    format!("{}{}", ATTRIBUTE_PREFIX, name)
}

/// Hash fields written when a session is first stored.
fn session_fields(session: &Session) -> Vec<(String, String)> {
    let mut fields = vec![
        (
            CREATION_TIME.to_string(),
            session.created_at().as_unix_millis().to_string(),
        ),
        (
            LAST_ACCESSED_TIME.to_string(),
            session.last_accessed_at().as_unix_millis().to_string(),
        ),
        (
            MAX_INACTIVE_INTERVAL.to_string(),
            session.max_inactive_interval().as_secs().to_string(),
        ),
    ];
    fields.extend(
        session
            .attributes()
            .iter()
            .map(|(name, value)| (attribute_field(name), value.clone())),
    );
    fields
}

fn unavailable(e: redis::RedisError) -> SessionStoreError {
    SessionStoreError::Unavailable(e.to_string())
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn create(&self, session: &Session) -> Result<(), SessionStoreError> {
        let key = self.session_key(session.id());
        let fields = session_fields(session);
        let ttl = session.max_inactive_interval().as_secs().max(1);

        let mut conn = self.conn.clone();
        redis::pipe()
            .atomic()
            .hset_multiple(&key, &fields)
            .ignore()
            .cmd("EXPIRE")
            .arg(&key)
            .arg(ttl)
            .ignore()
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(unavailable)?;

        tracing::debug!(session_id = %session.id(), "Stored new session");
        Ok(())
    }

    async fn touch(&self, id: &SessionId, at: Timestamp) -> Result<bool, SessionStoreError> {
        self.update_if_exists(
            id,
            &[(LAST_ACCESSED_TIME, at.as_unix_millis().to_string())],
        )
        .await
    }

    async fn get_attribute(
        &self,
        id: &SessionId,
        name: &str,
    ) -> Result<Option<String>, SessionStoreError> {
        let mut conn = self.conn.clone();
        conn.hget(self.session_key(id), attribute_field(name))
            .await
            .map_err(unavailable)
    }

    async fn set_attribute(
        &self,
        id: &SessionId,
        name: &str,
        value: &str,
        at: Timestamp,
    ) -> Result<(), SessionStoreError> {
        let field = attribute_field(name);
        let updated = self
            .update_if_exists(
                id,
                &[
                    (field.as_str(), value.to_string()),
                    (LAST_ACCESSED_TIME, at.as_unix_millis().to_string()),
                ],
            )
            .await?;

        if updated {
            Ok(())
        } else {
            Err(SessionStoreError::Expired(*id))
        }
    }
}

impl std::fmt::Debug for RedisSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisSessionStore")
            .field("namespace", &self.namespace)
            .field("max_inactive_interval", &self.max_inactive_interval)
            .finish_non_exhaustive()
    }
}
