//! Session store adapters.
//!
//! Implementations of the SessionStore port for different backends.
//!
//! ## Available Adapters
//!
//! - `InMemorySessionStore` - In-memory for testing and single-server
//! - `RedisSessionStore` - Redis-backed for production multi-server
//!
//! ## Usage
//!
//! ```ignore
//! use session_share::adapters::session_store::{InMemorySessionStore, RedisSessionStore};
//!
//! // For testing
//! let store = InMemorySessionStore::new();
//!
//! // For production
//! let store = RedisSessionStore::new(conn, "session-share", Duration::from_secs(1800));
//! ```

mod in_memory;
mod redis;

pub use in_memory::InMemorySessionStore;
pub use self::redis::RedisSessionStore;
