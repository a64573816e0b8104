//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `session_store` - Session store implementations (in-memory, Redis)
//! - `http` - axum routes, handlers and session middleware

pub mod http;
pub mod session_store;

pub use session_store::{InMemorySessionStore, RedisSessionStore};
