//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Session Ports
//!
//! - `SessionStore` - Shared session persistence (Redis in production)

mod session_store;

pub use session_store::{SessionStore, SessionStoreError};
