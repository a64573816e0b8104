//! HTTP middleware for axum.
//!
//! This module contains middleware layers for cross-cutting concerns:
//!
//! - `session` - Session cookie resolution and the `SessionHandle` extractor
//! - `cookie` - Session cookie parsing and rendering

pub mod cookie;
pub mod session;

pub use cookie::SessionCookie;
pub use session::{session_middleware, SessionHandle, SessionLayerState, SessionRejection};
