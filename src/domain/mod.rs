//! Domain layer containing session types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (session id, timestamp)
//! - `session` - The HTTP session aggregate and its expiry rule

pub mod foundation;
pub mod session;
