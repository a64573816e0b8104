//! Foundation module - Shared domain primitives.
//!
//! Contains the value objects that form the vocabulary of session sharing.

mod ids;
mod timestamp;

pub use ids::SessionId;
pub use timestamp::Timestamp;
