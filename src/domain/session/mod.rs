//! Session module - HTTP session state shared across server instances.

mod aggregate;

pub use aggregate::Session;
