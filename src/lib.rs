//! Session Share - Distributed HTTP session sharing
//!
//! Two endpoints write and read one session attribute. Session state lives
//! in an external store (Redis in production), so any number of server
//! instances behind a load balancer see the same sessions.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
