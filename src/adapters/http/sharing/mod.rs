//! HTTP adapter for the session sharing endpoints.
//!
//! `GET /set` writes `user = "gitzmf"` into the caller's session and echoes
//! the serving port; `GET /get` reads it back as `<user>:<port>`.

mod handlers;
mod routes;

pub use handlers::{get_user, set_user, SharingState, USER_ATTRIBUTE, USER_VALUE};
pub use routes::sharing_routes;
