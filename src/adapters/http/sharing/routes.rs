//! HTTP routes for the session sharing endpoints.

use axum::{routing::get, Router};

use super::handlers::{get_user, set_user, SharingState};

/// Creates the sharing router. Needs `session_middleware` layered on top.
pub fn sharing_routes(state: SharingState) -> Router {
    Router::new()
        .route("/set", get(set_user))
        .route("/get", get(get_user))
        .with_state(state)
}
