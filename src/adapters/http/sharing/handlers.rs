//! HTTP handlers for the session sharing endpoints.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};

use crate::adapters::http::error::handle_store_error;
use crate::adapters::http::middleware::SessionHandle;

/// Attribute written by `/set` and read by `/get`.
pub const USER_ATTRIBUTE: &str = "user";

/// Value `/set` stores under [`USER_ATTRIBUTE`].
pub const USER_VALUE: &str = "gitzmf";

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

/// State for the sharing endpoints.
///
/// The port is echoed in every response so a client behind a load balancer
/// can see which instance served it.
#[derive(Debug, Clone)]
pub struct SharingState {
    port: u16,
}

impl SharingState {
    pub fn new(port: u16) -> Self {
        Self { port }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /set - Store `user` in the caller's session, respond with the port
pub async fn set_user(State(state): State<SharingState>, session: SessionHandle) -> Response {
    match session.set(USER_ATTRIBUTE, USER_VALUE).await {
        Ok(()) => state.port.to_string().into_response(),
        Err(e) => handle_store_error(e),
    }
}

/// GET /get - Respond with `<user>:<port>`, `<user>` empty when unset
pub async fn get_user(State(state): State<SharingState>, session: SessionHandle) -> Response {
    match session.get(USER_ATTRIBUTE).await {
        Ok(user) => user_at_port(user.as_deref(), state.port).into_response(),
        Err(e) => handle_store_error(e),
    }
}

fn user_at_port(user: Option<&str>, port: u16) -> String {
    format!("{}:{}", user.unwrap_or_default(), port)
}
