//! Error responses shared by the HTTP adapters.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::ports::SessionStoreError;

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
        }
    }

    pub fn session_store_unavailable() -> Self {
        Self {
            code: "SESSION_STORE_UNAVAILABLE".to_string(),
            message: "Session store unavailable".to_string(),
        }
    }
}

/// Maps a session store failure to a 500 response.
///
/// Store details are logged, never echoed to the client.
pub fn handle_store_error(e: SessionStoreError) -> Response {
    if e.is_unavailable() {
        tracing::error!("Session store unavailable: {}", e);
    } else {
        tracing::warn!("Session store error: {}", e);
    }

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::session_store_unavailable()),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_response_internal_creates_correctly() {
        let error = ErrorResponse::internal("boom");
        assert_eq!(error.code, "INTERNAL_ERROR");
        assert_eq!(error.message, "boom");
    }

    #[test]
    fn store_error_maps_to_500() {
        let response =
            handle_store_error(SessionStoreError::Unavailable("connection refused".to_string()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn store_error_body_hides_details() {
        let json = serde_json::to_value(ErrorResponse::session_store_unavailable()).unwrap();
        assert_eq!(json["code"], "SESSION_STORE_UNAVAILABLE");
        assert!(!json["message"].as_str().unwrap().contains("refused"));
    }
}
