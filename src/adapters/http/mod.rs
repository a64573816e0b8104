//! HTTP adapters - REST API implementations.
//!
//! - `sharing` - The `/set` and `/get` session sharing endpoints
//! - `middleware` - Session cookie handling
//! - `error` - Error response mapping

pub mod error;
pub mod middleware;
pub mod sharing;

use std::time::Duration;

use axum::Router;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use middleware::{session_middleware, SessionLayerState};
use sharing::{sharing_routes, SharingState};

// Re-export key types for convenience
pub use middleware::SessionHandle;

/// Builds the full application router.
///
/// Layers, outermost first: request tracing, request timeout, session
/// resolution.
pub fn app_router(
    sharing: SharingState,
    sessions: SessionLayerState,
    request_timeout: Duration,
) -> Router {
    sharing_routes(sharing)
        .layer(axum::middleware::from_fn_with_state(
            sessions,
            session_middleware,
        ))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
}
