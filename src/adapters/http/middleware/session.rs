//! Session middleware and extractor for axum.
//!
//! This module provides:
//! - `session_middleware` - Layer that resolves the session cookie and injects a `SessionHandle`
//! - `SessionHandle` - Extractor giving handlers get/set access to session attributes
//!
//! # Architecture
//!
//! The middleware uses the `SessionStore` port, keeping it store-agnostic.
//! Whether backed by Redis or an in-memory map, the middleware doesn't change.
//!
//! ```text
//! Request → session_middleware → cookie → SessionId → store.touch()
//!                                      ↓
//!                      Handler → SessionHandle::get / SessionHandle::set
//!                                      ↓
//!           session_middleware ← appends Set-Cookie if a session was created
//! ```
//!
//! Sessions are created lazily: only a write creates one, so read-only
//! requests never allocate store entries or emit cookies. Ids presented by
//! the client that the store does not know are ignored, never adopted.
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, routing::get, middleware};
//!
//! let state = SessionLayerState::new(store, "SESSION", Duration::from_secs(1800), false);
//!
//! let app = Router::new()
//!     .route("/visit", get(visit))
//!     .layer(middleware::from_fn_with_state(state, session_middleware));
//!
//! async fn visit(session: SessionHandle) -> String {
//!     session.set("visited", "yes").await.unwrap();
//!     "ok".to_string()
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tokio::sync::Mutex;

use super::cookie::SessionCookie;
use crate::adapters::http::error::{handle_store_error, ErrorResponse};
use crate::domain::foundation::{SessionId, Timestamp};
use crate::domain::session::Session;
use crate::ports::{SessionStore, SessionStoreError};

/// Upper bound on session cookies looked up per request.
const MAX_PRESENTED_SESSIONS: usize = 8;

/// Session middleware state - the store plus cookie settings.
#[derive(Clone)]
pub struct SessionLayerState {
    store: Arc<dyn SessionStore>,
    cookie: SessionCookie,
    max_inactive_interval: Duration,
}

impl SessionLayerState {
    pub fn new(
        store: Arc<dyn SessionStore>,
        cookie_name: impl Into<String>,
        max_inactive_interval: Duration,
        secure_cookie: bool,
    ) -> Self {
        Self {
            store,
            cookie: SessionCookie::new(cookie_name, secure_cookie),
            max_inactive_interval,
        }
    }
}

/// Session middleware that binds each request to its session.
///
/// This middleware:
/// 1. Reads every session id the client presented, in cookie order
/// 2. Refreshes the idle timeout of the first one `SessionStore::touch` confirms
/// 3. Drops ids the store does not know (expired or forged)
/// 4. Injects a `SessionHandle` into request extensions
/// 5. After the handler runs, issues `Set-Cookie` if a session was created
///
/// A store failure during lookup short-circuits with 500.
pub async fn session_middleware(
    State(state): State<SessionLayerState>,
    mut request: Request,
    next: Next,
) -> Response {
    let presented = presented_ids(&state.cookie, request.headers());

    let mut existing = None;
    for id in presented {
        match state.store.touch(&id, Timestamp::now()).await {
            Ok(true) => {
                existing = Some(id);
                break;
            }
            Ok(false) => {
                tracing::debug!(session_id = %id, "Ignoring unknown or expired session");
            }
            Err(e) => return handle_store_error(e),
        }
    }

    let handle = SessionHandle::new(state.store.clone(), state.max_inactive_interval, existing);
    request.extensions_mut().insert(handle.clone());

    let mut response = next.run(request).await;

    if let Some(id) = handle.created_id().await {
        match state.cookie.set_cookie_header(&id) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => {
                tracing::error!("Failed to render session cookie: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::internal("Failed to issue session cookie")),
                )
                    .into_response();
            }
        }
    }

    response
}

/// Distinct, well-formed session ids from the request cookies.
fn presented_ids(cookie: &SessionCookie, headers: &HeaderMap) -> Vec<SessionId> {
    let mut ids: Vec<SessionId> = Vec::new();
    for id in cookie
        .find_all_in(headers)
        .into_iter()
        .filter_map(|value| value.parse().ok())
    {
        if !ids.contains(&id) {
            ids.push(id);
        }
        if ids.len() == MAX_PRESENTED_SESSIONS {
            break;
        }
    }
    ids
}

/// Per-request access to the caller's session.
///
/// Clones share state, so the middleware sees sessions created by the handler.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<HandleInner>,
}

struct HandleInner {
    store: Arc<dyn SessionStore>,
    max_inactive_interval: Duration,
    state: Mutex<HandleState>,
}

#[derive(Debug, Default)]
struct HandleState {
    id: Option<SessionId>,
    created: bool,
}

impl SessionHandle {
    fn new(
        store: Arc<dyn SessionStore>,
        max_inactive_interval: Duration,
        existing: Option<SessionId>,
    ) -> Self {
        Self {
            inner: Arc::new(HandleInner {
                store,
                max_inactive_interval,
                state: Mutex::new(HandleState {
                    id: existing,
                    created: false,
                }),
            }),
        }
    }

    /// The current session id, if the request has a session.
    pub async fn id(&self) -> Option<SessionId> {
        self.inner.state.lock().await.id
    }

    /// Read an attribute. A request without a session reads `None`.
    pub async fn get(&self, name: &str) -> Result<Option<String>, SessionStoreError> {
        let id = self.inner.state.lock().await.id;
        match id {
            Some(id) => self.inner.store.get_attribute(&id, name).await,
            None => Ok(None),
        }
    }

    /// Write an attribute, creating the session first if there is none.
    ///
    /// If the session expires between lookup and write, a new one is
    /// started rather than failing the request.
    pub async fn set(&self, name: &str, value: &str) -> Result<(), SessionStoreError> {
        let mut state = self.inner.state.lock().await;

        if let Some(id) = state.id {
            match self
                .inner
                .store
                .set_attribute(&id, name, value, Timestamp::now())
                .await
            {
                Ok(()) => return Ok(()),
                Err(SessionStoreError::Expired(_)) => {
                    tracing::debug!(session_id = %id, "Session expired mid-request, starting a new one");
                }
                Err(e) => return Err(e),
            }
        }

        let mut session = Session::new(self.inner.max_inactive_interval);
        session.set_attribute(name, value);
        self.inner.store.create(&session).await?;

        tracing::debug!(session_id = %session.id(), "Created session");
        state.id = Some(*session.id());
        state.created = true;
        Ok(())
    }

    /// The id of a session created during this request, if any.
    async fn created_id(&self) -> Option<SessionId> {
        let state = self.inner.state.lock().await;
        if state.created {
            state.id
        } else {
            None
        }
    }
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("max_inactive_interval", &self.inner.max_inactive_interval)
            .finish_non_exhaustive()
    }
}

impl<S> axum::extract::FromRequestParts<S> for SessionHandle
where
    S: Send + Sync,
{
    type Rejection = SessionRejection;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            parts
                .extensions
                .get::<SessionHandle>()
                .cloned()
                .ok_or(SessionRejection::MissingSessionLayer)
        })
    }
}

/// Rejection type for session extraction failures.
#[derive(Debug, Clone)]
pub enum SessionRejection {
    /// The route is not wrapped in `session_middleware`.
    MissingSessionLayer,
}

impl IntoResponse for SessionRejection {
    fn into_response(self) -> Response {
        match self {
            SessionRejection::MissingSessionLayer => {
                tracing::error!("SessionHandle extracted on a route without session_middleware");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::internal("Session support not configured")),
                )
                    .into_response()
            }
        }
    }
}
