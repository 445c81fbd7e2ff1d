//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - `POST /upload` and the catch-all `GET` download route
//! - The `{code, msg, data}` response envelope
//! - CORS, tracing and upload body size layers

pub mod response;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, Method, header};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use yourtext_core::relay::TextRelay;

/// How long browsers may cache a preflight response.
const CORS_MAX_AGE: Duration = Duration::from_secs(172_800);

/// Body limit floor, matching axum's default.
const MIN_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Most JSON bytes one character can take: an escaped surrogate pair.
const MAX_JSON_BYTES_PER_CHAR: usize = 12;

/// Room for the JSON wrapper around `content`.
const BODY_OVERHEAD: usize = 64 * 1024;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Upload and download flows.
    pub relay: Arc<TextRelay>,
}

impl AppState {
    /// Create application state around a relay.
    #[must_use]
    pub fn new(relay: Arc<TextRelay>) -> Self {
        Self { relay }
    }
}

/// Largest upload body that could still carry `max_chars` characters of
/// content. Anything bigger is over-long without being parsed.
#[must_use]
pub fn upload_body_limit(max_chars: usize) -> usize {
    max_chars
        .saturating_mul(MAX_JSON_BYTES_PER_CHAR)
        .saturating_add(BODY_OVERHEAD)
        .max(MIN_BODY_LIMIT)
}

/// Creates the main application router.
///
/// Store deadlines are enforced by the relay, so a slow backend still
/// yields a `{code, msg, data}` reply.
pub fn create_router(state: AppState) -> Router {
    let exposed: [HeaderName; 2] = [header::CONTENT_DISPOSITION, header::CONTENT_LENGTH];
    let body_limit = upload_body_limit(state.relay.config().max_content_length);

    Router::new()
        .merge(routes::routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers(Any)
                .expose_headers(exposed)
                .max_age(CORS_MAX_AGE),
        )
        .with_state(state)
}
