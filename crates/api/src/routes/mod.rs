//! API route definitions.
//!
//! Two routes: `POST /upload` stores text, and every `GET` path is read as
//! a storage key. `GET /upload` is a key like any other.

use axum::{
    Router,
    routing::{get, post},
};

use crate::AppState;

pub mod download;
pub mod upload;

/// Creates the API router with all routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/upload",
            post(upload::upload_text).get(download::download_text),
        )
        .route("/", get(download::download_text))
        .route("/{*key}", get(download::download_text))
}
