//! Download route.

use axum::{
    body::Body,
    extract::State,
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use tracing::{error, warn};
use yourtext_core::relay::{Download, RelayError};
use yourtext_shared::ResponseCode;

use crate::AppState;
use crate::response::{ApiError, ApiResponse};

/// GET `/{*key}`
/// Stream a stored text back as an attachment. The whole path is the key.
pub async fn download_text(State(state): State<AppState>, uri: Uri) -> Response {
    let path = uri.path();

    match state.relay.download(path).await {
        Ok(download) => attachment_response(download),
        Err(e) => {
            match &e {
                RelayError::ObjectNotFound(source) => {
                    warn!(path = %path, error = %source, "Failed to get object");
                }
                RelayError::StatFailed(source) => {
                    error!(path = %path, error = %source, "Failed to get object stat");
                }
                _ => warn!(path = %path, error = %e, "Rejected download"),
            }
            ApiError(e).into_response()
        }
    }
}

fn attachment_response(download: Download) -> Response {
    let content_type = download.content_type().to_string();
    let disposition = download.content_disposition();
    let size = download.info.size;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, size)
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(Body::from_stream(download.body))
        .unwrap_or_else(|e| {
            error!(key = %download.key, error = %e, "Failed to build download response");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(ApiResponse::error(
                    ResponseCode::StatFailed,
                    "failed to get object stat",
                )),
            )
                .into_response()
        })
}
