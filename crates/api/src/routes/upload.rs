//! Upload route.

use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::{error, info, warn};
use yourtext_core::relay::RelayError;

use crate::AppState;
use crate::response::{ApiError, ApiResponse, UploadData};

/// Request body for an upload.
#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    /// Text to store.
    pub content: String,
}

/// POST `/upload`
/// Store a text and return its retrieval URL.
///
/// The body is parsed as JSON whatever `Content-Type` says. A body over the
/// router's size limit can only hold over-long content, so it is answered
/// as such.
pub async fn upload_text(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ApiResponse<UploadData>>, ApiError> {
    let body = body.map_err(|rejection| {
        warn!(error = %rejection, "Rejected upload body");
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError(RelayError::ContentTooLong {
                max: state.relay.config().max_content_length,
            })
        } else {
            ApiError(RelayError::BadRequest)
        }
    })?;

    let Json(request) = Json::<UploadRequest>::from_bytes(&body).map_err(|rejection| {
        warn!(error = %rejection, "Rejected upload body");
        ApiError(RelayError::BadRequest)
    })?;

    match state.relay.upload(request.content).await {
        Ok(receipt) => {
            info!(key = %receipt.key, "Text uploaded");
            Ok(Json(ApiResponse::ok(UploadData { url: receipt.url })))
        }
        Err(RelayError::UploadFailed { key, source }) => {
            error!(key = %key, error = %source, "Failed to upload");
            Err(RelayError::UploadFailed { key, source }.into())
        }
        Err(e) => {
            warn!(error = %e, "Rejected upload");
            Err(e.into())
        }
    }
}
