//! Response envelope shared by every JSON reply.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use yourtext_core::relay::RelayError;
use yourtext_shared::ResponseCode;

/// `{code, msg, data}` envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Application response code.
    pub code: ResponseCode,
    /// Human-readable message, empty on success.
    pub msg: String,
    /// Payload, `{}` on failure.
    pub data: T,
}

/// Empty JSON object payload.
#[derive(Debug, Default, Serialize)]
pub struct Empty {}

/// Payload of a successful upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadData {
    /// Public retrieval URL.
    pub url: String,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wraps a successful payload.
    pub fn ok(data: T) -> Self {
        Self {
            code: ResponseCode::Ok,
            msg: String::new(),
            data,
        }
    }
}

impl ApiResponse<Empty> {
    /// Builds a failure envelope.
    pub fn error(code: ResponseCode, msg: impl Into<String>) -> Self {
        Self {
            code,
            msg: msg.into(),
            data: Empty {},
        }
    }
}

/// Relay error rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub RelayError);

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.code();
        let status =
            StatusCode::from_u16(code.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ApiResponse::error(code, self.0.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use rstest::rstest;
    use serde_json::{Value, json};
    use yourtext_core::address::StorageKey;
    use yourtext_core::storage::StorageError;

    async fn body_json(response: Response) -> Value {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[test]
    fn test_ok_envelope_shape() {
        let response = ApiResponse::ok(UploadData {
            url: "http://localhost:8080/2024/03/05/a.txt".to_string(),
        });
        assert_eq!(
            serde_json::to_value(&response).expect("serialize"),
            json!({
                "code": 0,
                "msg": "",
                "data": {"url": "http://localhost:8080/2024/03/05/a.txt"}
            })
        );
    }

    #[rstest]
    #[case(RelayError::BadRequest, StatusCode::BAD_REQUEST, 1, "Bad request")]
    #[case(
        RelayError::ContentTooLong { max: 10_000 },
        StatusCode::BAD_REQUEST,
        2,
        "content too long, max length is 10000"
    )]
    #[case(
        RelayError::UploadFailed {
            key: StorageKey::from_request_path("2024/03/05/a.txt").expect("key"),
            source: StorageError::operation("boom"),
        },
        StatusCode::INTERNAL_SERVER_ERROR,
        2,
        "failed to upload"
    )]
    #[case(
        RelayError::ObjectNotFound(StorageError::not_found("k")),
        StatusCode::NOT_FOUND,
        2,
        "failed to get object"
    )]
    #[case(
        RelayError::StatFailed(StorageError::operation("boom")),
        StatusCode::INTERNAL_SERVER_ERROR,
        3,
        "failed to get object stat"
    )]
    #[tokio::test]
    async fn test_error_envelope(
        #[case] err: RelayError,
        #[case] status: StatusCode,
        #[case] code: u8,
        #[case] msg: &str,
    ) {
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), status);
        assert_eq!(
            body_json(response).await,
            json!({"code": code, "msg": msg, "data": {}})
        );
    }
}
