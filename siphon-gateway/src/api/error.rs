use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

/// Request-level failures of the HTTP surface.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed query: unknown scope or sensor name.
    BadRequest(String),
    /// No upload has ever been decoded; absence is explicit, never faked.
    NoData,
    /// The upload failed to decode; the store was not touched.
    UndecodableUpload(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NoData => (
                StatusCode::NOT_FOUND,
                "no readings ingested yet".to_string(),
            ),
            ApiError::UndecodableUpload(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = ErrorResponse {
            success: false,
            message,
        };

        (status, Json(body)).into_response()
    }
}
