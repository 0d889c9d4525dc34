//! Mapping pipeline failures onto HTTP responses.
//!
//! Bodies always have the shape `{"detail": ...}`; `detail` is a string except for
//! unparseable model replies, where it also carries the raw reply.
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::error::PipelineError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("No image file was uploaded.")]
    MissingUpload,
    #[error("Invalid upload: {0}")]
    Multipart(#[from] MultipartError),
    #[error("Invalid upload: {0}")]
    NotMultipart(#[from] MultipartRejection),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Pipeline(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Pipeline(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MissingUpload => StatusCode::BAD_REQUEST,
            ApiError::Multipart(e) => e.status(),
            ApiError::NotMultipart(e) => e.status(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            ApiError::Pipeline(e @ PipelineError::ResponseFormat(format_err)) => json!({
                "error": e.to_string(),
                "raw_response": format_err.raw_response(),
            }),
            other => json!(other.to_string()),
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
