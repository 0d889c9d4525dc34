use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::pipeline;
use crate::server::error::ApiError;
use crate::server::AppState;

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "API is running. Use the /docs endpoint to see the documentation."
    }))
}

/// `POST /process-image/`: OCR the uploaded image and return the model's JSON.
pub async fn process_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, ApiError> {
    let model = state.model()?;
    let mut multipart = multipart?;

    let (filename, bytes) = loop {
        let Some(field) = multipart.next_field().await? else {
            return Err(ApiError::MissingUpload);
        };
        if field.name() == Some("file") || field.file_name().is_some() {
            let filename = field.file_name().unwrap_or("upload").to_string();
            break (filename, field.bytes().await?);
        }
    };
    info!(filename = %filename, bytes = bytes.len(), "processing upload");

    let value = pipeline::process_image(state.ocr.as_ref(), model, bytes.to_vec())
        .await
        .inspect_err(|e| warn!(filename = %filename, "upload failed: {e}"))?;

    Ok(Json(value))
}
