use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    Json,
};
use bytes::Bytes;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::file::{FileCategory, FileListing, UnknownCategory};
use crate::state::AppState;

/// Multipart field carrying the uploaded document.
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub filename: String,
}

/// POST /upload/:file_type
///
/// The category is validated before the body is read, so an unknown type never
/// reaches the disk.
pub async fn handle_upload(
    State(state): State<AppState>,
    Path(file_type): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let category: FileCategory = file_type
        .parse()
        .map_err(|e: UnknownCategory| AppError::InvalidInput(e.to_string()))?;

    let mut multipart = multipart.map_err(|e| AppError::InvalidInput(e.body_text()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::InvalidInput("Upload is missing a filename".to_string()))?;
        let bytes: Bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidInput(e.body_text()))?;

        let stored = state.store.save(category, &filename, &bytes).await?;
        return Ok(Json(UploadResponse {
            filename: stored.stored_name,
        }));
    }

    Err(AppError::InvalidInput(format!(
        "Multipart body has no '{FILE_FIELD}' field"
    )))
}

/// GET /files
pub async fn handle_list_files(
    State(state): State<AppState>,
) -> Result<Json<FileListing>, AppError> {
    Ok(Json(state.store.list().await?))
}
