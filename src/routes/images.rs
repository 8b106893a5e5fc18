//! Property image routes: multipart upload, delete, primary flag.
//!
//! Like the property write endpoints, these are intentionally not
//! auth-gated yet; known gap.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::models::property::PropertyImage;
use crate::services::image as image_service;
use crate::AppState;

/// POST /api/propiedades/{id}/imagenes — multipart upload.
///
/// Expects a `file` part; an optional `es_principal` text part marks the
/// uploaded image as the property's primary.
pub async fn upload(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<PropertyImage>), AppError> {
    let mut file_bytes: Option<Vec<u8>> = None;
    let mut filename = String::from("archivo");
    let mut content_type = String::from("application/octet-stream");
    let mut es_principal = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                if let Some(original) = field.file_name() {
                    filename = original.to_string();
                }
                if let Some(mime) = field.content_type() {
                    content_type = mime.to_string();
                }
                file_bytes = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?
                        .to_vec(),
                );
            }
            "es_principal" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read es_principal: {e}")))?;
                es_principal = matches!(text.trim().to_lowercase().as_str(), "true" | "1");
            }
            _ => {}
        }
    }

    let bytes = file_bytes.ok_or_else(|| {
        AppError::Validation("Missing 'file' field in multipart request".to_string())
    })?;

    let image = image_service::upload(
        &state.db,
        &state.storage,
        id,
        &filename,
        &content_type,
        bytes,
        es_principal,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(image)))
}

/// DELETE /api/propiedades/{id}/imagenes/{imagen_id} — best-effort storage
/// delete, then the database row.
pub async fn remove(
    State(state): State<AppState>,
    Path((id, imagen_id)): Path<(i64, i64)>,
) -> Result<Json<Value>, AppError> {
    image_service::delete(&state.db, &state.storage, id, imagen_id).await?;
    Ok(Json(json!({ "status": "deleted" })))
}

/// PUT /api/propiedades/{id}/imagenes/{imagen_id}/principal — unmark all,
/// then mark one.
pub async fn set_principal(
    State(state): State<AppState>,
    Path((id, imagen_id)): Path<(i64, i64)>,
) -> Result<Json<Value>, AppError> {
    image_service::set_principal(&state.db, id, imagen_id).await?;
    Ok(Json(json!({ "status": "success" })))
}
