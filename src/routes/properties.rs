//! Property routes: list with filters, single fetch, and the write side.
//!
//! The mutating endpoints here are intentionally not auth-gated yet; known
//! gap, tracked for a later hardening pass.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::models::property::{Property, PropertyInput};
use crate::services::filters::PropertyFilters;
use crate::services::property as property_service;
use crate::AppState;

/// GET /api/propiedades — non-deleted properties, newest first.
///
/// Supports `tipo_negocio_id` and `estado_publicacion_id__not_in` filters;
/// unrecognized query parameters are ignored.
pub async fn list(
    State(state): State<AppState>,
    Query(filters): Query<PropertyFilters>,
) -> Result<Json<Value>, AppError> {
    let properties = property_service::list(&state.db, &filters).await?;
    Ok(Json(json!({ "properties": properties })))
}

/// GET /api/propiedades/{id} — 404 if missing or soft-deleted.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Property>, AppError> {
    let property = property_service::find_by_id(&state.db, id).await?;
    Ok(Json(property))
}

/// POST /api/propiedades — 201 with the new id.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<PropertyInput>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let id = property_service::create(&state.db, &body).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "status": "success", "id": id })),
    ))
}

/// PUT /api/propiedades/{id} — full-field replace, 404 if missing.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<PropertyInput>,
) -> Result<Json<Value>, AppError> {
    property_service::update(&state.db, id, &body).await?;
    Ok(Json(json!({ "status": "success" })))
}

/// DELETE /api/propiedades/{id} — soft delete, 404 if missing.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    property_service::soft_delete(&state.db, id).await?;
    Ok(Json(json!({ "status": "deleted (soft)" })))
}
