//! Catalog routes: lookup tables for the UI dropdowns.

use axum::{extract::State, Json};
use serde_json::Value;

use crate::errors::AppError;
use crate::services::catalog;
use crate::AppState;

/// GET /api/catalogos — every lookup table keyed by name.
pub async fn list(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let catalogos = catalog::get_all(&state.db).await?;
    Ok(Json(catalogos))
}
