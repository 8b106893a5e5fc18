//! Agent routes. Reads are public; mutations require the admin role.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use validator::Validate;

use crate::errors::AppError;
use crate::middleware::rbac::RequireAdmin;
use crate::models::agent::{Agent, AgentInput};
use crate::services::agent as agent_service;
use crate::AppState;

/// GET /api/agentes — all agents.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Agent>>, AppError> {
    let agents = agent_service::list(&state.db).await?;
    Ok(Json(agents))
}

/// POST /api/agentes — create (admin only), 409 on duplicate email.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<AgentInput>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let agent = agent_service::create(&state.db, &body).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "status": "success", "id": agent.id })),
    ))
}

/// PUT /api/agentes/{id} — update (admin only).
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i64>,
    Json(body): Json<AgentInput>,
) -> Result<Json<Value>, AppError> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    agent_service::update(&state.db, id, &body).await?;
    Ok(Json(json!({ "status": "success" })))
}

/// DELETE /api/agentes/{id} — blocked with 409 while referenced.
pub async fn remove(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    agent_service::delete(&state.db, id).await?;
    Ok(Json(json!({ "status": "deleted" })))
}
