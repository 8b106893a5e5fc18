//! Admin user management: provider identities merged with the role overlay.
//!
//! Every endpoint here requires the admin role.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::errors::AppError;
use crate::middleware::rbac::RequireAdmin;
use crate::models::user::{AdminUser, UserRole};
use crate::services::roles;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct RoleRequest {
    pub role: String,
}

/// GET /api/admin/users — provider list joined with the role overlay.
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<AdminUser>>, AppError> {
    let identities = state.identity.admin_list_users().await?;
    let overlay = roles::all_roles(&state.db).await?;

    let users = identities
        .into_iter()
        .map(|identity| AdminUser {
            role: overlay.get(&identity.id).copied().unwrap_or(UserRole::User),
            id: identity.id,
            email: identity.email,
            created_at: identity.created_at,
            last_sign_in_at: identity.last_sign_in_at,
        })
        .collect();

    Ok(Json(users))
}

/// POST /api/admin/users — create a provider identity, then its overlay.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<AdminUser>), AppError> {
    let role = parse_role(&body.role)?;

    let identity = state
        .identity
        .admin_create_user(&body.email, &body.password)
        .await?;
    roles::set_role(&state.db, identity.id, role).await?;

    Ok((
        StatusCode::CREATED,
        Json(AdminUser {
            id: identity.id,
            email: identity.email,
            role,
            created_at: identity.created_at,
            last_sign_in_at: identity.last_sign_in_at,
        }),
    ))
}

/// PUT /api/admin/users/{id}/role — role must belong to the fixed set.
pub async fn set_role(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(body): Json<RoleRequest>,
) -> Result<Json<Value>, AppError> {
    let role = parse_role(&body.role)?;
    roles::set_role(&state.db, id, role).await?;
    Ok(Json(json!({ "status": "success" })))
}

/// DELETE /api/admin/users/{id} — an admin may not delete their own account.
pub async fn remove(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    if admin.id == id {
        return Err(AppError::Forbidden(
            "No puedes eliminar tu propia cuenta".to_string(),
        ));
    }

    state.identity.admin_delete_user(id).await?;
    roles::remove(&state.db, id).await?;
    Ok(Json(json!({ "status": "deleted" })))
}

fn parse_role(raw: &str) -> Result<UserRole, AppError> {
    UserRole::parse(raw).ok_or_else(|| {
        AppError::Validation("role must be one of: admin, agent, user".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parsing_accepts_fixed_set() {
        assert_eq!(parse_role("admin").unwrap(), UserRole::Admin);
        assert_eq!(parse_role("agent").unwrap(), UserRole::Agent);
        assert_eq!(parse_role("user").unwrap(), UserRole::User);
    }

    #[test]
    fn role_parsing_rejects_unknown_values() {
        assert!(matches!(
            parse_role("root"),
            Err(AppError::Validation(_))
        ));
        assert!(parse_role("").is_err());
    }
}
