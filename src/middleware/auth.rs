//! Authenticated-user extractor for Axum handlers.

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::UserRole;
use crate::services::roles;
use crate::AppState;

/// Identity resolved from the request's bearer credential.
///
/// The token is verified by the external identity provider; the role comes
/// from the local overlay table (missing row defaults to `user`). Use as an
/// Axum extractor in handlers that require authentication:
/// ```ignore
/// async fn handler(current_user: CurrentUser) -> impl IntoResponse { ... }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: Option<String>,
    pub role: UserRole,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthorized)?;

        let identity = state.identity.get_user(token).await?;
        let role = roles::role_for(&state.db, identity.id).await?;

        Ok(CurrentUser {
            id: identity.id,
            email: identity.email,
            role,
        })
    }
}
