//! Session routes: thin pass-throughs to the managed identity provider.

use axum::{extract::State, http::HeaderMap, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::services::roles;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// POST /api/register — delegate signup to the provider.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> Result<Json<Value>, AppError> {
    let response = state.identity.sign_up(&body.email, &body.password).await?;
    Ok(Json(response))
}

/// POST /api/login — password grant; provider session passed through.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> Result<Json<Value>, AppError> {
    let session = state.identity.sign_in(&body.email, &body.password).await?;
    Ok(Json(session))
}

/// POST /api/logout — invalidate the bearer's session at the provider.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let token = bearer_token(&headers)?;
    state.identity.sign_out(token).await?;
    Ok(Json(json!({ "status": "success" })))
}

/// POST /api/refresh — refresh grant; provider session passed through.
pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<Value>, AppError> {
    let session = state.identity.refresh(&body.refresh_token).await?;
    Ok(Json(session))
}

/// GET /api/user — resolve the bearer to its identity plus role overlay.
pub async fn user(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let token = bearer_token(&headers)?;
    let identity = state.identity.get_user(token).await?;
    let role = roles::role_for(&state.db, identity.id).await?;

    Ok(Json(json!({
        "id": identity.id,
        "email": identity.email,
        "role": role,
        "created_at": identity.created_at,
        "last_sign_in_at": identity.last_sign_in_at,
    })))
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(AppError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static("Bearer abc123"));
        assert_eq!(bearer_token(&headers).unwrap(), "abc123");
    }

    #[test]
    fn missing_header_is_unauthenticated() {
        let headers = HeaderMap::new();
        assert!(matches!(
            bearer_token(&headers),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn malformed_scheme_is_unauthenticated() {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static("Basic abc123"));
        assert!(matches!(
            bearer_token(&headers),
            Err(AppError::Unauthorized)
        ));
    }
}
