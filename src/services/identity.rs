//! Managed identity-provider client.
//!
//! Credential issuance and verification are fully delegated: this module
//! only wraps the provider's REST surface (signup, password and refresh
//! grants, logout, user introspection, and the service-key admin user API).
//! Session payloads are passed through as raw JSON; only the fields the
//! role gate needs are deserialized.

use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::errors::AppError;

/// Identity as known to the provider. The role overlay lives in our own
/// `profiles` table, not here.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderUser {
    pub id: Uuid,
    pub email: Option<String>,
    pub created_at: Option<String>,
    pub last_sign_in_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ProviderUserList {
    users: Vec<ProviderUser>,
}

#[derive(Debug, Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    service_key: String,
}

impl IdentityClient {
    pub fn new(base_url: &str, anon_key: &str, service_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            service_key: service_key.to_string(),
        }
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1{path}", self.base_url)
    }

    /// POST /signup — create a credential pair for a new end user.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Value, AppError> {
        let response = self
            .http
            .post(self.auth_url("/signup"))
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(connect_error)?;
        read_json(response, CredentialFailure::Validation).await
    }

    /// POST /token?grant_type=password — exchange credentials for a session.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Value, AppError> {
        let response = self
            .http
            .post(self.auth_url("/token?grant_type=password"))
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(connect_error)?;
        read_json(response, CredentialFailure::Unauthorized).await
    }

    /// POST /token?grant_type=refresh_token — rotate a session.
    pub async fn refresh(&self, refresh_token: &str) -> Result<Value, AppError> {
        let response = self
            .http
            .post(self.auth_url("/token?grant_type=refresh_token"))
            .header("apikey", &self.anon_key)
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await
            .map_err(connect_error)?;
        read_json(response, CredentialFailure::Unauthorized).await
    }

    /// POST /logout — invalidate the bearer's session.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), AppError> {
        let response = self
            .http
            .post(self.auth_url("/logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(connect_error)?;

        if response.status().is_success() {
            Ok(())
        } else if response.status().is_client_error() {
            Err(AppError::Unauthorized)
        } else {
            Err(AppError::Upstream(format!(
                "Identity provider logout failed ({})",
                response.status()
            )))
        }
    }

    /// GET /user — resolve a bearer token to its identity.
    ///
    /// Invalid or expired credentials come back as an unauthenticated
    /// condition, never as a provider error.
    pub async fn get_user(&self, access_token: &str) -> Result<ProviderUser, AppError> {
        let response = self
            .http
            .get(self.auth_url("/user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(connect_error)?;

        if response.status().is_client_error() {
            return Err(AppError::Unauthorized);
        }
        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Identity provider user lookup failed ({})",
                response.status()
            )));
        }
        response
            .json::<ProviderUser>()
            .await
            .map_err(|e| AppError::Upstream(format!("Invalid identity provider response: {e}")))
    }

    /// GET /admin/users — list every identity (service key).
    pub async fn admin_list_users(&self) -> Result<Vec<ProviderUser>, AppError> {
        let response = self
            .http
            .get(self.auth_url("/admin/users"))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .send()
            .await
            .map_err(connect_error)?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Identity provider user list failed ({})",
                response.status()
            )));
        }
        let list = response
            .json::<ProviderUserList>()
            .await
            .map_err(|e| AppError::Upstream(format!("Invalid identity provider response: {e}")))?;
        Ok(list.users)
    }

    /// POST /admin/users — create a pre-confirmed identity (service key).
    pub async fn admin_create_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderUser, AppError> {
        let response = self
            .http
            .post(self.auth_url("/admin/users"))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .json(&json!({
                "email": email,
                "password": password,
                "email_confirm": true
            }))
            .send()
            .await
            .map_err(connect_error)?;

        let status = response.status();
        let body = response
            .json::<Value>()
            .await
            .map_err(|e| AppError::Upstream(format!("Invalid identity provider response: {e}")))?;

        if status.is_success() {
            return serde_json::from_value(body)
                .map_err(|e| AppError::Upstream(format!("Invalid identity provider response: {e}")));
        }
        if status == reqwest::StatusCode::UNPROCESSABLE_ENTITY
            || status == reqwest::StatusCode::CONFLICT
        {
            return Err(AppError::Conflict(
                provider_message(&body).unwrap_or_else(|| "User already exists".to_string()),
            ));
        }
        if status.is_client_error() {
            return Err(AppError::Validation(
                provider_message(&body).unwrap_or_else(|| "Invalid user payload".to_string()),
            ));
        }
        Err(AppError::Upstream(format!(
            "Identity provider user creation failed ({status})"
        )))
    }

    /// DELETE /admin/users/{id} — remove an identity (service key).
    pub async fn admin_delete_user(&self, user_id: Uuid) -> Result<(), AppError> {
        let response = self
            .http
            .delete(self.auth_url(&format!("/admin/users/{user_id}")))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .send()
            .await
            .map_err(connect_error)?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else if status == reqwest::StatusCode::NOT_FOUND {
            Err(AppError::NotFound(format!("Usuario {user_id} no encontrado")))
        } else {
            Err(AppError::Upstream(format!(
                "Identity provider user deletion failed ({status})"
            )))
        }
    }
}

/// How a non-success provider response on a credential call should surface.
#[derive(Debug, Clone, Copy)]
enum CredentialFailure {
    /// Bad signup payload (weak password, malformed email) → 400.
    Validation,
    /// Bad credentials on login/refresh → 401.
    Unauthorized,
}

fn connect_error(e: reqwest::Error) -> AppError {
    AppError::Upstream(format!("Identity provider unreachable: {e}"))
}

async fn read_json(
    response: reqwest::Response,
    on_client_error: CredentialFailure,
) -> Result<Value, AppError> {
    let status = response.status();
    let body = response
        .json::<Value>()
        .await
        .map_err(|e| AppError::Upstream(format!("Invalid identity provider response: {e}")))?;

    if status.is_success() {
        return Ok(body);
    }
    if status.is_client_error() {
        return Err(match on_client_error {
            CredentialFailure::Unauthorized => AppError::Unauthorized,
            CredentialFailure::Validation => AppError::Validation(
                provider_message(&body).unwrap_or_else(|| "Invalid request".to_string()),
            ),
        });
    }
    Err(AppError::Upstream(format!(
        "Identity provider call failed ({status})"
    )))
}

/// Pull a human-readable message out of a provider error body.
fn provider_message(body: &Value) -> Option<String> {
    for key in ["msg", "message", "error_description", "error"] {
        if let Some(text) = body.get(key).and_then(Value::as_str) {
            return Some(text.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_url_joins_without_double_slash() {
        let client = IdentityClient::new("https://proj.example.co/", "anon", "service");
        assert_eq!(
            client.auth_url("/token?grant_type=password"),
            "https://proj.example.co/auth/v1/token?grant_type=password"
        );
    }

    #[test]
    fn provider_message_prefers_msg_field() {
        let body = json!({ "msg": "User already registered", "error": "conflict" });
        assert_eq!(
            provider_message(&body).as_deref(),
            Some("User already registered")
        );
    }

    #[test]
    fn provider_message_falls_back_through_fields() {
        let body = json!({ "error_description": "Invalid login credentials" });
        assert_eq!(
            provider_message(&body).as_deref(),
            Some("Invalid login credentials")
        );
        assert_eq!(provider_message(&json!({})), None);
    }

    #[test]
    fn provider_user_deserializes_partial_payload() {
        let user: ProviderUser = serde_json::from_value(json!({
            "id": "a2f4e6ba-1111-4222-8333-444455556666",
            "email": "ana@example.com"
        }))
        .unwrap();
        assert_eq!(user.email.as_deref(), Some("ana@example.com"));
        assert!(user.created_at.is_none());
    }
}
