//! Role overlay lookups over the `profiles` table.

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::UserRole;

/// Resolve the role for an identity. A missing overlay row, or a value
/// outside the fixed set, resolves to `user`.
pub async fn role_for(pool: &PgPool, user_id: Uuid) -> Result<UserRole, AppError> {
    let stored = sqlx::query_scalar::<_, String>("SELECT role FROM profiles WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(match stored {
        Some(value) => UserRole::parse(&value).unwrap_or_else(|| {
            tracing::warn!(user_id = %user_id, role = value, "Unknown role in profile, defaulting to user");
            UserRole::User
        }),
        None => UserRole::User,
    })
}

/// Assign a role, creating the overlay row lazily on first assignment.
pub async fn set_role(pool: &PgPool, user_id: Uuid, role: UserRole) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO profiles (id, role) VALUES ($1, $2)
         ON CONFLICT (id) DO UPDATE SET role = EXCLUDED.role",
    )
    .bind(user_id)
    .bind(role.as_str())
    .execute(pool)
    .await?;
    Ok(())
}

/// Drop the overlay row when the provider identity is deleted.
pub async fn remove(pool: &PgPool, user_id: Uuid) -> Result<(), AppError> {
    sqlx::query("DELETE FROM profiles WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// All overlay rows at once, for merging into the provider user list.
pub async fn all_roles(pool: &PgPool) -> Result<HashMap<Uuid, UserRole>, AppError> {
    let rows = sqlx::query_as::<_, (Uuid, String)>("SELECT id, role FROM profiles")
        .fetch_all(pool)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(id, role)| (id, UserRole::parse(&role).unwrap_or(UserRole::User)))
        .collect())
}
