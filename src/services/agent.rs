//! Agent CRUD with the application-level referential guard.

use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::agent::{Agent, AgentInput};

/// List all agents ordered by name.
pub async fn list(pool: &PgPool) -> Result<Vec<Agent>, AppError> {
    Ok(sqlx::query_as::<_, Agent>(
        "SELECT id, nombre, email, telefono FROM agentes ORDER BY nombre ASC",
    )
    .fetch_all(pool)
    .await?)
}

/// Create an agent; duplicate email is a conflict.
pub async fn create(pool: &PgPool, input: &AgentInput) -> Result<Agent, AppError> {
    sqlx::query_as::<_, Agent>(
        "INSERT INTO agentes (nombre, email, telefono) VALUES ($1, $2, $3)
         RETURNING id, nombre, email, telefono",
    )
    .bind(&input.nombre)
    .bind(&input.email)
    .bind(&input.telefono)
    .fetch_one(pool)
    .await
    .map_err(duplicate_email)
}

/// Update an agent; 404 when missing, conflict on duplicate email.
pub async fn update(pool: &PgPool, id: i64, input: &AgentInput) -> Result<Agent, AppError> {
    sqlx::query_as::<_, Agent>(
        "UPDATE agentes SET nombre = $2, email = $3, telefono = $4 WHERE id = $1
         RETURNING id, nombre, email, telefono",
    )
    .bind(id)
    .bind(&input.nombre)
    .bind(&input.email)
    .bind(&input.telefono)
    .fetch_optional(pool)
    .await
    .map_err(duplicate_email)?
    .ok_or_else(|| AppError::NotFound(format!("Agente {id} no encontrado")))
}

/// Delete an agent unless any property still references it.
///
/// The guard lives in application code, not in a database constraint, and
/// covers both FK roles into `agentes`: the listing agent and the sourcing
/// agent. Soft-deleted properties still hold references and still block.
pub async fn delete(pool: &PgPool, id: i64) -> Result<(), AppError> {
    let references = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM propiedades WHERE agente_id = $1 OR captado_por_agente_id = $1",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;

    if references > 0 {
        return Err(AppError::Conflict(format!(
            "El agente {id} tiene {references} propiedades asociadas y no puede eliminarse"
        )));
    }

    let result = sqlx::query("DELETE FROM agentes WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Agente {id} no encontrado")));
    }
    Ok(())
}

fn duplicate_email(e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("Ya existe un agente con ese email".to_string())
        }
        _ => AppError::Database(e),
    }
}
