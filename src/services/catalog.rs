//! Catalog reader: read-only fetch of the lookup tables for UI dropdowns.

use serde_json::{Map, Value};
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::agent::Agent;
use crate::models::catalog::{CatalogEntry, CatalogTable};

/// Fetch every catalog table, keyed by table name and ordered by `nombre`.
///
/// `agentes` carries full records (id, nombre, email, telefono) instead of
/// the bare `(id, nombre)` pair.
pub async fn get_all(pool: &PgPool) -> Result<Value, AppError> {
    let mut catalogos = Map::new();

    for table in CatalogTable::ALL {
        // Identifiers come from the compile-time enum, never from callers.
        let sql = format!(
            "SELECT id, nombre FROM {} ORDER BY nombre ASC",
            table.table_name()
        );
        let rows = sqlx::query_as::<_, CatalogEntry>(&sql)
            .fetch_all(pool)
            .await?;
        catalogos.insert(table.table_name().to_string(), to_json(&rows)?);
    }

    let agentes = sqlx::query_as::<_, Agent>(
        "SELECT id, nombre, email, telefono FROM agentes ORDER BY nombre ASC",
    )
    .fetch_all(pool)
    .await?;
    catalogos.insert("agentes".to_string(), to_json(&agentes)?);

    Ok(Value::Object(catalogos))
}

fn to_json<T: serde::Serialize>(rows: &T) -> Result<Value, AppError> {
    serde_json::to_value(rows)
        .map_err(|e| AppError::Internal(format!("Failed to serialize catalog: {e}")))
}
