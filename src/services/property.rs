//! Property aggregator: list/fetch with image rollup, and the write side.

use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::property::{Property, PropertyInput};
use crate::services::filters::PropertyFilters;

/// Shared SELECT joining each property to its ordered image list.
///
/// The LEFT JOIN plus the `FILTER (WHERE pi.id IS NOT NULL)` guard makes a
/// property with zero images aggregate to NULL instead of `[null]`, and the
/// GROUP BY guarantees exactly one row per property id.
const PROPERTY_SELECT: &str = r#"
    SELECT p.*,
           json_agg(
               json_build_object(
                   'id', pi.id,
                   'url', pi.url,
                   'nombre_archivo', pi.nombre_archivo,
                   'es_principal', pi.es_principal,
                   'orden', pi.orden
               )
               ORDER BY pi.orden ASC
           ) FILTER (WHERE pi.id IS NOT NULL) AS imagenes
    FROM propiedades p
    LEFT JOIN propiedad_imagenes pi ON pi.propiedad_id = p.id
"#;

/// List non-deleted properties matching the filters, newest id first.
pub async fn list(pool: &PgPool, filters: &PropertyFilters) -> Result<Vec<Property>, AppError> {
    let built = filters.build();
    let sql = format!(
        "{PROPERTY_SELECT} {} GROUP BY p.id ORDER BY p.id DESC",
        built.clause
    );

    let mut query = sqlx::query_as::<_, Property>(&sql);
    if let Some(id) = built.tipo_negocio_id {
        query = query.bind(id);
    }
    if let Some(excluded) = built.excluded_estados {
        query = query.bind(excluded);
    }

    Ok(query.fetch_all(pool).await?)
}

/// Fetch one non-deleted property with its images.
pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Property, AppError> {
    let sql = format!("{PROPERTY_SELECT} WHERE p.id = $1 AND p.deleted_at IS NULL GROUP BY p.id");
    sqlx::query_as::<_, Property>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Propiedad {id} no encontrada")))
}

/// Create a property from the full flat field set, returning the new id.
///
/// Counters and areas default to 0 when unsupplied; every other optional
/// field defaults to NULL.
pub async fn create(pool: &PgPool, input: &PropertyInput) -> Result<i64, AppError> {
    let titulo = required_titulo(input)?;

    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO propiedades (
            titulo, descripcion, precio, precio_alquiler, valor_administracion,
            habitaciones, alcobas, banos, banos_medios, estacionamientos,
            anio_construccion, piso, m2_terreno, m2_construccion, m2_privada,
            direccion, codigo_postal, lat, lng, registro_publico,
            convenio_url, convenio_validado,
            tipo_negocio_id, tipo_propiedad_id, estado_publicacion_id,
            captado_por_agente_id, moneda_id, frecuencia_alquiler_id,
            estado_fisico_id, estado_id, ciudad_id, zona_id, agente_id,
            agente_externo_id, validado_por_usuario_id
        ) VALUES (
            $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
            $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28,
            $29, $30, $31, $32, $33, $34, $35
        ) RETURNING id
        "#,
    )
    .bind(titulo)
    .bind(&input.descripcion)
    .bind(input.precio)
    .bind(input.precio_alquiler)
    .bind(input.valor_administracion)
    .bind(input.habitaciones.unwrap_or(0))
    .bind(input.alcobas.unwrap_or(0))
    .bind(input.banos.unwrap_or(0))
    .bind(input.banos_medios.unwrap_or(0))
    .bind(input.estacionamientos.unwrap_or(0))
    .bind(input.anio_construccion)
    .bind(&input.piso)
    .bind(input.m2_terreno.unwrap_or(0.0))
    .bind(input.m2_construccion.unwrap_or(0.0))
    .bind(input.m2_privada.unwrap_or(0.0))
    .bind(&input.direccion)
    .bind(&input.codigo_postal)
    .bind(input.lat)
    .bind(input.lng)
    .bind(&input.registro_publico)
    .bind(&input.convenio_url)
    .bind(input.convenio_validado.unwrap_or(false))
    .bind(input.tipo_negocio_id)
    .bind(input.tipo_propiedad_id)
    .bind(input.estado_publicacion_id)
    .bind(input.captado_por_agente_id)
    .bind(input.moneda_id)
    .bind(input.frecuencia_alquiler_id)
    .bind(input.estado_fisico_id)
    .bind(input.estado_id)
    .bind(input.ciudad_id)
    .bind(input.zona_id)
    .bind(input.agente_id)
    .bind(input.agente_externo_id)
    .bind(input.validado_por_usuario_id)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Full-field replace. No sparse semantics: absent fields become NULL.
/// Always refreshes `updated_at`; 404 for missing or soft-deleted ids.
pub async fn update(pool: &PgPool, id: i64, input: &PropertyInput) -> Result<(), AppError> {
    let titulo = required_titulo(input)?;

    let result = sqlx::query(
        r#"
        UPDATE propiedades SET
            titulo = $2, descripcion = $3, precio = $4, precio_alquiler = $5,
            valor_administracion = $6, habitaciones = $7, alcobas = $8, banos = $9,
            banos_medios = $10, estacionamientos = $11, anio_construccion = $12, piso = $13,
            m2_terreno = $14, m2_construccion = $15, m2_privada = $16, direccion = $17,
            codigo_postal = $18, lat = $19, lng = $20, registro_publico = $21,
            convenio_url = $22, convenio_validado = $23,
            tipo_negocio_id = $24, tipo_propiedad_id = $25, estado_publicacion_id = $26,
            captado_por_agente_id = $27, moneda_id = $28, frecuencia_alquiler_id = $29,
            estado_fisico_id = $30, estado_id = $31, ciudad_id = $32, zona_id = $33,
            agente_id = $34, agente_externo_id = $35, validado_por_usuario_id = $36,
            updated_at = NOW()
        WHERE id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .bind(titulo)
    .bind(&input.descripcion)
    .bind(input.precio)
    .bind(input.precio_alquiler)
    .bind(input.valor_administracion)
    .bind(input.habitaciones)
    .bind(input.alcobas)
    .bind(input.banos)
    .bind(input.banos_medios)
    .bind(input.estacionamientos)
    .bind(input.anio_construccion)
    .bind(&input.piso)
    .bind(input.m2_terreno)
    .bind(input.m2_construccion)
    .bind(input.m2_privada)
    .bind(&input.direccion)
    .bind(&input.codigo_postal)
    .bind(input.lat)
    .bind(input.lng)
    .bind(&input.registro_publico)
    .bind(&input.convenio_url)
    .bind(input.convenio_validado)
    .bind(input.tipo_negocio_id)
    .bind(input.tipo_propiedad_id)
    .bind(input.estado_publicacion_id)
    .bind(input.captado_por_agente_id)
    .bind(input.moneda_id)
    .bind(input.frecuencia_alquiler_id)
    .bind(input.estado_fisico_id)
    .bind(input.estado_id)
    .bind(input.ciudad_id)
    .bind(input.zona_id)
    .bind(input.agente_id)
    .bind(input.agente_externo_id)
    .bind(input.validado_por_usuario_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Propiedad {id} no encontrada")));
    }
    Ok(())
}

/// Soft delete: stamp `deleted_at`, never remove the row.
pub async fn soft_delete(pool: &PgPool, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("UPDATE propiedades SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Propiedad {id} no encontrada")));
    }
    Ok(())
}

fn required_titulo(input: &PropertyInput) -> Result<&str, AppError> {
    input
        .titulo
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Validation("titulo is required".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titulo_is_required() {
        let input = PropertyInput::default();
        let err = required_titulo(&input).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let input = PropertyInput {
            titulo: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(required_titulo(&input).is_err());

        let input = PropertyInput {
            titulo: Some("Casa A".to_string()),
            ..Default::default()
        };
        assert_eq!(required_titulo(&input).unwrap(), "Casa A");
    }

    #[test]
    fn aggregation_select_guards_null_placeholder_rows() {
        // The outer join must not surface the NULL placeholder row as an
        // image entry; the FILTER clause is what keeps empty lists NULL.
        assert!(PROPERTY_SELECT.contains("LEFT JOIN propiedad_imagenes"));
        assert!(PROPERTY_SELECT.contains("FILTER (WHERE pi.id IS NOT NULL)"));
        assert!(PROPERTY_SELECT.contains("ORDER BY pi.orden ASC"));
    }
}
