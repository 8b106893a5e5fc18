//! Dashboard statistics aggregation queries.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::errors::AppError;

/// Aggregated dashboard statistics for the admin overview page.
///
/// Every sub-query is scoped to non-deleted properties. The assembly is
/// all-or-nothing: one failed sub-query fails the whole response.
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_propiedades: i64,
    pub propiedades_publicadas: i64,
    pub total_visitas: i64,
    pub propiedad_mas_visitada: Option<MostVisitedProperty>,
    pub por_tipo_negocio: Vec<CategoryCount>,
    pub por_tipo_propiedad: Vec<CategoryCount>,
    pub por_estado_publicacion: Vec<CategoryCount>,
    pub top_ciudades: Vec<CityCount>,
    pub top_agentes: Vec<AgentCount>,
    pub precios: PriceSummary,
    pub propiedades_nuevas_semana: i64,
    pub imagenes: ImageCoverage,
}

/// The single most-visited property, when any has visits at all.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct MostVisitedProperty {
    pub id: i64,
    pub titulo: String,
    pub visitas: i32,
    pub direccion: Option<String>,
}

/// Property count for one catalog value (zero counts included).
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct CategoryCount {
    pub nombre: String,
    pub cantidad: i64,
}

/// Property count for a city, joined through its parent state.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct CityCount {
    pub ciudad: String,
    pub estado: Option<String>,
    pub cantidad: i64,
}

/// Sourced-property count for an agent.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct AgentCount {
    pub nombre: String,
    pub email: String,
    pub propiedades_captadas: i64,
}

/// Sale and rental price rollup. All fields are NULL with zero properties;
/// averages are rounded to 2 decimal places.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct PriceSummary {
    pub precio_promedio_venta: Option<f64>,
    pub precio_min_venta: Option<f64>,
    pub precio_max_venta: Option<f64>,
    pub precio_promedio_alquiler: Option<f64>,
    pub precio_min_alquiler: Option<f64>,
    pub precio_max_alquiler: Option<f64>,
}

/// Split of properties with at least one image vs. none.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ImageCoverage {
    pub con_imagenes: i64,
    pub sin_imagenes: i64,
}

/// Recent property activity entry for the dashboard feed.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct RecentActivity {
    pub id: i64,
    pub titulo: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub captado_por: Option<String>,
    pub estado: Option<String>,
}

/// Fetch all dashboard statistics in parallel queries.
pub async fn get_stats(pool: &PgPool) -> Result<DashboardStats, AppError> {
    let (
        total_propiedades,
        propiedades_publicadas,
        total_visitas,
        propiedad_mas_visitada,
        por_tipo_negocio,
        por_tipo_propiedad,
        por_estado_publicacion,
        top_ciudades,
        top_agentes,
        precios,
        propiedades_nuevas_semana,
        imagenes,
    ) = tokio::try_join!(
        fetch_total(pool),
        fetch_publicadas(pool),
        fetch_total_visitas(pool),
        fetch_most_visited(pool),
        fetch_category_counts(pool, "tipos_negocio", "tipo_negocio_id"),
        fetch_category_counts(pool, "tipos_propiedad", "tipo_propiedad_id"),
        fetch_category_counts(pool, "estados_publicacion", "estado_publicacion_id"),
        fetch_top_ciudades(pool),
        fetch_top_agentes(pool),
        fetch_precios(pool),
        fetch_nuevas_semana(pool),
        fetch_image_coverage(pool),
    )?;

    Ok(DashboardStats {
        total_propiedades,
        propiedades_publicadas,
        total_visitas,
        propiedad_mas_visitada,
        por_tipo_negocio,
        por_tipo_propiedad,
        por_estado_publicacion,
        top_ciudades,
        top_agentes,
        precios,
        propiedades_nuevas_semana,
        imagenes,
    })
}

/// Count all non-deleted properties.
async fn fetch_total(pool: &PgPool) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM propiedades WHERE deleted_at IS NULL",
    )
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// Count properties whose publication-status name contains "publicad".
///
/// Deliberate fuzzy match against catalog text ("Publicada", "Publicado",
/// "Publicadas"...), not a status-id equality.
async fn fetch_publicadas(pool: &PgPool) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM propiedades p
        JOIN estados_publicacion ep ON p.estado_publicacion_id = ep.id
        WHERE p.deleted_at IS NULL AND ep.nombre ILIKE '%publicad%'
        "#,
    )
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// Sum of the visit counter; missing values count as zero.
async fn fetch_total_visitas(pool: &PgPool) -> Result<i64, AppError> {
    let total = sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(SUM(visitas), 0) FROM propiedades WHERE deleted_at IS NULL",
    )
    .fetch_one(pool)
    .await?;
    Ok(total)
}

/// The most-visited property with more than zero visits, if any.
async fn fetch_most_visited(pool: &PgPool) -> Result<Option<MostVisitedProperty>, AppError> {
    let row = sqlx::query_as::<_, MostVisitedProperty>(
        r#"
        SELECT id, titulo, visitas, direccion
        FROM propiedades
        WHERE deleted_at IS NULL AND visitas > 0
        ORDER BY visitas DESC
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Property counts per catalog value, zero counts included, sorted
/// descending. The LEFT JOIN runs from the catalog side so every value
/// appears even with no matching property.
///
/// `catalog_table` and `fk_column` are compile-time literals from the
/// callers above, never caller input.
async fn fetch_category_counts(
    pool: &PgPool,
    catalog_table: &'static str,
    fk_column: &'static str,
) -> Result<Vec<CategoryCount>, AppError> {
    let sql = format!(
        r#"
        SELECT c.nombre, COUNT(p.id) AS cantidad
        FROM {catalog_table} c
        LEFT JOIN propiedades p ON p.{fk_column} = c.id AND p.deleted_at IS NULL
        GROUP BY c.id, c.nombre
        ORDER BY cantidad DESC, c.nombre ASC
        "#
    );
    let rows = sqlx::query_as::<_, CategoryCount>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Top 5 cities by property count, joined through their parent state.
async fn fetch_top_ciudades(pool: &PgPool) -> Result<Vec<CityCount>, AppError> {
    let rows = sqlx::query_as::<_, CityCount>(
        r#"
        SELECT ci.nombre AS ciudad, e.nombre AS estado, COUNT(p.id) AS cantidad
        FROM ciudades ci
        LEFT JOIN estados e ON ci.estado_id = e.id
        JOIN propiedades p ON p.ciudad_id = ci.id AND p.deleted_at IS NULL
        GROUP BY ci.id, ci.nombre, e.nombre
        ORDER BY cantidad DESC
        LIMIT 5
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Top 5 agents by count of properties they sourced.
async fn fetch_top_agentes(pool: &PgPool) -> Result<Vec<AgentCount>, AppError> {
    let rows = sqlx::query_as::<_, AgentCount>(
        r#"
        SELECT a.nombre, a.email, COUNT(p.id) AS propiedades_captadas
        FROM agentes a
        JOIN propiedades p ON p.captado_por_agente_id = a.id AND p.deleted_at IS NULL
        GROUP BY a.id, a.nombre, a.email
        ORDER BY propiedades_captadas DESC
        LIMIT 5
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Sale and rental price summary in a single conditional-aggregation query.
async fn fetch_precios(pool: &PgPool) -> Result<PriceSummary, AppError> {
    let row = sqlx::query_as::<_, PriceSummary>(
        r#"
        SELECT
            ROUND(AVG(precio)::numeric, 2)::float8          AS precio_promedio_venta,
            MIN(precio)::float8                             AS precio_min_venta,
            MAX(precio)::float8                             AS precio_max_venta,
            ROUND(AVG(precio_alquiler)::numeric, 2)::float8 AS precio_promedio_alquiler,
            MIN(precio_alquiler)::float8                    AS precio_min_alquiler,
            MAX(precio_alquiler)::float8                    AS precio_max_alquiler
        FROM propiedades
        WHERE deleted_at IS NULL
        "#,
    )
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Count properties created within the trailing 7 days.
async fn fetch_nuevas_semana(pool: &PgPool) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM propiedades
        WHERE deleted_at IS NULL AND created_at >= NOW() - INTERVAL '7 days'
        "#,
    )
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// Split distinct properties into with-images vs. without.
async fn fetch_image_coverage(pool: &PgPool) -> Result<ImageCoverage, AppError> {
    let row = sqlx::query_as::<_, ImageCoverage>(
        r#"
        SELECT
            COUNT(DISTINCT p.id) FILTER (WHERE pi.id IS NOT NULL) AS con_imagenes,
            COUNT(DISTINCT p.id) FILTER (WHERE pi.id IS NULL)     AS sin_imagenes
        FROM propiedades p
        LEFT JOIN propiedad_imagenes pi ON pi.propiedad_id = p.id
        WHERE p.deleted_at IS NULL
        "#,
    )
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// The 10 most recently touched non-deleted properties.
pub async fn recent_activity(pool: &PgPool) -> Result<Vec<RecentActivity>, AppError> {
    let rows = sqlx::query_as::<_, RecentActivity>(
        r#"
        SELECT p.id, p.titulo, p.created_at, p.updated_at,
               a.nombre AS captado_por, ep.nombre AS estado
        FROM propiedades p
        LEFT JOIN agentes a ON p.captado_por_agente_id = a.id
        LEFT JOIN estados_publicacion ep ON p.estado_publicacion_id = ep.id
        WHERE p.deleted_at IS NULL
        ORDER BY COALESCE(p.updated_at, p.created_at) DESC NULLS LAST
        LIMIT 10
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_database_stats_serialize_to_expected_shape() {
        let stats = DashboardStats {
            total_propiedades: 0,
            propiedades_publicadas: 0,
            total_visitas: 0,
            propiedad_mas_visitada: None,
            por_tipo_negocio: vec![],
            por_tipo_propiedad: vec![],
            por_estado_publicacion: vec![],
            top_ciudades: vec![],
            top_agentes: vec![],
            precios: PriceSummary {
                precio_promedio_venta: None,
                precio_min_venta: None,
                precio_max_venta: None,
                precio_promedio_alquiler: None,
                precio_min_alquiler: None,
                precio_max_alquiler: None,
            },
            propiedades_nuevas_semana: 0,
            imagenes: ImageCoverage {
                con_imagenes: 0,
                sin_imagenes: 0,
            },
        };

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["total_propiedades"], 0);
        assert_eq!(json["total_visitas"], 0);
        assert!(json["propiedad_mas_visitada"].is_null());
        assert!(json["precios"]["precio_promedio_venta"].is_null());
        assert_eq!(json["imagenes"]["sin_imagenes"], 0);
    }

    #[test]
    fn most_visited_serializes_with_nullable_direccion() {
        let row = MostVisitedProperty {
            id: 3,
            titulo: "Casa con vista".to_string(),
            visitas: 42,
            direccion: None,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["visitas"], 42);
        assert!(json["direccion"].is_null());
    }
}
