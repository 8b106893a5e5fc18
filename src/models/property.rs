//! Property and property-image models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Image sub-record embedded in a property's `imagenes` array.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PropertyImage {
    pub id: i64,
    pub url: String,
    pub nombre_archivo: String,
    pub es_principal: bool,
    pub orden: i32,
}

/// Full property record as returned by the list and single-fetch endpoints.
///
/// `imagenes` is aggregated in SQL: `None` when the property has no images,
/// otherwise a list sorted ascending by `orden`.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Property {
    pub id: i64,
    pub titulo: String,
    pub descripcion: Option<String>,
    pub precio: Option<f64>,
    pub precio_alquiler: Option<f64>,
    pub valor_administracion: Option<f64>,
    pub habitaciones: Option<i32>,
    pub alcobas: Option<i32>,
    pub banos: Option<i32>,
    pub banos_medios: Option<i32>,
    pub estacionamientos: Option<i32>,
    pub anio_construccion: Option<i32>,
    pub piso: Option<String>,
    pub m2_terreno: Option<f64>,
    pub m2_construccion: Option<f64>,
    pub m2_privada: Option<f64>,
    pub direccion: Option<String>,
    pub codigo_postal: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub visitas: Option<i32>,
    pub registro_publico: Option<String>,
    pub convenio_url: Option<String>,
    pub convenio_validado: Option<bool>,
    pub fecha_validacion: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub tipo_negocio_id: Option<i64>,
    pub tipo_propiedad_id: Option<i64>,
    pub estado_publicacion_id: Option<i64>,
    pub captado_por_agente_id: Option<i64>,
    pub moneda_id: Option<i64>,
    pub frecuencia_alquiler_id: Option<i64>,
    pub estado_fisico_id: Option<i64>,
    pub estado_id: Option<i64>,
    pub ciudad_id: Option<i64>,
    pub zona_id: Option<i64>,
    pub agente_id: Option<i64>,
    pub agente_externo_id: Option<i64>,
    pub validado_por_usuario_id: Option<Uuid>,
    pub imagenes: Option<Json<Vec<PropertyImage>>>,
}

/// Flat write payload accepted by the create and update endpoints.
///
/// Update has no sparse semantics: the caller resupplies the full field set
/// and absent fields are written as NULL. Create additionally defaults the
/// room/bath/area counters to 0 (see the service layer).
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PropertyInput {
    pub titulo: Option<String>,
    pub descripcion: Option<String>,
    pub precio: Option<f64>,
    pub precio_alquiler: Option<f64>,
    pub valor_administracion: Option<f64>,
    pub habitaciones: Option<i32>,
    pub alcobas: Option<i32>,
    pub banos: Option<i32>,
    pub banos_medios: Option<i32>,
    pub estacionamientos: Option<i32>,
    pub anio_construccion: Option<i32>,
    pub piso: Option<String>,
    pub m2_terreno: Option<f64>,
    pub m2_construccion: Option<f64>,
    pub m2_privada: Option<f64>,
    pub direccion: Option<String>,
    pub codigo_postal: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub registro_publico: Option<String>,
    pub convenio_url: Option<String>,
    pub convenio_validado: Option<bool>,
    pub tipo_negocio_id: Option<i64>,
    pub tipo_propiedad_id: Option<i64>,
    pub estado_publicacion_id: Option<i64>,
    pub captado_por_agente_id: Option<i64>,
    pub moneda_id: Option<i64>,
    pub frecuencia_alquiler_id: Option<i64>,
    pub estado_fisico_id: Option<i64>,
    pub estado_id: Option<i64>,
    pub ciudad_id: Option<i64>,
    pub zona_id: Option<i64>,
    pub agente_id: Option<i64>,
    pub agente_externo_id: Option<i64>,
    pub validado_por_usuario_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_serializes_null_imagenes() {
        let property = Property {
            id: 1,
            titulo: "Casa A".to_string(),
            descripcion: None,
            precio: Some(100000.0),
            precio_alquiler: None,
            valor_administracion: None,
            habitaciones: Some(0),
            alcobas: Some(0),
            banos: Some(0),
            banos_medios: Some(0),
            estacionamientos: Some(0),
            anio_construccion: None,
            piso: None,
            m2_terreno: Some(0.0),
            m2_construccion: Some(0.0),
            m2_privada: Some(0.0),
            direccion: None,
            codigo_postal: None,
            lat: None,
            lng: None,
            visitas: Some(0),
            registro_publico: None,
            convenio_url: None,
            convenio_validado: Some(false),
            fecha_validacion: None,
            created_at: Some(Utc::now()),
            updated_at: None,
            deleted_at: None,
            tipo_negocio_id: None,
            tipo_propiedad_id: None,
            estado_publicacion_id: None,
            captado_por_agente_id: None,
            moneda_id: None,
            frecuencia_alquiler_id: None,
            estado_fisico_id: None,
            estado_id: None,
            ciudad_id: None,
            zona_id: None,
            agente_id: None,
            agente_externo_id: None,
            validado_por_usuario_id: None,
            imagenes: None,
        };

        let json = serde_json::to_value(&property).unwrap();
        assert!(json["imagenes"].is_null());
        assert_eq!(json["habitaciones"], 0);
        assert!(json["descripcion"].is_null());
    }

    #[test]
    fn property_serializes_ordered_imagenes() {
        let images = vec![
            PropertyImage {
                id: 10,
                url: "https://cdn.example/a.jpg".to_string(),
                nombre_archivo: "a.jpg".to_string(),
                es_principal: true,
                orden: 0,
            },
            PropertyImage {
                id: 11,
                url: "https://cdn.example/b.jpg".to_string(),
                nombre_archivo: "b.jpg".to_string(),
                es_principal: false,
                orden: 1,
            },
        ];
        let json = serde_json::to_value(Json(images)).unwrap();
        assert_eq!(json[0]["orden"], 0);
        assert_eq!(json[1]["orden"], 1);
        assert_eq!(json[0]["es_principal"], true);
    }

    #[test]
    fn input_accepts_minimal_payload() {
        let input: PropertyInput =
            serde_json::from_str(r#"{"titulo": "Casa A", "precio": 100000}"#).unwrap();
        assert_eq!(input.titulo.as_deref(), Some("Casa A"));
        assert_eq!(input.precio, Some(100000.0));
        assert!(input.habitaciones.is_none());
        assert!(input.descripcion.is_none());
    }
}
