//! Dynamic WHERE-clause composition for the property list endpoint.

use serde::Deserialize;

/// Recognized optional query parameters. Anything else on the query string
/// is ignored. Values arrive as raw strings so a malformed integer drops
/// that one filter instead of failing the request.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PropertyFilters {
    pub tipo_negocio_id: Option<String>,
    #[serde(rename = "estado_publicacion_id__not_in")]
    pub estado_publicacion_id_not_in: Option<String>,
}

/// Composed conjunction plus the positional parameters, in fragment order.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyWhere {
    /// Full `WHERE ...` clause. Always includes the soft-delete guard.
    pub clause: String,
    pub tipo_negocio_id: Option<i64>,
    pub excluded_estados: Option<Vec<i64>>,
}

impl PropertyFilters {
    /// Build the WHERE conjunction: soft-delete guard, then business-type
    /// equality, then publication-status exclusion set.
    pub fn build(&self) -> PropertyWhere {
        let mut fragments = vec!["p.deleted_at IS NULL".to_string()];
        let mut param_index = 0u32;

        let tipo_negocio_id = match self.tipo_negocio_id.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => match raw.parse::<i64>() {
                Ok(id) => Some(id),
                Err(_) => {
                    tracing::warn!(value = raw, "Ignoring malformed tipo_negocio_id filter");
                    None
                }
            },
            _ => None,
        };
        if tipo_negocio_id.is_some() {
            param_index += 1;
            fragments.push(format!("p.tipo_negocio_id = ${param_index}"));
        }

        let excluded_estados = self
            .estado_publicacion_id_not_in
            .as_deref()
            .and_then(parse_id_list);
        if excluded_estados.is_some() {
            param_index += 1;
            fragments.push(format!("p.estado_publicacion_id <> ALL(${param_index})"));
        }

        PropertyWhere {
            clause: format!("WHERE {}", fragments.join(" AND ")),
            tipo_negocio_id,
            excluded_estados,
        }
    }
}

/// Parse a comma-separated integer list. Any malformed element drops the
/// whole list (the caller logs and continues with the remaining filters).
fn parse_id_list(raw: &str) -> Option<Vec<i64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut ids = Vec::new();
    for part in trimmed.split(',') {
        match part.trim().parse::<i64>() {
            Ok(id) => ids.push(id),
            Err(_) => {
                tracing::warn!(
                    value = raw,
                    "Ignoring malformed estado_publicacion_id__not_in filter"
                );
                return None;
            }
        }
    }
    Some(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_filters_keeps_soft_delete_guard() {
        let built = PropertyFilters::default().build();
        assert_eq!(built.clause, "WHERE p.deleted_at IS NULL");
        assert!(built.tipo_negocio_id.is_none());
        assert!(built.excluded_estados.is_none());
    }

    #[test]
    fn equality_filter_binds_first_parameter() {
        let filters = PropertyFilters {
            tipo_negocio_id: Some("2".to_string()),
            estado_publicacion_id_not_in: None,
        };
        let built = filters.build();
        assert_eq!(
            built.clause,
            "WHERE p.deleted_at IS NULL AND p.tipo_negocio_id = $1"
        );
        assert_eq!(built.tipo_negocio_id, Some(2));
    }

    #[test]
    fn both_filters_in_declared_order() {
        let filters = PropertyFilters {
            tipo_negocio_id: Some("2".to_string()),
            estado_publicacion_id_not_in: Some("4,5".to_string()),
        };
        let built = filters.build();
        assert_eq!(
            built.clause,
            "WHERE p.deleted_at IS NULL AND p.tipo_negocio_id = $1 AND p.estado_publicacion_id <> ALL($2)"
        );
        assert_eq!(built.tipo_negocio_id, Some(2));
        assert_eq!(built.excluded_estados, Some(vec![4, 5]));
    }

    #[test]
    fn malformed_exclusion_drops_only_that_filter() {
        let filters = PropertyFilters {
            tipo_negocio_id: Some("2".to_string()),
            estado_publicacion_id_not_in: Some("4,five".to_string()),
        };
        let built = filters.build();
        assert_eq!(
            built.clause,
            "WHERE p.deleted_at IS NULL AND p.tipo_negocio_id = $1"
        );
        assert_eq!(built.tipo_negocio_id, Some(2));
        assert!(built.excluded_estados.is_none());
    }

    #[test]
    fn malformed_equality_drops_only_that_filter() {
        let filters = PropertyFilters {
            tipo_negocio_id: Some("venta".to_string()),
            estado_publicacion_id_not_in: Some("4".to_string()),
        };
        let built = filters.build();
        assert_eq!(
            built.clause,
            "WHERE p.deleted_at IS NULL AND p.estado_publicacion_id <> ALL($1)"
        );
        assert!(built.tipo_negocio_id.is_none());
        assert_eq!(built.excluded_estados, Some(vec![4]));
    }

    #[test]
    fn exclusion_list_tolerates_whitespace() {
        assert_eq!(parse_id_list(" 4 , 5 "), Some(vec![4, 5]));
        assert_eq!(parse_id_list(""), None);
        assert_eq!(parse_id_list("   "), None);
        assert_eq!(parse_id_list("4,,5"), None);
    }
}
