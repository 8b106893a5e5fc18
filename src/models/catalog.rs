//! Catalog (lookup) table models.

use serde::Serialize;
use sqlx::FromRow;

/// One `(id, nombre)` row of a lookup table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CatalogEntry {
    pub id: i64,
    pub nombre: String,
}

/// The closed set of catalog tables exposed by `/api/catalogos`.
///
/// Table names reach SQL only through [`CatalogTable::table_name`], never
/// from caller input, so there is no injection surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogTable {
    Agentes,
    AgentesExternos,
    Ciudades,
    Estados,
    EstadosFisicos,
    EstadosPublicacion,
    FrecuenciasAlquiler,
    Monedas,
    TiposNegocio,
    TiposPropiedad,
    Zonas,
}

impl CatalogTable {
    /// All catalog tables, in the order they appear in the response.
    pub const ALL: [CatalogTable; 11] = [
        CatalogTable::Agentes,
        CatalogTable::AgentesExternos,
        CatalogTable::Ciudades,
        CatalogTable::Estados,
        CatalogTable::EstadosFisicos,
        CatalogTable::EstadosPublicacion,
        CatalogTable::FrecuenciasAlquiler,
        CatalogTable::Monedas,
        CatalogTable::TiposNegocio,
        CatalogTable::TiposPropiedad,
        CatalogTable::Zonas,
    ];

    /// SQL identifier of the table.
    pub fn table_name(&self) -> &'static str {
        match self {
            CatalogTable::Agentes => "agentes",
            CatalogTable::AgentesExternos => "agentes_externos",
            CatalogTable::Ciudades => "ciudades",
            CatalogTable::Estados => "estados",
            CatalogTable::EstadosFisicos => "estados_fisicos",
            CatalogTable::EstadosPublicacion => "estados_publicacion",
            CatalogTable::FrecuenciasAlquiler => "frecuencias_alquiler",
            CatalogTable::Monedas => "monedas",
            CatalogTable::TiposNegocio => "tipos_negocio",
            CatalogTable::TiposPropiedad => "tipos_propiedad",
            CatalogTable::Zonas => "zonas",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_names_are_unique() {
        let mut names: Vec<&str> = CatalogTable::ALL.iter().map(|t| t.table_name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), CatalogTable::ALL.len());
    }

    #[test]
    fn table_names_are_plain_identifiers() {
        for table in CatalogTable::ALL {
            assert!(table
                .table_name()
                .chars()
                .all(|c| c.is_ascii_lowercase() || c == '_'));
        }
    }
}
