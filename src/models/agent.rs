//! Agent model and write payload.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Agent row. Referenced from properties as the listing agent
/// (`agente_id`) and as the sourcing agent (`captado_por_agente_id`).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Agent {
    pub id: i64,
    pub nombre: String,
    pub email: String,
    pub telefono: Option<String>,
}

/// Payload for agent create and update.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AgentInput {
    #[validate(length(min = 1, message = "nombre is required"))]
    pub nombre: String,
    #[validate(email(message = "email is not valid"))]
    pub email: String,
    pub telefono: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_agent_input() {
        let input = AgentInput {
            nombre: "Laura Gómez".to_string(),
            email: "laura@example.com".to_string(),
            telefono: Some("555-0101".to_string()),
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn rejects_empty_nombre() {
        let input = AgentInput {
            nombre: String::new(),
            email: "laura@example.com".to_string(),
            telefono: None,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn rejects_malformed_email() {
        let input = AgentInput {
            nombre: "Laura".to_string(),
            email: "not-an-email".to_string(),
            telefono: None,
        };
        assert!(input.validate().is_err());
    }
}
