//! Role overlay on top of externally managed identities.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Coarse application role layered over a provider identity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Agent,
    User,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Agent => "agent",
            UserRole::User => "user",
        }
    }

    /// Parse a role string; `None` for anything outside the fixed set.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(UserRole::Admin),
            "agent" => Some(UserRole::Agent),
            "user" => Some(UserRole::User),
            _ => None,
        }
    }
}

/// Provider identity merged with its role overlay, as listed to admins.
#[derive(Debug, Clone, Serialize)]
pub struct AdminUser {
    pub id: Uuid,
    pub email: Option<String>,
    pub role: UserRole,
    pub created_at: Option<String>,
    pub last_sign_in_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trip() {
        for role in [UserRole::Admin, UserRole::Agent, UserRole::User] {
            assert_eq!(UserRole::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn unknown_role_rejected() {
        assert_eq!(UserRole::parse("superadmin"), None);
        assert_eq!(UserRole::parse("Admin"), None);
        assert_eq!(UserRole::parse(""), None);
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"admin\"");
        let parsed: UserRole = serde_json::from_str("\"agent\"").unwrap();
        assert_eq!(parsed, UserRole::Agent);
    }
}
