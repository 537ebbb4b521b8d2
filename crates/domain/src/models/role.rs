//! Named permission sets per tenant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Wildcard permission granting everything.
pub const WILDCARD_PERMISSION: &str = "*";

/// Tenant-scoped named permission set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Role {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub permissions: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Role {
    /// Checks whether this role grants the given permission.
    ///
    /// The wildcard `*` grants everything.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions
            .iter()
            .any(|p| p == WILDCARD_PERMISSION || p == permission)
    }
}

/// Request to create a custom role.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateRoleRequest {
    #[validate(length(min = 2, max = 50, message = "Name must be 2-50 characters"))]
    pub name: String,
    #[validate(length(min = 1, message = "At least one permission is required"))]
    pub permissions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(permissions: &[&str]) -> Role {
        Role {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            name: "custom".to_string(),
            permissions: permissions.iter().map(|s| s.to_string()).collect(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_wildcard_grants_everything() {
        let admin = role(&["*"]);
        assert!(admin.has_permission("products:write"));
        assert!(admin.has_permission("anything"));
    }

    #[test]
    fn test_explicit_permission() {
        let r = role(&["products:read", "affiliates:read"]);
        assert!(r.has_permission("products:read"));
        assert!(!r.has_permission("products:write"));
    }

    #[test]
    fn test_create_role_request_validation() {
        use validator::Validate;

        let valid = CreateRoleRequest {
            name: "managers".to_string(),
            permissions: vec!["products:read".to_string()],
        };
        assert!(valid.validate().is_ok());

        let no_permissions = CreateRoleRequest {
            name: "managers".to_string(),
            permissions: vec![],
        };
        assert!(no_permissions.validate().is_err());
    }
}
