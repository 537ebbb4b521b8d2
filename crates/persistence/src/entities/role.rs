//! Role entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::role::Role;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the roles table.
#[derive(Debug, Clone, FromRow)]
pub struct RoleEntity {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub permissions: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<RoleEntity> for Role {
    fn from(entity: RoleEntity) -> Self {
        Self {
            id: entity.id,
            tenant_id: entity.tenant_id,
            name: entity.name,
            permissions: entity.permissions,
            created_at: entity.created_at,
        }
    }
}
