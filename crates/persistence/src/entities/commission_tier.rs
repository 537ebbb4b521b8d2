//! Commission tier entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::commission_tier::CommissionTier;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the commission_tiers table.
#[derive(Debug, Clone, FromRow)]
pub struct CommissionTierEntity {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub commission_rate: f64,
    pub created_at: DateTime<Utc>,
}

impl From<CommissionTierEntity> for CommissionTier {
    fn from(entity: CommissionTierEntity) -> Self {
        Self {
            id: entity.id,
            tenant_id: entity.tenant_id,
            name: entity.name,
            commission_rate: entity.commission_rate,
            created_at: entity.created_at,
        }
    }
}
