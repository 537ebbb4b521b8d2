//! Sale and commission distribution entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::sale::{CommissionDistribution, Sale};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the sales table.
#[derive(Debug, Clone, FromRow)]
pub struct SaleEntity {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub product_id: Uuid,
    pub affiliate_id: Uuid,
    pub tracking_link_id: Option<Uuid>,
    pub amount_cents: i64,
    pub commission_rate: f64,
    pub commission_cents: i64,
    pub occurred_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<SaleEntity> for Sale {
    fn from(entity: SaleEntity) -> Self {
        Self {
            id: entity.id,
            tenant_id: entity.tenant_id,
            product_id: entity.product_id,
            affiliate_id: entity.affiliate_id,
            tracking_link_id: entity.tracking_link_id,
            amount_cents: entity.amount_cents,
            commission_rate: entity.commission_rate,
            commission_cents: entity.commission_cents,
            occurred_at: entity.occurred_at,
            created_at: entity.created_at,
        }
    }
}

/// Database row mapping for the commission_distributions table.
#[derive(Debug, Clone, FromRow)]
pub struct CommissionDistributionEntity {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub sale_id: Uuid,
    pub affiliate_id: Uuid,
    pub amount_cents: i64,
    pub payout_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<CommissionDistributionEntity> for CommissionDistribution {
    fn from(entity: CommissionDistributionEntity) -> Self {
        Self {
            id: entity.id,
            tenant_id: entity.tenant_id,
            sale_id: entity.sale_id,
            affiliate_id: entity.affiliate_id,
            amount_cents: entity.amount_cents,
            payout_id: entity.payout_id,
            created_at: entity.created_at,
        }
    }
}
