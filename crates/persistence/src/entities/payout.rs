//! Payout entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::payout::{Payout, PayoutStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum that maps to the PostgreSQL `payout_status` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "payout_status", rename_all = "lowercase")]
pub enum PayoutStatusDb {
    Pending,
    Paid,
}

impl From<PayoutStatusDb> for PayoutStatus {
    fn from(status: PayoutStatusDb) -> Self {
        match status {
            PayoutStatusDb::Pending => PayoutStatus::Pending,
            PayoutStatusDb::Paid => PayoutStatus::Paid,
        }
    }
}

impl From<PayoutStatus> for PayoutStatusDb {
    fn from(status: PayoutStatus) -> Self {
        match status {
            PayoutStatus::Pending => PayoutStatusDb::Pending,
            PayoutStatus::Paid => PayoutStatusDb::Paid,
        }
    }
}

/// Database row mapping for the payouts table.
#[derive(Debug, Clone, FromRow)]
pub struct PayoutEntity {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub affiliate_id: Uuid,
    pub amount_cents: i64,
    pub status: PayoutStatusDb,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<PayoutEntity> for Payout {
    fn from(entity: PayoutEntity) -> Self {
        Self {
            id: entity.id,
            tenant_id: entity.tenant_id,
            affiliate_id: entity.affiliate_id,
            amount_cents: entity.amount_cents,
            status: entity.status.into(),
            paid_at: entity.paid_at,
            created_at: entity.created_at,
        }
    }
}
