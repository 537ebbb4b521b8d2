//! Affiliate entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::affiliate::{Affiliate, AffiliateResponse, AffiliateStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum that maps to the PostgreSQL `affiliate_status` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "affiliate_status", rename_all = "lowercase")]
pub enum AffiliateStatusDb {
    Pending,
    Active,
    Suspended,
}

impl From<AffiliateStatusDb> for AffiliateStatus {
    fn from(status: AffiliateStatusDb) -> Self {
        match status {
            AffiliateStatusDb::Pending => AffiliateStatus::Pending,
            AffiliateStatusDb::Active => AffiliateStatus::Active,
            AffiliateStatusDb::Suspended => AffiliateStatus::Suspended,
        }
    }
}

impl From<AffiliateStatus> for AffiliateStatusDb {
    fn from(status: AffiliateStatus) -> Self {
        match status {
            AffiliateStatus::Pending => AffiliateStatusDb::Pending,
            AffiliateStatus::Active => AffiliateStatusDb::Active,
            AffiliateStatus::Suspended => AffiliateStatusDb::Suspended,
        }
    }
}

/// Database row mapping for the affiliates table.
#[derive(Debug, Clone, FromRow)]
pub struct AffiliateEntity {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub referral_code: String,
    pub commission_tier_id: Uuid,
    pub status: AffiliateStatusDb,
    pub total_earnings_cents: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AffiliateEntity> for Affiliate {
    fn from(entity: AffiliateEntity) -> Self {
        Self {
            id: entity.id,
            tenant_id: entity.tenant_id,
            user_id: entity.user_id,
            referral_code: entity.referral_code,
            commission_tier_id: entity.commission_tier_id,
            status: entity.status.into(),
            total_earnings_cents: entity.total_earnings_cents,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Affiliate row joined with its user and commission tier.
#[derive(Debug, Clone, FromRow)]
pub struct AffiliateWithUserEntity {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub email: String,
    pub display_name: String,
    pub referral_code: String,
    pub commission_tier_id: Uuid,
    pub commission_tier_name: String,
    pub status: AffiliateStatusDb,
    pub total_earnings_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl From<AffiliateWithUserEntity> for AffiliateResponse {
    fn from(entity: AffiliateWithUserEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            email: entity.email,
            display_name: entity.display_name,
            referral_code: entity.referral_code,
            commission_tier_id: entity.commission_tier_id,
            commission_tier_name: entity.commission_tier_name,
            status: entity.status.into(),
            total_earnings_cents: entity.total_earnings_cents,
            created_at: entity.created_at,
        }
    }
}
