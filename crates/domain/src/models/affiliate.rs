//! Affiliate domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use super::pagination::Pagination;

/// Lifecycle status of an affiliate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AffiliateStatus {
    Pending,
    Active,
    Suspended,
}

impl FromStr for AffiliateStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(AffiliateStatus::Pending),
            "active" => Ok(AffiliateStatus::Active),
            "suspended" => Ok(AffiliateStatus::Suspended),
            _ => Err(format!("Unknown affiliate status: {}", s)),
        }
    }
}

impl std::fmt::Display for AffiliateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AffiliateStatus::Pending => write!(f, "pending"),
            AffiliateStatus::Active => write!(f, "active"),
            AffiliateStatus::Suspended => write!(f, "suspended"),
        }
    }
}

/// Affiliate domain model: an affiliate-role user with a referral code and
/// an assigned commission tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Affiliate {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub referral_code: String,
    pub commission_tier_id: Uuid,
    pub status: AffiliateStatus,
    pub total_earnings_cents: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Affiliate view enriched with user and tier names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AffiliateResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub email: String,
    pub display_name: String,
    pub referral_code: String,
    pub commission_tier_id: Uuid,
    pub commission_tier_name: String,
    pub status: AffiliateStatus,
    pub total_earnings_cents: i64,
    pub created_at: DateTime<Utc>,
}

/// Response for affiliate list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ListAffiliatesResponse {
    pub data: Vec<AffiliateResponse>,
    pub pagination: Pagination,
}

/// Query parameters for listing affiliates.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct ListAffiliatesQuery {
    pub page: Option<i32>,
    pub per_page: Option<i32>,
    pub status: Option<AffiliateStatus>,
}

/// Request to reassign an affiliate's commission tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UpdateAffiliateTierRequest {
    pub commission_tier_id: Uuid,
}

/// Request to change an affiliate's status (suspend/reactivate).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UpdateAffiliateStatusRequest {
    pub status: AffiliateStatus,
}
