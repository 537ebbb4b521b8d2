//! Commission tier domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use shared::validation::validate_commission_rate;

/// Tier assigned to newly onboarded affiliates.
pub const DEFAULT_TIER_NAME: &str = "Bronze";

/// Tenant-scoped named commission rate bracket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CommissionTier {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    /// Commission rate as a percentage (0-100).
    pub commission_rate: f64,
    pub created_at: DateTime<Utc>,
}

/// Request to create a commission tier.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateCommissionTierRequest {
    #[validate(length(min = 2, max = 50, message = "Name must be 2-50 characters"))]
    pub name: String,
    #[validate(custom(function = "validate_commission_rate"))]
    pub commission_rate: f64,
}

/// Request to update a commission tier.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateCommissionTierRequest {
    #[validate(length(min = 2, max = 50, message = "Name must be 2-50 characters"))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_commission_rate"))]
    pub commission_rate: Option<f64>,
}

/// Response for commission tier list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ListCommissionTiersResponse {
    pub data: Vec<CommissionTier>,
}
