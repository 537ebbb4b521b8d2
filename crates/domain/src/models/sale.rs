//! Sale and commission distribution domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use shared::validation::validate_amount_cents;

use super::pagination::Pagination;

/// A recorded sale attributed to an affiliate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Sale {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub product_id: Uuid,
    pub affiliate_id: Uuid,
    pub tracking_link_id: Option<Uuid>,
    pub amount_cents: i64,
    /// Commission rate applied at recording time (snapshot).
    pub commission_rate: f64,
    pub commission_cents: i64,
    pub occurred_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Ledger row tying a sale's commission to a payout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CommissionDistribution {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub sale_id: Uuid,
    pub affiliate_id: Uuid,
    pub amount_cents: i64,
    pub payout_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Request to record a sale.
///
/// Attribution is by tracking link code when present, otherwise by referral
/// code.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct RecordSaleRequest {
    pub product_id: Uuid,
    #[validate(length(min = 1, message = "Tracking code is required"))]
    pub tracking_code: Option<String>,
    #[validate(length(min = 1, message = "Referral code is required"))]
    pub referral_code: Option<String>,
    #[validate(custom(function = "validate_amount_cents"))]
    pub amount_cents: i64,
    pub occurred_at: Option<DateTime<Utc>>,
}

/// Response for a recorded sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SaleResponse {
    #[serde(flatten)]
    pub sale: Sale,
}

/// Response for sale list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ListSalesResponse {
    pub data: Vec<Sale>,
    pub pagination: Pagination,
}

/// Query parameters for listing sales.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct ListSalesQuery {
    pub page: Option<i32>,
    pub per_page: Option<i32>,
    pub affiliate_id: Option<Uuid>,
}
