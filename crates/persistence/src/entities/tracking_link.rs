//! Tracking link entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::tracking_link::TrackingLink;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the tracking_links table.
#[derive(Debug, Clone, FromRow)]
pub struct TrackingLinkEntity {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub affiliate_id: Uuid,
    pub product_id: Uuid,
    pub code: String,
    pub destination_url: String,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub click_count: i64,
    pub conversion_count: i64,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<TrackingLinkEntity> for TrackingLink {
    fn from(entity: TrackingLinkEntity) -> Self {
        Self {
            id: entity.id,
            tenant_id: entity.tenant_id,
            affiliate_id: entity.affiliate_id,
            product_id: entity.product_id,
            code: entity.code,
            destination_url: entity.destination_url,
            utm_source: entity.utm_source,
            utm_medium: entity.utm_medium,
            utm_campaign: entity.utm_campaign,
            click_count: entity.click_count,
            conversion_count: entity.conversion_count,
            expires_at: entity.expires_at,
            created_at: entity.created_at,
        }
    }
}
