//! Tracking link domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Affiliate-owned promotional link with UTM parameters and counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TrackingLink {
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

impl TrackingLink {
    /// Whether the link still accepts clicks.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at > now,
            None => true,
        }
    }
}

/// Request to create a tracking link.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateTrackingLinkRequest {
    pub product_id: Uuid,
    #[validate(url(message = "Invalid destination URL"))]
    pub destination_url: String,
    #[validate(length(max = 100, message = "utm_source must be at most 100 characters"))]
    pub utm_source: Option<String>,
    #[validate(length(max = 100, message = "utm_medium must be at most 100 characters"))]
    pub utm_medium: Option<String>,
    #[validate(length(max = 100, message = "utm_campaign must be at most 100 characters"))]
    pub utm_campaign: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Response for tracking link list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ListTrackingLinksResponse {
    pub data: Vec<TrackingLink>,
}

/// Builds the public promotional URL for a link code.
pub fn tracking_link_url(base_url: &str, code: &str) -> String {
    format!("{}/t/{}", base_url.trim_end_matches('/'), code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use validator::Validate;

    #[test]
    fn test_tracking_link_url() {
        assert_eq!(
            tracking_link_url("https://app.example.com", "abc123"),
            "https://app.example.com/t/abc123"
        );
        assert_eq!(
            tracking_link_url("https://app.example.com/", "abc123"),
            "https://app.example.com/t/abc123"
        );
    }

    #[test]
    fn test_is_live() {
        let mut link = TrackingLink {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            affiliate_id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            code: "abc".to_string(),
            destination_url: "https://example.com".to_string(),
            utm_source: None,
            utm_medium: None,
            utm_campaign: None,
            click_count: 0,
            conversion_count: 0,
            expires_at: None,
            created_at: Utc::now(),
        };
        let now = Utc::now();
        assert!(link.is_live(now));

        link.expires_at = Some(now - Duration::hours(1));
        assert!(!link.is_live(now));

        link.expires_at = Some(now + Duration::hours(1));
        assert!(link.is_live(now));
    }

    #[test]
    fn test_create_request_rejects_bad_url() {
        let request = CreateTrackingLinkRequest {
            product_id: Uuid::new_v4(),
            destination_url: "not a url".to_string(),
            utm_source: None,
            utm_medium: None,
            utm_campaign: None,
            expires_at: None,
        };
        assert!(request.validate().is_err());
    }
}
