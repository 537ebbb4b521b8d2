//! Affiliate invitation domain models.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Status of an invitation. An invite is `pending` until exactly one accept
/// succeeds, after which it is `accepted` forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InviteStatus {
    Pending,
    Accepted,
}

impl FromStr for InviteStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(InviteStatus::Pending),
            "accepted" => Ok(InviteStatus::Accepted),
            _ => Err(format!("Unknown invite status: {}", s)),
        }
    }
}

impl std::fmt::Display for InviteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InviteStatus::Pending => write!(f, "pending"),
            InviteStatus::Accepted => write!(f, "accepted"),
        }
    }
}

/// Invite domain model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Invite {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub email: String,
    pub product_id: Uuid,
    pub invited_by: Uuid,
    pub status: InviteStatus,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
}

/// Default invite lifetime.
pub const INVITE_EXPIRY_DAYS: i64 = 7;

/// Computes the expiration timestamp for a new invite.
pub fn default_invite_expiration() -> DateTime<Utc> {
    Utc::now() + Duration::days(INVITE_EXPIRY_DAYS)
}

/// Request to invite an affiliate.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateInviteRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub product_id: Uuid,
}

/// Response for invite creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CreateInviteResponse {
    pub id: Uuid,
    pub email: String,
    pub product_id: Uuid,
    pub status: InviteStatus,
    pub invite_url: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Response for accepting an invite.
///
/// `is_existing_user` is true on idempotent replays (the invite was already
/// accepted); in that case only `email` is meaningful and no tokens are
/// issued.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AcceptInviteResponse {
    pub email: String,
    pub is_existing_user: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliate_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referral_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_link_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<OnboardingTokens>,
}

/// Token pair issued to a freshly onboarded affiliate so they can set a
/// password without one ever travelling in a response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OnboardingTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Query parameters for listing invites.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct ListInvitesQuery {
    pub status: Option<InviteStatus>,
    pub page: Option<i32>,
    pub per_page: Option<i32>,
}
