//! Tenant domain models and plan-based feature gating.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Subscription plans available to tenants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Trial,
    Starter,
    Pro,
    Enterprise,
}

/// Countable resources a plan puts a ceiling on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanLimit {
    MaxAffiliates,
    MaxUsers,
    MaxCommissionTiers,
    MaxProducts,
}

impl Plan {
    /// Maximum count for the given resource, or `None` for unlimited.
    pub fn limit(&self, limit: PlanLimit) -> Option<i64> {
        let (affiliates, users, tiers, products) = match self {
            Plan::Trial => (10, 3, 2, 5),
            Plan::Starter => (50, 10, 5, 25),
            Plan::Pro => (500, 50, 20, 250),
            Plan::Enterprise => return None,
        };

        Some(match limit {
            PlanLimit::MaxAffiliates => affiliates,
            PlanLimit::MaxUsers => users,
            PlanLimit::MaxCommissionTiers => tiers,
            PlanLimit::MaxProducts => products,
        })
    }

    /// Whether invoicing is included in this plan.
    pub fn invoicing_available(&self) -> bool {
        matches!(self, Plan::Pro | Plan::Enterprise)
    }

    /// Returns true when `current_count` has used up the plan's allowance
    /// for the given resource.
    pub fn has_reached_limit(&self, limit: PlanLimit, current_count: i64) -> bool {
        match self.limit(limit) {
            Some(max) => current_count >= max,
            None => false,
        }
    }

    /// Trial length granted at signup.
    pub fn trial_days() -> i64 {
        14
    }
}

impl FromStr for Plan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trial" => Ok(Plan::Trial),
            "starter" => Ok(Plan::Starter),
            "pro" => Ok(Plan::Pro),
            "enterprise" => Ok(Plan::Enterprise),
            _ => Err(format!("Unknown plan: {}", s)),
        }
    }
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Plan::Trial => write!(f, "trial"),
            Plan::Starter => write!(f, "starter"),
            Plan::Pro => write!(f, "pro"),
            Plan::Enterprise => write!(f, "enterprise"),
        }
    }
}

/// Tenant domain model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub plan: Plan,
    pub trial_ends_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to update the authenticated tenant.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateTenantRequest {
    #[validate(length(min = 2, max = 255, message = "Name must be 2-255 characters"))]
    pub name: Option<String>,
    pub plan: Option<Plan>,
}

/// Tenant usage versus plan limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TenantUsageResponse {
    pub tenant_id: Uuid,
    pub plan: Plan,
    pub affiliates: UsageMetric,
    pub users: UsageMetric,
    pub commission_tiers: UsageMetric,
    pub products: UsageMetric,
    pub invoicing_available: bool,
}

/// Usage metric with current count and plan maximum (`max = None` means
/// unlimited).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UsageMetric {
    pub current: i64,
    pub max: Option<i64>,
}

impl UsageMetric {
    pub fn new(plan: Plan, limit: PlanLimit, current: i64) -> Self {
        Self {
            current,
            max: plan.limit(limit),
        }
    }
}

/// Validate slug format: lowercase alphanumeric with hyphens, no
/// leading/trailing hyphens.
pub fn validate_slug(slug: &str) -> Result<(), validator::ValidationError> {
    if SLUG_REGEX.is_match(slug) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("slug_format").with_message(
            std::borrow::Cow::Borrowed(
                "Slug must be lowercase alphanumeric with hyphens, no leading/trailing hyphens",
            ),
        ))
    }
}

lazy_static::lazy_static! {
    pub static ref SLUG_REGEX: regex::Regex = regex::Regex::new(r"^[a-z0-9][a-z0-9-]*[a-z0-9]$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_serialization() {
        assert_eq!(serde_json::to_string(&Plan::Trial).unwrap(), "\"trial\"");
        let plan: Plan = serde_json::from_str("\"enterprise\"").unwrap();
        assert_eq!(plan, Plan::Enterprise);
    }

    #[test]
    fn test_plan_from_str() {
        assert_eq!(Plan::from_str("trial").unwrap(), Plan::Trial);
        assert_eq!(Plan::from_str("PRO").unwrap(), Plan::Pro);
        assert!(Plan::from_str("gold").is_err());
    }

    #[test]
    fn test_trial_limits() {
        assert_eq!(Plan::Trial.limit(PlanLimit::MaxAffiliates), Some(10));
        assert_eq!(Plan::Trial.limit(PlanLimit::MaxUsers), Some(3));
        assert_eq!(Plan::Trial.limit(PlanLimit::MaxCommissionTiers), Some(2));
        assert_eq!(Plan::Trial.limit(PlanLimit::MaxProducts), Some(5));
    }

    #[test]
    fn test_enterprise_is_unlimited() {
        assert_eq!(Plan::Enterprise.limit(PlanLimit::MaxAffiliates), None);
        assert!(!Plan::Enterprise.has_reached_limit(PlanLimit::MaxAffiliates, i64::MAX));
    }

    #[test]
    fn test_has_reached_limit_boundary() {
        // Trial allows 10 affiliates: 10 existing means full, 9 means room left.
        assert!(Plan::Trial.has_reached_limit(PlanLimit::MaxAffiliates, 10));
        assert!(!Plan::Trial.has_reached_limit(PlanLimit::MaxAffiliates, 9));
    }

    #[test]
    fn test_invoicing_availability() {
        assert!(!Plan::Trial.invoicing_available());
        assert!(!Plan::Starter.invoicing_available());
        assert!(Plan::Pro.invoicing_available());
        assert!(Plan::Enterprise.invoicing_available());
    }

    #[test]
    fn test_slug_regex() {
        assert!(SLUG_REGEX.is_match("acme-corp"));
        assert!(SLUG_REGEX.is_match("test123"));
        assert!(!SLUG_REGEX.is_match("Acme-Corp"));
        assert!(!SLUG_REGEX.is_match("-acme"));
        assert!(!SLUG_REGEX.is_match("acme-"));
    }

    #[test]
    fn test_update_tenant_request_validation() {
        use validator::Validate;

        let valid = UpdateTenantRequest {
            name: Some("Acme Corp".to_string()),
            plan: Some(Plan::Pro),
        };
        assert!(valid.validate().is_ok());

        let invalid = UpdateTenantRequest {
            name: Some("A".to_string()),
            plan: None,
        };
        assert!(invalid.validate().is_err());
    }
}
