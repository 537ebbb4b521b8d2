//! Tenant entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::tenant::{Plan, Tenant};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum that maps to the PostgreSQL `tenant_plan` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "tenant_plan", rename_all = "lowercase")]
pub enum TenantPlanDb {
    Trial,
    Starter,
    Pro,
    Enterprise,
}

impl From<TenantPlanDb> for Plan {
    fn from(plan: TenantPlanDb) -> Self {
        match plan {
            TenantPlanDb::Trial => Plan::Trial,
            TenantPlanDb::Starter => Plan::Starter,
            TenantPlanDb::Pro => Plan::Pro,
            TenantPlanDb::Enterprise => Plan::Enterprise,
        }
    }
}

impl From<Plan> for TenantPlanDb {
    fn from(plan: Plan) -> Self {
        match plan {
            Plan::Trial => TenantPlanDb::Trial,
            Plan::Starter => TenantPlanDb::Starter,
            Plan::Pro => TenantPlanDb::Pro,
            Plan::Enterprise => TenantPlanDb::Enterprise,
        }
    }
}

/// Database row mapping for the tenants table.
#[derive(Debug, Clone, FromRow)]
pub struct TenantEntity {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub plan: TenantPlanDb,
    pub trial_ends_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TenantEntity> for Tenant {
    fn from(entity: TenantEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            slug: entity.slug,
            plan: entity.plan.into(),
            trial_ends_at: entity.trial_ends_at,
            is_active: entity.is_active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_db_conversion_roundtrip() {
        for plan in [Plan::Trial, Plan::Starter, Plan::Pro, Plan::Enterprise] {
            let db: TenantPlanDb = plan.into();
            let back: Plan = db.into();
            assert_eq!(back, plan);
        }
    }
}
