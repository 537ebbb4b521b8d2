//! Tenant repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::entities::{TenantEntity, TenantPlanDb};
use crate::metrics::QueryTimer;

/// Repository for tenant-related database operations.
#[derive(Clone)]
pub struct TenantRepository {
    pool: PgPool,
}

impl TenantRepository {
    /// Creates a new TenantRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a tenant inside an existing transaction (signup flow).
    pub async fn create_tenant_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
        slug: &str,
        plan: TenantPlanDb,
        trial_ends_at: Option<DateTime<Utc>>,
    ) -> Result<TenantEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_tenant");
        let result = sqlx::query_as::<_, TenantEntity>(
            r#"
            INSERT INTO tenants (name, slug, plan, trial_ends_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, slug, plan, trial_ends_at, is_active, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(slug)
        .bind(plan)
        .bind(trial_ends_at)
        .fetch_one(&mut **tx)
        .await;
        timer.record();
        result
    }

    /// Find tenant by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<TenantEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_tenant_by_id");
        let result = sqlx::query_as::<_, TenantEntity>(
            r#"
            SELECT id, name, slug, plan, trial_ends_at, is_active, created_at, updated_at
            FROM tenants
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Check if a slug is already taken.
    pub async fn slug_exists(&self, slug: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("check_tenant_slug_exists");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM tenants WHERE slug = $1)
            "#,
        )
        .bind(slug)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update tenant name and/or plan. Unset fields are left unchanged.
    pub async fn update_tenant(
        &self,
        id: Uuid,
        name: Option<&str>,
        plan: Option<TenantPlanDb>,
    ) -> Result<Option<TenantEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_tenant");
        let result = sqlx::query_as::<_, TenantEntity>(
            r#"
            UPDATE tenants
            SET name = COALESCE($2, name),
                plan = COALESCE($3, plan),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, slug, plan, trial_ends_at, is_active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(plan)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count affiliates for a tenant (plan limit checks).
    pub async fn count_affiliates(&self, tenant_id: Uuid) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_tenant_affiliates");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM affiliates WHERE tenant_id = $1
            "#,
        )
        .bind(tenant_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count users for a tenant (plan limit checks).
    pub async fn count_users(&self, tenant_id: Uuid) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_tenant_users");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM users WHERE tenant_id = $1
            "#,
        )
        .bind(tenant_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count commission tiers for a tenant (plan limit checks).
    pub async fn count_commission_tiers(&self, tenant_id: Uuid) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_tenant_commission_tiers");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM commission_tiers WHERE tenant_id = $1
            "#,
        )
        .bind(tenant_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count products for a tenant (plan limit checks).
    pub async fn count_products(&self, tenant_id: Uuid) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_tenant_products");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM products WHERE tenant_id = $1
            "#,
        )
        .bind(tenant_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    // Note: TenantRepository tests require database connection and are covered by integration tests
}
