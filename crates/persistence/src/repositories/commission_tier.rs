//! Commission tier repository for database operations.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::entities::CommissionTierEntity;
use crate::metrics::QueryTimer;

/// Repository for commission tier database operations.
#[derive(Clone)]
pub struct CommissionTierRepository {
    pool: PgPool,
}

impl CommissionTierRepository {
    /// Creates a new CommissionTierRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a commission tier.
    pub async fn create_tier(
        &self,
        tenant_id: Uuid,
        name: &str,
        commission_rate: f64,
    ) -> Result<CommissionTierEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_commission_tier");
        let result = sqlx::query_as::<_, CommissionTierEntity>(
            r#"
            INSERT INTO commission_tiers (tenant_id, name, commission_rate)
            VALUES ($1, $2, $3)
            RETURNING id, tenant_id, name, commission_rate, created_at
            "#,
        )
        .bind(tenant_id)
        .bind(name)
        .bind(commission_rate)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create a commission tier inside an existing transaction (tenant bootstrap).
    pub async fn create_tier_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant_id: Uuid,
        name: &str,
        commission_rate: f64,
    ) -> Result<CommissionTierEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_commission_tier");
        let result = sqlx::query_as::<_, CommissionTierEntity>(
            r#"
            INSERT INTO commission_tiers (tenant_id, name, commission_rate)
            VALUES ($1, $2, $3)
            RETURNING id, tenant_id, name, commission_rate, created_at
            "#,
        )
        .bind(tenant_id)
        .bind(name)
        .bind(commission_rate)
        .fetch_one(&mut **tx)
        .await;
        timer.record();
        result
    }

    /// Find a tier by ID within a tenant.
    pub async fn find_by_id(
        &self,
        id: Uuid,
        tenant_id: Uuid,
    ) -> Result<Option<CommissionTierEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_commission_tier_by_id");
        let result = sqlx::query_as::<_, CommissionTierEntity>(
            r#"
            SELECT id, tenant_id, name, commission_rate, created_at
            FROM commission_tiers
            WHERE id = $1 AND tenant_id = $2
            "#,
        )
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a tier by name within a tenant.
    pub async fn find_by_name(
        &self,
        tenant_id: Uuid,
        name: &str,
    ) -> Result<Option<CommissionTierEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_commission_tier_by_name");
        let result = sqlx::query_as::<_, CommissionTierEntity>(
            r#"
            SELECT id, tenant_id, name, commission_rate, created_at
            FROM commission_tiers
            WHERE tenant_id = $1 AND name = $2
            "#,
        )
        .bind(tenant_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List tiers for a tenant, lowest rate first.
    pub async fn list_by_tenant(
        &self,
        tenant_id: Uuid,
    ) -> Result<Vec<CommissionTierEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_commission_tiers");
        let result = sqlx::query_as::<_, CommissionTierEntity>(
            r#"
            SELECT id, tenant_id, name, commission_rate, created_at
            FROM commission_tiers
            WHERE tenant_id = $1
            ORDER BY commission_rate ASC
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a tier's name and/or rate. Unset fields are left unchanged.
    pub async fn update_tier(
        &self,
        id: Uuid,
        tenant_id: Uuid,
        name: Option<&str>,
        commission_rate: Option<f64>,
    ) -> Result<Option<CommissionTierEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_commission_tier");
        let result = sqlx::query_as::<_, CommissionTierEntity>(
            r#"
            UPDATE commission_tiers
            SET name = COALESCE($3, name),
                commission_rate = COALESCE($4, commission_rate)
            WHERE id = $1 AND tenant_id = $2
            RETURNING id, tenant_id, name, commission_rate, created_at
            "#,
        )
        .bind(id)
        .bind(tenant_id)
        .bind(name)
        .bind(commission_rate)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a tier. Fails with a foreign key violation if affiliates
    /// still reference it.
    pub async fn delete_tier(&self, id: Uuid, tenant_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_commission_tier");
        let result = sqlx::query(
            r#"
            DELETE FROM commission_tiers
            WHERE id = $1 AND tenant_id = $2
            "#,
        )
        .bind(id)
        .bind(tenant_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    // Note: CommissionTierRepository tests require database connection and are covered by integration tests
}
