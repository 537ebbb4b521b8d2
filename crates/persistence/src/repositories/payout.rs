//! Payout repository for database operations.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::entities::{PayoutEntity, PayoutStatusDb};
use crate::metrics::QueryTimer;

/// Repository for payout database operations.
#[derive(Clone)]
pub struct PayoutRepository {
    pool: PgPool,
}

impl PayoutRepository {
    /// Creates a new PayoutRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a payout inside the payout transaction.
    pub async fn create_payout_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant_id: Uuid,
        affiliate_id: Uuid,
        amount_cents: i64,
    ) -> Result<PayoutEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_payout");
        let result = sqlx::query_as::<_, PayoutEntity>(
            r#"
            INSERT INTO payouts (tenant_id, affiliate_id, amount_cents)
            VALUES ($1, $2, $3)
            RETURNING id, tenant_id, affiliate_id, amount_cents, status, paid_at, created_at
            "#,
        )
        .bind(tenant_id)
        .bind(affiliate_id)
        .bind(amount_cents)
        .fetch_one(&mut **tx)
        .await;
        timer.record();
        result
    }

    /// Find a payout by ID within a tenant.
    pub async fn find_by_id(
        &self,
        id: Uuid,
        tenant_id: Uuid,
    ) -> Result<Option<PayoutEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_payout_by_id");
        let result = sqlx::query_as::<_, PayoutEntity>(
            r#"
            SELECT id, tenant_id, affiliate_id, amount_cents, status, paid_at, created_at
            FROM payouts
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

    /// List payouts for a tenant with optional filters, newest first.
    pub async fn list_by_tenant(
        &self,
        tenant_id: Uuid,
        affiliate_id: Option<Uuid>,
        status: Option<PayoutStatusDb>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PayoutEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_payouts");
        let result = sqlx::query_as::<_, PayoutEntity>(
            r#"
            SELECT id, tenant_id, affiliate_id, amount_cents, status, paid_at, created_at
            FROM payouts
            WHERE tenant_id = $1
              AND ($2::UUID IS NULL OR affiliate_id = $2)
              AND ($3::payout_status IS NULL OR status = $3)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(tenant_id)
        .bind(affiliate_id)
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count payouts for a tenant matching the list filter.
    pub async fn count_by_tenant(
        &self,
        tenant_id: Uuid,
        affiliate_id: Option<Uuid>,
        status: Option<PayoutStatusDb>,
    ) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_payouts");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM payouts
            WHERE tenant_id = $1
              AND ($2::UUID IS NULL OR affiliate_id = $2)
              AND ($3::payout_status IS NULL OR status = $3)
            "#,
        )
        .bind(tenant_id)
        .bind(affiliate_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Mark a pending payout as paid. Concurrency-safe: only one caller sees
    /// rows_affected == 1.
    pub async fn mark_paid(&self, id: Uuid, tenant_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("mark_payout_paid");
        let result = sqlx::query(
            r#"
            UPDATE payouts
            SET status = 'paid', paid_at = NOW()
            WHERE id = $1 AND tenant_id = $2 AND status = 'pending'
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
