//! Sale repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::entities::SaleEntity;
use crate::metrics::QueryTimer;

/// Repository for sale database operations.
#[derive(Clone)]
pub struct SaleRepository {
    pool: PgPool,
}

impl SaleRepository {
    /// Creates a new SaleRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a sale inside the sale transaction. The commission rate is a
    /// snapshot of the effective rate at recording time.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_sale_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant_id: Uuid,
        product_id: Uuid,
        affiliate_id: Uuid,
        tracking_link_id: Option<Uuid>,
        amount_cents: i64,
        commission_rate: f64,
        commission_cents: i64,
        occurred_at: DateTime<Utc>,
    ) -> Result<SaleEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_sale");
        let result = sqlx::query_as::<_, SaleEntity>(
            r#"
            INSERT INTO sales
                (tenant_id, product_id, affiliate_id, tracking_link_id,
                 amount_cents, commission_rate, commission_cents, occurred_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, tenant_id, product_id, affiliate_id, tracking_link_id,
                      amount_cents, commission_rate, commission_cents, occurred_at, created_at
            "#,
        )
        .bind(tenant_id)
        .bind(product_id)
        .bind(affiliate_id)
        .bind(tracking_link_id)
        .bind(amount_cents)
        .bind(commission_rate)
        .bind(commission_cents)
        .bind(occurred_at)
        .fetch_one(&mut **tx)
        .await;
        timer.record();
        result
    }

    /// Find a sale by ID within a tenant.
    pub async fn find_by_id(
        &self,
        id: Uuid,
        tenant_id: Uuid,
    ) -> Result<Option<SaleEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_sale_by_id");
        let result = sqlx::query_as::<_, SaleEntity>(
            r#"
            SELECT id, tenant_id, product_id, affiliate_id, tracking_link_id,
                   amount_cents, commission_rate, commission_cents, occurred_at, created_at
            FROM sales
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

    /// List sales for a tenant, optionally filtered by affiliate, newest first.
    pub async fn list_by_tenant(
        &self,
        tenant_id: Uuid,
        affiliate_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SaleEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_sales");
        let result = sqlx::query_as::<_, SaleEntity>(
            r#"
            SELECT id, tenant_id, product_id, affiliate_id, tracking_link_id,
                   amount_cents, commission_rate, commission_cents, occurred_at, created_at
            FROM sales
            WHERE tenant_id = $1
              AND ($2::UUID IS NULL OR affiliate_id = $2)
            ORDER BY occurred_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(tenant_id)
        .bind(affiliate_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count sales for a tenant matching the list filter.
    pub async fn count_by_tenant(
        &self,
        tenant_id: Uuid,
        affiliate_id: Option<Uuid>,
    ) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_sales");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM sales
            WHERE tenant_id = $1
              AND ($2::UUID IS NULL OR affiliate_id = $2)
            "#,
        )
        .bind(tenant_id)
        .bind(affiliate_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
