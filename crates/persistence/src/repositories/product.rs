//! Product repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::ProductEntity;
use crate::metrics::QueryTimer;

/// Repository for product catalog database operations.
#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    /// Creates a new ProductRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a product.
    pub async fn create_product(
        &self,
        tenant_id: Uuid,
        name: &str,
        description: Option<&str>,
        price_cents: i64,
        commission_rate: f64,
    ) -> Result<ProductEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_product");
        let result = sqlx::query_as::<_, ProductEntity>(
            r#"
            INSERT INTO products (tenant_id, name, description, price_cents, commission_rate)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, tenant_id, name, description, price_cents, commission_rate,
                      is_active, created_at, updated_at
            "#,
        )
        .bind(tenant_id)
        .bind(name)
        .bind(description)
        .bind(price_cents)
        .bind(commission_rate)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a product by ID within a tenant.
    pub async fn find_by_id(
        &self,
        id: Uuid,
        tenant_id: Uuid,
    ) -> Result<Option<ProductEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_product_by_id");
        let result = sqlx::query_as::<_, ProductEntity>(
            r#"
            SELECT id, tenant_id, name, description, price_cents, commission_rate,
                   is_active, created_at, updated_at
            FROM products
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

    /// List products for a tenant, optionally filtered by active flag.
    pub async fn list_by_tenant(
        &self,
        tenant_id: Uuid,
        is_active: Option<bool>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProductEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_products");
        let result = sqlx::query_as::<_, ProductEntity>(
            r#"
            SELECT id, tenant_id, name, description, price_cents, commission_rate,
                   is_active, created_at, updated_at
            FROM products
            WHERE tenant_id = $1
              AND ($2::BOOLEAN IS NULL OR is_active = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(tenant_id)
        .bind(is_active)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count products for a tenant matching the list filter.
    pub async fn count_by_tenant(
        &self,
        tenant_id: Uuid,
        is_active: Option<bool>,
    ) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_products");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM products
            WHERE tenant_id = $1
              AND ($2::BOOLEAN IS NULL OR is_active = $2)
            "#,
        )
        .bind(tenant_id)
        .bind(is_active)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a product. Unset fields are left unchanged.
    #[allow(clippy::too_many_arguments)]
    pub async fn update_product(
        &self,
        id: Uuid,
        tenant_id: Uuid,
        name: Option<&str>,
        description: Option<&str>,
        price_cents: Option<i64>,
        commission_rate: Option<f64>,
        is_active: Option<bool>,
    ) -> Result<Option<ProductEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_product");
        let result = sqlx::query_as::<_, ProductEntity>(
            r#"
            UPDATE products
            SET name = COALESCE($3, name),
                description = COALESCE($4, description),
                price_cents = COALESCE($5, price_cents),
                commission_rate = COALESCE($6, commission_rate),
                is_active = COALESCE($7, is_active),
                updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2
            RETURNING id, tenant_id, name, description, price_cents, commission_rate,
                      is_active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(tenant_id)
        .bind(name)
        .bind(description)
        .bind(price_cents)
        .bind(commission_rate)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Deactivate a product (soft delete).
    pub async fn deactivate(&self, id: Uuid, tenant_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("deactivate_product");
        let result = sqlx::query(
            r#"
            UPDATE products
            SET is_active = false, updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2 AND is_active = true
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
