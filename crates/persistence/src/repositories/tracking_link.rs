//! Tracking link repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::entities::TrackingLinkEntity;
use crate::metrics::QueryTimer;

/// Repository for tracking link database operations.
#[derive(Clone)]
pub struct TrackingLinkRepository {
    pool: PgPool,
}

impl TrackingLinkRepository {
    /// Creates a new TrackingLinkRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a tracking link.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_link(
        &self,
        tenant_id: Uuid,
        affiliate_id: Uuid,
        product_id: Uuid,
        code: &str,
        destination_url: &str,
        utm_source: Option<&str>,
        utm_medium: Option<&str>,
        utm_campaign: Option<&str>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<TrackingLinkEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_tracking_link");
        let result = sqlx::query_as::<_, TrackingLinkEntity>(
            r#"
            INSERT INTO tracking_links
                (tenant_id, affiliate_id, product_id, code, destination_url,
                 utm_source, utm_medium, utm_campaign, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, tenant_id, affiliate_id, product_id, code, destination_url,
                      utm_source, utm_medium, utm_campaign, click_count, conversion_count,
                      expires_at, created_at
            "#,
        )
        .bind(tenant_id)
        .bind(affiliate_id)
        .bind(product_id)
        .bind(code)
        .bind(destination_url)
        .bind(utm_source)
        .bind(utm_medium)
        .bind(utm_campaign)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create a tracking link inside an existing transaction (invite acceptance).
    #[allow(clippy::too_many_arguments)]
    pub async fn create_link_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant_id: Uuid,
        affiliate_id: Uuid,
        product_id: Uuid,
        code: &str,
        destination_url: &str,
    ) -> Result<TrackingLinkEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_tracking_link");
        let result = sqlx::query_as::<_, TrackingLinkEntity>(
            r#"
            INSERT INTO tracking_links (tenant_id, affiliate_id, product_id, code, destination_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, tenant_id, affiliate_id, product_id, code, destination_url,
                      utm_source, utm_medium, utm_campaign, click_count, conversion_count,
                      expires_at, created_at
            "#,
        )
        .bind(tenant_id)
        .bind(affiliate_id)
        .bind(product_id)
        .bind(code)
        .bind(destination_url)
        .fetch_one(&mut **tx)
        .await;
        timer.record();
        result
    }

    /// Find a link by code (codes are globally unique).
    pub async fn find_by_code(
        &self,
        code: &str,
    ) -> Result<Option<TrackingLinkEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_tracking_link_by_code");
        let result = sqlx::query_as::<_, TrackingLinkEntity>(
            r#"
            SELECT id, tenant_id, affiliate_id, product_id, code, destination_url,
                   utm_source, utm_medium, utm_campaign, click_count, conversion_count,
                   expires_at, created_at
            FROM tracking_links
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List links for an affiliate within a tenant.
    pub async fn list_by_affiliate(
        &self,
        affiliate_id: Uuid,
        tenant_id: Uuid,
    ) -> Result<Vec<TrackingLinkEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_tracking_links_by_affiliate");
        let result = sqlx::query_as::<_, TrackingLinkEntity>(
            r#"
            SELECT id, tenant_id, affiliate_id, product_id, code, destination_url,
                   utm_source, utm_medium, utm_campaign, click_count, conversion_count,
                   expires_at, created_at
            FROM tracking_links
            WHERE affiliate_id = $1 AND tenant_id = $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(affiliate_id)
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List all links for a tenant (admin view).
    pub async fn list_by_tenant(
        &self,
        tenant_id: Uuid,
    ) -> Result<Vec<TrackingLinkEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_tracking_links_by_tenant");
        let result = sqlx::query_as::<_, TrackingLinkEntity>(
            r#"
            SELECT id, tenant_id, affiliate_id, product_id, code, destination_url,
                   utm_source, utm_medium, utm_campaign, click_count, conversion_count,
                   expires_at, created_at
            FROM tracking_links
            WHERE tenant_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Atomically record a click and return the link for redirect.
    ///
    /// Returns None if the code is unknown or the link has expired.
    pub async fn record_click(
        &self,
        code: &str,
    ) -> Result<Option<TrackingLinkEntity>, sqlx::Error> {
        let timer = QueryTimer::new("record_tracking_link_click");
        let result = sqlx::query_as::<_, TrackingLinkEntity>(
            r#"
            UPDATE tracking_links
            SET click_count = click_count + 1
            WHERE code = $1
              AND (expires_at IS NULL OR expires_at > NOW())
            RETURNING id, tenant_id, affiliate_id, product_id, code, destination_url,
                      utm_source, utm_medium, utm_campaign, click_count, conversion_count,
                      expires_at, created_at
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Bump conversion count inside a sale transaction.
    pub async fn record_conversion_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("record_tracking_link_conversion");
        let result = sqlx::query(
            r#"
            UPDATE tracking_links
            SET conversion_count = conversion_count + 1
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&mut **tx)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Check if a tracking code exists.
    pub async fn code_exists(&self, code: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("check_tracking_code_exists");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM tracking_links WHERE code = $1)
            "#,
        )
        .bind(code)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Generate unique tracking code by retrying if collision.
    pub async fn generate_unique_code<F>(&self, generator: F) -> Result<String, sqlx::Error>
    where
        F: Fn() -> String,
    {
        let mut code = generator();
        let mut attempts = 0;

        while self.code_exists(&code).await? {
            code = generator();
            attempts += 1;
            if attempts > 100 {
                return Err(sqlx::Error::Protocol(
                    "Could not generate unique tracking code".to_string(),
                ));
            }
        }

        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    // Note: TrackingLinkRepository tests require database connection and are covered by integration tests
}
