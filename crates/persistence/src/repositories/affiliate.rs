//! Affiliate repository for database operations.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::entities::{AffiliateEntity, AffiliateStatusDb, AffiliateWithUserEntity};
use crate::metrics::QueryTimer;

/// Repository for affiliate-related database operations.
#[derive(Clone)]
pub struct AffiliateRepository {
    pool: PgPool,
}

impl AffiliateRepository {
    /// Creates a new AffiliateRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an affiliate inside an existing transaction (invite acceptance).
    pub async fn create_affiliate_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant_id: Uuid,
        user_id: Uuid,
        referral_code: &str,
        commission_tier_id: Uuid,
    ) -> Result<AffiliateEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_affiliate");
        let result = sqlx::query_as::<_, AffiliateEntity>(
            r#"
            INSERT INTO affiliates (tenant_id, user_id, referral_code, commission_tier_id, status)
            VALUES ($1, $2, $3, $4, 'active')
            RETURNING id, tenant_id, user_id, referral_code, commission_tier_id, status,
                      total_earnings_cents, created_at, updated_at
            "#,
        )
        .bind(tenant_id)
        .bind(user_id)
        .bind(referral_code)
        .bind(commission_tier_id)
        .fetch_one(&mut **tx)
        .await;
        timer.record();
        result
    }

    /// Find affiliate by ID within a tenant.
    pub async fn find_by_id(
        &self,
        id: Uuid,
        tenant_id: Uuid,
    ) -> Result<Option<AffiliateEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_affiliate_by_id");
        let result = sqlx::query_as::<_, AffiliateEntity>(
            r#"
            SELECT id, tenant_id, user_id, referral_code, commission_tier_id, status,
                   total_earnings_cents, created_at, updated_at
            FROM affiliates
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

    /// Find affiliate by user within a tenant.
    pub async fn find_by_user(
        &self,
        user_id: Uuid,
        tenant_id: Uuid,
    ) -> Result<Option<AffiliateEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_affiliate_by_user");
        let result = sqlx::query_as::<_, AffiliateEntity>(
            r#"
            SELECT id, tenant_id, user_id, referral_code, commission_tier_id, status,
                   total_earnings_cents, created_at, updated_at
            FROM affiliates
            WHERE user_id = $1 AND tenant_id = $2
            "#,
        )
        .bind(user_id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find affiliate by referral code (codes are globally unique).
    pub async fn find_by_referral_code(
        &self,
        referral_code: &str,
    ) -> Result<Option<AffiliateEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_affiliate_by_referral_code");
        let result = sqlx::query_as::<_, AffiliateEntity>(
            r#"
            SELECT id, tenant_id, user_id, referral_code, commission_tier_id, status,
                   total_earnings_cents, created_at, updated_at
            FROM affiliates
            WHERE referral_code = $1
            "#,
        )
        .bind(referral_code)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List affiliates for a tenant with user and tier names joined,
    /// optionally filtered by status.
    pub async fn list_with_users(
        &self,
        tenant_id: Uuid,
        status: Option<AffiliateStatusDb>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AffiliateWithUserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_affiliates_with_users");
        let result = sqlx::query_as::<_, AffiliateWithUserEntity>(
            r#"
            SELECT
                a.id, a.tenant_id, a.user_id,
                u.email, u.display_name,
                a.referral_code, a.commission_tier_id,
                t.name as commission_tier_name,
                a.status, a.total_earnings_cents, a.created_at
            FROM affiliates a
            JOIN users u ON a.user_id = u.id
            JOIN commission_tiers t ON a.commission_tier_id = t.id
            WHERE a.tenant_id = $1
              AND ($2::affiliate_status IS NULL OR a.status = $2)
            ORDER BY a.created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(tenant_id)
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count affiliates for a tenant matching the list filter.
    pub async fn count_by_tenant(
        &self,
        tenant_id: Uuid,
        status: Option<AffiliateStatusDb>,
    ) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_affiliates");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM affiliates
            WHERE tenant_id = $1
              AND ($2::affiliate_status IS NULL OR status = $2)
            "#,
        )
        .bind(tenant_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Reassign an affiliate's commission tier.
    pub async fn update_tier(
        &self,
        id: Uuid,
        tenant_id: Uuid,
        commission_tier_id: Uuid,
    ) -> Result<Option<AffiliateEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_affiliate_tier");
        let result = sqlx::query_as::<_, AffiliateEntity>(
            r#"
            UPDATE affiliates
            SET commission_tier_id = $3, updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2
            RETURNING id, tenant_id, user_id, referral_code, commission_tier_id, status,
                      total_earnings_cents, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(tenant_id)
        .bind(commission_tier_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Change an affiliate's status (suspend/reactivate).
    pub async fn update_status(
        &self,
        id: Uuid,
        tenant_id: Uuid,
        status: AffiliateStatusDb,
    ) -> Result<Option<AffiliateEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_affiliate_status");
        let result = sqlx::query_as::<_, AffiliateEntity>(
            r#"
            UPDATE affiliates
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2
            RETURNING id, tenant_id, user_id, referral_code, commission_tier_id, status,
                      total_earnings_cents, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(tenant_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Add to an affiliate's lifetime earnings inside a sale transaction.
    pub async fn add_earnings_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        amount_cents: i64,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("add_affiliate_earnings");
        let result = sqlx::query(
            r#"
            UPDATE affiliates
            SET total_earnings_cents = total_earnings_cents + $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(amount_cents)
        .execute(&mut **tx)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Check if a referral code exists.
    pub async fn referral_code_exists(&self, code: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("check_referral_code_exists");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM affiliates WHERE referral_code = $1)
            "#,
        )
        .bind(code)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Generate unique referral code by retrying if collision.
    pub async fn generate_unique_referral_code<F>(
        &self,
        generator: F,
    ) -> Result<String, sqlx::Error>
    where
        F: Fn() -> String,
    {
        let mut code = generator();
        let mut attempts = 0;

        while self.referral_code_exists(&code).await? {
            code = generator();
            attempts += 1;
            if attempts > 100 {
                return Err(sqlx::Error::Protocol(
                    "Could not generate unique referral code".to_string(),
                ));
            }
        }

        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    // Note: AffiliateRepository tests require database connection and are covered by integration tests
}
