//! Commission distribution repository for database operations.

use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::entities::CommissionDistributionEntity;
use crate::metrics::QueryTimer;

/// Repository for the commission distribution ledger. Ledger rows are only
/// touched inside sale and payout transactions.
#[derive(Clone, Default)]
pub struct DistributionRepository;

impl DistributionRepository {
    pub fn new() -> Self {
        Self
    }

    /// Create a ledger row inside the sale transaction.
    pub async fn create_distribution_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant_id: Uuid,
        sale_id: Uuid,
        affiliate_id: Uuid,
        amount_cents: i64,
    ) -> Result<CommissionDistributionEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_distribution");
        let result = sqlx::query_as::<_, CommissionDistributionEntity>(
            r#"
            INSERT INTO commission_distributions (tenant_id, sale_id, affiliate_id, amount_cents)
            VALUES ($1, $2, $3, $4)
            RETURNING id, tenant_id, sale_id, affiliate_id, amount_cents, payout_id, created_at
            "#,
        )
        .bind(tenant_id)
        .bind(sale_id)
        .bind(affiliate_id)
        .bind(amount_cents)
        .fetch_one(&mut **tx)
        .await;
        timer.record();
        result
    }

    /// Sum an affiliate's unsettled commission inside the payout transaction.
    ///
    /// FOR UPDATE locks the rows so a concurrent payout cannot settle the
    /// same distributions twice.
    pub async fn sum_unsettled_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        affiliate_id: Uuid,
        tenant_id: Uuid,
    ) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("sum_unsettled_distributions");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(amount_cents), 0)::BIGINT
            FROM (
                SELECT amount_cents
                FROM commission_distributions
                WHERE affiliate_id = $1 AND tenant_id = $2 AND payout_id IS NULL
                FOR UPDATE
            ) unsettled
            "#,
        )
        .bind(affiliate_id)
        .bind(tenant_id)
        .fetch_one(&mut **tx)
        .await;
        timer.record();
        result
    }

    /// Attach all unsettled distributions to a payout inside the payout
    /// transaction.
    pub async fn settle_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        affiliate_id: Uuid,
        tenant_id: Uuid,
        payout_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("settle_distributions");
        let result = sqlx::query(
            r#"
            UPDATE commission_distributions
            SET payout_id = $3
            WHERE affiliate_id = $1 AND tenant_id = $2 AND payout_id IS NULL
            "#,
        )
        .bind(affiliate_id)
        .bind(tenant_id)
        .bind(payout_id)
        .execute(&mut **tx)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

}

#[cfg(test)]
mod tests {
    // Note: DistributionRepository tests require database connection and are covered by integration tests
}
