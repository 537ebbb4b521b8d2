//! Invite repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::entities::InviteEntity;
use crate::metrics::QueryTimer;

/// Repository for invite-related database operations.
#[derive(Clone)]
pub struct InviteRepository {
    pool: PgPool,
}

impl InviteRepository {
    /// Creates a new InviteRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new invite. A partial unique index on (tenant_id, email)
    /// where status = 'pending' rejects duplicate pending invites with a
    /// unique violation.
    pub async fn create_invite(
        &self,
        tenant_id: Uuid,
        email: &str,
        product_id: Uuid,
        invited_by: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<InviteEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_invite");
        let result = sqlx::query_as::<_, InviteEntity>(
            r#"
            INSERT INTO invites (tenant_id, email, product_id, invited_by, token_hash, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, tenant_id, email, product_id, invited_by, status, token_hash,
                      expires_at, created_at, accepted_at
            "#,
        )
        .bind(tenant_id)
        .bind(email)
        .bind(product_id)
        .bind(invited_by)
        .bind(token_hash)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find invite by token hash (public accept lookup).
    pub async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<InviteEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_invite_by_token_hash");
        let result = sqlx::query_as::<_, InviteEntity>(
            r#"
            SELECT id, tenant_id, email, product_id, invited_by, status, token_hash,
                   expires_at, created_at, accepted_at
            FROM invites
            WHERE token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find invite by ID within a tenant.
    pub async fn find_by_id(
        &self,
        id: Uuid,
        tenant_id: Uuid,
    ) -> Result<Option<InviteEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_invite_by_id");
        let result = sqlx::query_as::<_, InviteEntity>(
            r#"
            SELECT id, tenant_id, email, product_id, invited_by, status, token_hash,
                   expires_at, created_at, accepted_at
            FROM invites
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

    /// List invites for a tenant, optionally filtered by status, newest first.
    pub async fn list_by_tenant(
        &self,
        tenant_id: Uuid,
        status: Option<crate::entities::InviteStatusDb>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<InviteEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_invites");
        let result = sqlx::query_as::<_, InviteEntity>(
            r#"
            SELECT id, tenant_id, email, product_id, invited_by, status, token_hash,
                   expires_at, created_at, accepted_at
            FROM invites
            WHERE tenant_id = $1
              AND ($2::invite_status IS NULL OR status = $2)
            ORDER BY created_at DESC
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

    /// Count invites for a tenant matching the list filter.
    pub async fn count_by_tenant(
        &self,
        tenant_id: Uuid,
        status: Option<crate::entities::InviteStatusDb>,
    ) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_invites");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM invites
            WHERE tenant_id = $1
              AND ($2::invite_status IS NULL OR status = $2)
            "#,
        )
        .bind(tenant_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Flip a pending invite to accepted inside the acceptance transaction.
    ///
    /// The status condition makes concurrent accepts race safely: exactly one
    /// caller sees rows_affected == 1, the rest see 0 and must treat the
    /// invite as already accepted.
    pub async fn mark_accepted_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("mark_invite_accepted");
        let result = sqlx::query(
            r#"
            UPDATE invites
            SET status = 'accepted', accepted_at = NOW()
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(id)
        .execute(&mut **tx)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Delete a pending invite (revocation). Accepted invites are immutable.
    pub async fn delete_pending(&self, id: Uuid, tenant_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_pending_invite");
        let result = sqlx::query(
            r#"
            DELETE FROM invites
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

#[cfg(test)]
mod tests {
    // Note: InviteRepository tests require database connection and are covered by integration tests
}
