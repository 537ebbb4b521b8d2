//! User repository for database operations.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::entities::{UserEntity, UserRoleDb};
use crate::metrics::QueryTimer;

/// Repository for user-related database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a user inside an existing transaction (signup and invite flows).
    ///
    /// `password_hash` is None for invited users until they set a password.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_user_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant_id: Uuid,
        email: &str,
        password_hash: Option<&str>,
        display_name: &str,
        role: UserRoleDb,
        invited_by: Option<Uuid>,
    ) -> Result<UserEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_user");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            INSERT INTO users (tenant_id, email, password_hash, display_name, role, invited_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, tenant_id, email, password_hash, display_name, role, invited_by,
                      is_active, last_login_at, created_at, updated_at
            "#,
        )
        .bind(tenant_id)
        .bind(email)
        .bind(password_hash)
        .bind(display_name)
        .bind(role)
        .bind(invited_by)
        .fetch_one(&mut **tx)
        .await;
        timer.record();
        result
    }

    /// Find user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, tenant_id, email, password_hash, display_name, role, invited_by,
                   is_active, last_login_at, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find user by email (emails are globally unique).
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_email");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, tenant_id, email, password_hash, display_name, role, invited_by,
                   is_active, last_login_at, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List users for a tenant, newest first.
    pub async fn list_by_tenant(
        &self,
        tenant_id: Uuid,
        role: Option<UserRoleDb>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_users_by_tenant");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, tenant_id, email, password_hash, display_name, role, invited_by,
                   is_active, last_login_at, created_at, updated_at
            FROM users
            WHERE tenant_id = $1
              AND ($2::user_role IS NULL OR role = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(tenant_id)
        .bind(role)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn count_by_tenant(
        &self,
        tenant_id: Uuid,
        role: Option<UserRoleDb>,
    ) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_users_by_tenant");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM users
            WHERE tenant_id = $1
              AND ($2::user_role IS NULL OR role = $2)
            "#,
        )
        .bind(tenant_id)
        .bind(role)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Set a user's password hash (onboarding completes here).
    pub async fn set_password_hash(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("set_user_password_hash");
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Record a successful login.
    pub async fn touch_last_login(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("touch_user_last_login");
        let result = sqlx::query(
            r#"
            UPDATE users
            SET last_login_at = NOW(), updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

}

#[cfg(test)]
mod tests {
    // Note: UserRepository tests require database connection and are covered by integration tests
}
