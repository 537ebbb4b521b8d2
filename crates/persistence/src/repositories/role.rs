//! Role repository for database operations.

use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::entities::RoleEntity;
use crate::metrics::QueryTimer;

/// Repository for tenant-scoped role definitions. Roles are only written
/// during tenant bootstrap, inside the signup transaction.
#[derive(Clone, Default)]
pub struct RoleRepository;

impl RoleRepository {
    pub fn new() -> Self {
        Self
    }

    /// Create a role inside an existing transaction (tenant bootstrap).
    pub async fn create_role_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant_id: Uuid,
        name: &str,
        permissions: &[String],
    ) -> Result<RoleEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_role");
        let result = sqlx::query_as::<_, RoleEntity>(
            r#"
            INSERT INTO roles (tenant_id, name, permissions)
            VALUES ($1, $2, $3)
            RETURNING id, tenant_id, name, permissions, created_at
            "#,
        )
        .bind(tenant_id)
        .bind(name)
        .bind(permissions)
        .fetch_one(&mut **tx)
        .await;
        timer.record();
        result
    }

}

#[cfg(test)]
mod tests {
    // Note: RoleRepository tests require database connection and are covered by integration tests
}
