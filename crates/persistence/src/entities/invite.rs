//! Invite entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::invite::{Invite, InviteStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum that maps to the PostgreSQL `invite_status` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "invite_status", rename_all = "lowercase")]
pub enum InviteStatusDb {
    Pending,
    Accepted,
}

impl From<InviteStatusDb> for InviteStatus {
    fn from(status: InviteStatusDb) -> Self {
        match status {
            InviteStatusDb::Pending => InviteStatus::Pending,
            InviteStatusDb::Accepted => InviteStatus::Accepted,
        }
    }
}

impl From<InviteStatus> for InviteStatusDb {
    fn from(status: InviteStatus) -> Self {
        match status {
            InviteStatus::Pending => InviteStatusDb::Pending,
            InviteStatus::Accepted => InviteStatusDb::Accepted,
        }
    }
}

/// Database row mapping for the invites table.
///
/// Carries `token_hash`, which never leaves the persistence layer.
#[derive(Debug, Clone, FromRow)]
pub struct InviteEntity {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub email: String,
    pub product_id: Uuid,
    pub invited_by: Uuid,
    pub status: InviteStatusDb,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
}

impl From<InviteEntity> for Invite {
    fn from(entity: InviteEntity) -> Self {
        Self {
            id: entity.id,
            tenant_id: entity.tenant_id,
            email: entity.email,
            product_id: entity.product_id,
            invited_by: entity.invited_by,
            status: entity.status.into(),
            expires_at: entity.expires_at,
            created_at: entity.created_at,
            accepted_at: entity.accepted_at,
        }
    }
}
