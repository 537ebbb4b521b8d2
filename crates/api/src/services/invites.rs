//! Invitation and onboarding service.
//!
//! Invite creation stores only a SHA-256 hash of the invite token; the raw
//! token travels once, inside the emailed URL. Acceptance provisions the
//! user, affiliate, and tracking link in a single transaction so a failure
//! at any step leaves no partial state.

use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use domain::models::invite::{
    default_invite_expiration, AcceptInviteResponse, CreateInviteResponse, InviteStatus,
    OnboardingTokens,
};
use domain::models::tracking_link::tracking_link_url;
use domain::models::user::UserRole;
use domain::models::{Invite, PlanLimit, DEFAULT_TIER_NAME};
use persistence::entities::{InviteEntity, UserRoleDb};
use persistence::repositories::{
    AffiliateRepository, CommissionTierRepository, InviteRepository, ProductRepository,
    TenantRepository, TrackingLinkRepository, UserRepository,
};
use shared::codes::{generate_invite_token, generate_referral_code, generate_tracking_code};
use shared::crypto::sha256_hex;
use shared::jwt::TokenIdentity;

use crate::middleware::metrics::{record_invite_accepted, record_invite_sent};
use crate::services::auth::{AuthError, AuthService};

#[derive(Debug, Error)]
pub enum InviteError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invite expired")]
    Expired,

    #[error("Plan limit reached: {0}")]
    PlanLimit(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl From<InviteError> for crate::error::ApiError {
    fn from(err: InviteError) -> Self {
        use crate::error::ApiError;
        match err {
            InviteError::NotFound(msg) => ApiError::NotFound(msg),
            InviteError::Conflict(msg) => ApiError::Conflict(msg),
            InviteError::Expired => ApiError::Gone("Invite has expired".into()),
            InviteError::PlanLimit(msg) => ApiError::PlanLimit(msg),
            InviteError::Internal(msg) => ApiError::Internal(msg),
            InviteError::Database(e) => e.into(),
            InviteError::Auth(e) => e.into(),
        }
    }
}

/// Invitation workflow service.
#[derive(Clone)]
pub struct InviteService {
    pool: PgPool,
    auth: AuthService,
    email: Arc<crate::services::EmailService>,
    app_base_url: String,
}

impl InviteService {
    pub fn new(
        pool: PgPool,
        auth: AuthService,
        email: Arc<crate::services::EmailService>,
        app_base_url: String,
    ) -> Self {
        Self {
            pool,
            auth,
            email,
            app_base_url,
        }
    }

    /// Creates a pending invite and sends the invitation email.
    ///
    /// Plan limits are enforced against the tenant's current affiliate
    /// count. A concurrent duplicate is caught by the partial unique index
    /// on pending (tenant, email) pairs and surfaces as a conflict.
    pub async fn create_invite(
        &self,
        tenant_id: Uuid,
        invited_by: Uuid,
        email: &str,
        product_id: Uuid,
    ) -> Result<CreateInviteResponse, InviteError> {
        let tenants = TenantRepository::new(self.pool.clone());
        let products = ProductRepository::new(self.pool.clone());
        let users = UserRepository::new(self.pool.clone());
        let invites = InviteRepository::new(self.pool.clone());

        let tenant = tenants
            .find_by_id(tenant_id)
            .await?
            .ok_or_else(|| InviteError::NotFound("Tenant not found".into()))?;

        products
            .find_by_id(product_id, tenant_id)
            .await?
            .ok_or_else(|| InviteError::NotFound("Product not found".into()))?;

        let plan: domain::models::Plan = tenant.plan.into();
        let affiliate_count = tenants.count_affiliates(tenant_id).await?;
        if plan.has_reached_limit(PlanLimit::MaxAffiliates, affiliate_count) {
            return Err(InviteError::PlanLimit(format!(
                "Affiliate limit reached for the {} plan",
                plan
            )));
        }

        if let Some(existing) = users.find_by_email(email).await? {
            if existing.tenant_id == tenant_id && existing.is_active {
                return Err(InviteError::Conflict(
                    "Email already belongs to a member of this tenant".into(),
                ));
            }
        }

        let token = generate_invite_token();
        let invite = invites
            .create_invite(
                tenant_id,
                email,
                product_id,
                invited_by,
                &sha256_hex(&token),
                default_invite_expiration(),
            )
            .await
            .map_err(|err| match &err {
                sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                    InviteError::Conflict("A pending invite already exists for this email".into())
                }
                _ => InviteError::Database(err),
            })?;

        let invite_url = self.invite_url(invite.id, &token);

        if let Err(e) = self
            .email
            .send_invite_email(email, &tenant.name, &invite_url)
            .await
        {
            // Delivery failure must not fail the request; the admin can
            // resend by deleting and recreating the invite.
            tracing::warn!(invite_id = %invite.id, error = %e, "Failed to send invite email");
        }

        record_invite_sent();
        tracing::info!(invite_id = %invite.id, tenant_id = %tenant_id, "Invite created");

        let invite: Invite = invite.into();
        Ok(CreateInviteResponse {
            id: invite.id,
            email: invite.email,
            product_id: invite.product_id,
            status: invite.status,
            invite_url,
            expires_at: invite.expires_at,
            created_at: invite.created_at,
        })
    }

    /// Accepts an invite, provisioning the affiliate in one transaction.
    ///
    /// Replaying an already-accepted invite returns 200 with
    /// `is_existing_user = true` and no tokens. Two concurrent accepts are
    /// serialized by the checked conditional status update: the loser sees
    /// zero affected rows and falls back to the replay response.
    pub async fn accept_invite(
        &self,
        invite_id: Uuid,
        token: &str,
    ) -> Result<AcceptInviteResponse, InviteError> {
        let invites = InviteRepository::new(self.pool.clone());

        let invite = invites
            .find_by_token_hash(&sha256_hex(token))
            .await?
            .filter(|i| i.id == invite_id)
            .ok_or_else(|| {
                InviteError::NotFound("Invite not found or already processed".into())
            })?;

        let status: InviteStatus = invite.status.into();
        if status == InviteStatus::Accepted {
            return Ok(replay_response(&invite));
        }

        if invite.expires_at <= chrono::Utc::now() {
            return Err(InviteError::Expired);
        }

        let users = UserRepository::new(self.pool.clone());
        let affiliates = AffiliateRepository::new(self.pool.clone());
        let tiers = CommissionTierRepository::new(self.pool.clone());
        let links = TrackingLinkRepository::new(self.pool.clone());

        let default_tier = tiers
            .find_by_name(invite.tenant_id, DEFAULT_TIER_NAME)
            .await?
            .ok_or_else(|| {
                InviteError::Internal(format!(
                    "Default commission tier '{}' missing for tenant {}",
                    DEFAULT_TIER_NAME, invite.tenant_id
                ))
            })?;

        let existing_user = users.find_by_email(&invite.email).await?;
        if let Some(ref user) = existing_user {
            if user.tenant_id != invite.tenant_id {
                return Err(InviteError::Conflict(
                    "Email already registered with another tenant".into(),
                ));
            }
        }

        let referral_code = affiliates
            .generate_unique_referral_code(generate_referral_code)
            .await?;
        let tracking_code = links.generate_unique_code(generate_tracking_code).await?;

        let mut tx = self.pool.begin().await?;

        let accepted = invites.mark_accepted_tx(&mut tx, invite.id).await?;
        if accepted == 0 {
            // A concurrent accept won the race.
            tx.rollback().await?;
            return Ok(replay_response(&invite));
        }

        let user = match existing_user {
            Some(user) => user,
            None => {
                let display_name = display_name_from_email(&invite.email);
                users
                    .create_user_tx(
                        &mut tx,
                        invite.tenant_id,
                        &invite.email,
                        None,
                        &display_name,
                        UserRoleDb::Affiliate,
                        Some(invite.invited_by),
                    )
                    .await?
            }
        };

        let affiliate = match affiliates.find_by_user(user.id, invite.tenant_id).await? {
            Some(existing) => existing,
            None => {
                affiliates
                    .create_affiliate_tx(
                        &mut tx,
                        invite.tenant_id,
                        user.id,
                        &referral_code,
                        default_tier.id,
                    )
                    .await?
            }
        };

        links
            .create_link_tx(
                &mut tx,
                invite.tenant_id,
                affiliate.id,
                invite.product_id,
                &tracking_code,
                &self.app_base_url,
            )
            .await?;

        tx.commit().await?;

        let tokens = self
            .auth
            .issue_token_pair(
                TokenIdentity {
                    user_id: user.id,
                    tenant_id: invite.tenant_id,
                },
                UserRole::Affiliate,
            )
            .await?;

        record_invite_accepted();
        tracing::info!(
            invite_id = %invite.id,
            affiliate_id = %affiliate.id,
            tenant_id = %invite.tenant_id,
            "Invite accepted"
        );

        Ok(AcceptInviteResponse {
            email: invite.email,
            is_existing_user: false,
            affiliate_id: Some(affiliate.id),
            referral_code: Some(affiliate.referral_code),
            tracking_link_url: Some(tracking_link_url(&self.app_base_url, &tracking_code)),
            tokens: Some(OnboardingTokens {
                access_token: tokens.access_token,
                refresh_token: tokens.refresh_token,
                token_type: tokens.token_type,
                expires_in: tokens.expires_in,
            }),
        })
    }

    fn invite_url(&self, invite_id: Uuid, token: &str) -> String {
        format!(
            "{}/invites/{}/accept?token={}",
            self.app_base_url.trim_end_matches('/'),
            invite_id,
            token
        )
    }
}

fn replay_response(invite: &InviteEntity) -> AcceptInviteResponse {
    AcceptInviteResponse {
        email: invite.email.clone(),
        is_existing_user: true,
        affiliate_id: None,
        referral_code: None,
        tracking_link_url: None,
        tokens: None,
    }
}

/// Best-effort display name for users onboarded without a profile.
fn display_name_from_email(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}
