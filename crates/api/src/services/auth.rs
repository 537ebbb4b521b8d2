//! Authentication service.
//!
//! Owns tenant signup, credential login, refresh-token rotation, and logout.
//! Refresh tokens are tracked as SHA-256 hashes of their `jti` in the
//! sessions table; a refresh that does not match a stored session is
//! rejected, and each successful refresh rotates the session row.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use domain::models::tenant::{validate_slug, Plan, Tenant};
use domain::models::user::{User, UserRole};
use domain::models::DEFAULT_TIER_NAME;
use persistence::entities::{TenantPlanDb, UserRoleDb};
use persistence::repositories::{
    CommissionTierRepository, RoleRepository, SessionRepository, TenantRepository, UserRepository,
};
use shared::crypto::sha256_hex;
use shared::jwt::{JwtConfig, JwtError, TokenIdentity};
use shared::password::{hash_password, verify_password, PasswordError};
use shared::validation::validate_password_strength;

/// Commission rate of the tier every tenant starts with.
const DEFAULT_TIER_RATE: f64 = 5.0;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User account is disabled")]
    UserDisabled,

    #[error("Tenant account is disabled")]
    TenantDisabled,

    #[error("Slug is already taken")]
    SlugTaken,

    #[error("Email is already registered")]
    EmailTaken,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Token error: {0}")]
    Token(#[from] JwtError),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),
}

pub type AuthResult<T> = Result<T, AuthError>;

impl From<AuthError> for crate::error::ApiError {
    fn from(err: AuthError) -> Self {
        use crate::error::ApiError;
        match err {
            AuthError::InvalidCredentials | AuthError::InvalidToken => {
                ApiError::Unauthorized(err.to_string())
            }
            AuthError::UserDisabled | AuthError::TenantDisabled => {
                ApiError::Forbidden(err.to_string())
            }
            AuthError::SlugTaken | AuthError::EmailTaken => ApiError::Conflict(err.to_string()),
            AuthError::Validation(msg) => ApiError::Validation(msg),
            AuthError::Database(e) => e.into(),
            AuthError::Token(e) => ApiError::Internal(format!("Token generation failed: {}", e)),
            AuthError::Password(e) => ApiError::Internal(format!("Password hashing failed: {}", e)),
        }
    }
}

/// Access/refresh token pair returned by auth operations.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// Authentication service.
#[derive(Clone)]
pub struct AuthService {
    pool: PgPool,
    jwt: Arc<JwtConfig>,
}

impl AuthService {
    pub fn new(pool: PgPool, jwt: Arc<JwtConfig>) -> Self {
        Self { pool, jwt }
    }

    /// Creates a tenant, its admin user, the seeded admin role, and the
    /// default commission tier in one transaction, then issues a token pair.
    pub async fn signup(
        &self,
        tenant_name: &str,
        slug: &str,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> AuthResult<(Tenant, User, TokenPair)> {
        validate_slug(slug).map_err(|e| {
            AuthError::Validation(e.message.map(|m| m.to_string()).unwrap_or_default())
        })?;
        validate_password_strength(password).map_err(|e| {
            AuthError::Validation(e.message.map(|m| m.to_string()).unwrap_or_default())
        })?;

        let tenants = TenantRepository::new(self.pool.clone());
        let users = UserRepository::new(self.pool.clone());
        let roles = RoleRepository::new();
        let tiers = CommissionTierRepository::new(self.pool.clone());

        if tenants.slug_exists(slug).await? {
            return Err(AuthError::SlugTaken);
        }
        if users.find_by_email(email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = hash_password(password)?;
        let trial_ends_at = Utc::now() + Duration::days(Plan::trial_days());

        let mut tx = self.pool.begin().await?;

        let tenant = tenants
            .create_tenant_tx(
                &mut tx,
                tenant_name,
                slug,
                TenantPlanDb::Trial,
                Some(trial_ends_at),
            )
            .await
            .map_err(unique_violation(AuthError::SlugTaken))?;

        let user = users
            .create_user_tx(
                &mut tx,
                tenant.id,
                email,
                Some(&password_hash),
                display_name,
                UserRoleDb::Admin,
                None,
            )
            .await
            .map_err(unique_violation(AuthError::EmailTaken))?;

        roles
            .create_role_tx(&mut tx, tenant.id, "admin", &["*".to_string()])
            .await?;

        tiers
            .create_tier_tx(&mut tx, tenant.id, DEFAULT_TIER_NAME, DEFAULT_TIER_RATE)
            .await?;

        tx.commit().await?;

        tracing::info!(
            tenant_id = %tenant.id,
            user_id = %user.id,
            slug = %slug,
            "Tenant signed up"
        );

        let tokens = self
            .issue_token_pair(
                TokenIdentity {
                    user_id: user.id,
                    tenant_id: tenant.id,
                },
                UserRole::Admin,
            )
            .await?;

        Ok((tenant.into(), user.into(), tokens))
    }

    /// Verifies credentials and issues a token pair.
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<(User, TokenPair)> {
        let users = UserRepository::new(self.pool.clone());
        let tenants = TenantRepository::new(self.pool.clone());

        let user = users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let hash = user
            .password_hash
            .as_deref()
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(AuthError::UserDisabled);
        }

        let tenant = tenants
            .find_by_id(user.tenant_id)
            .await?
            .ok_or(AuthError::TenantDisabled)?;
        if !tenant.is_active {
            return Err(AuthError::TenantDisabled);
        }

        users.touch_last_login(user.id).await?;

        let role: UserRole = user.role.into();
        let tokens = self
            .issue_token_pair(
                TokenIdentity {
                    user_id: user.id,
                    tenant_id: user.tenant_id,
                },
                role,
            )
            .await?;

        Ok((user.into(), tokens))
    }

    /// Rotates a refresh token: the presented token's session row is
    /// deleted and a fresh pair is issued.
    pub async fn refresh(&self, refresh_token: &str) -> AuthResult<TokenPair> {
        let claims = self
            .jwt
            .validate_refresh_token(refresh_token)
            .map_err(|_| AuthError::InvalidToken)?;

        let sessions = SessionRepository::new(self.pool.clone());
        let session = sessions
            .find_by_token_hash(&sha256_hex(&claims.jti))
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if !session.is_valid(Utc::now()) {
            sessions.delete_session(session.id).await?;
            return Err(AuthError::InvalidToken);
        }

        let users = UserRepository::new(self.pool.clone());
        let user = users
            .find_by_id(session.user_id)
            .await?
            .ok_or(AuthError::InvalidToken)?;
        if !user.is_active {
            return Err(AuthError::UserDisabled);
        }

        sessions.delete_session(session.id).await?;

        let role: UserRole = user.role.into();
        self.issue_token_pair(
            TokenIdentity {
                user_id: user.id,
                tenant_id: user.tenant_id,
            },
            role,
        )
        .await
    }

    /// Invalidates the session behind a refresh token. With `all_devices`,
    /// every session of the user is removed.
    pub async fn logout(&self, refresh_token: &str, all_devices: bool) -> AuthResult<()> {
        let claims = self
            .jwt
            .validate_refresh_token(refresh_token)
            .map_err(|_| AuthError::InvalidToken)?;

        let sessions = SessionRepository::new(self.pool.clone());

        if all_devices {
            let identity = shared::jwt::extract_identity(&claims).map_err(|_| AuthError::InvalidToken)?;
            sessions.delete_user_sessions(identity.user_id).await?;
        } else if let Some(session) = sessions.find_by_token_hash(&sha256_hex(&claims.jti)).await? {
            sessions.delete_session(session.id).await?;
        }

        Ok(())
    }

    /// Sets or changes the authenticated user's password.
    ///
    /// Users provisioned through invite acceptance start with no password
    /// hash and may set one directly; a user who already has a password
    /// must present the current one.
    pub async fn set_password(
        &self,
        user_id: Uuid,
        current_password: Option<&str>,
        new_password: &str,
    ) -> AuthResult<()> {
        validate_password_strength(new_password).map_err(|e| {
            AuthError::Validation(e.message.map(|m| m.to_string()).unwrap_or_default())
        })?;

        let users = UserRepository::new(self.pool.clone());
        let user = users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::InvalidToken)?;
        if !user.is_active {
            return Err(AuthError::UserDisabled);
        }

        if let Some(hash) = user.password_hash.as_deref() {
            let current = current_password.ok_or(AuthError::InvalidCredentials)?;
            if !verify_password(current, hash)? {
                return Err(AuthError::InvalidCredentials);
            }
        }

        let new_hash = hash_password(new_password)?;
        users.set_password_hash(user.id, &new_hash).await?;

        tracing::info!(user_id = %user.id, "Password updated");
        Ok(())
    }

    /// Issues an access/refresh pair and records the refresh session.
    ///
    /// Also used by the onboarding flow to log in freshly provisioned
    /// affiliates without a password round-trip.
    pub async fn issue_token_pair(
        &self,
        identity: TokenIdentity,
        role: UserRole,
    ) -> AuthResult<TokenPair> {
        let role_str = role.to_string();
        let (access_token, _access_jti) = self.jwt.generate_access_token(identity, &role_str)?;
        let (refresh_token, refresh_jti) = self.jwt.generate_refresh_token(identity, &role_str)?;

        let sessions = SessionRepository::new(self.pool.clone());
        let expires_at = Utc::now() + Duration::seconds(self.jwt.refresh_token_expiry_secs);
        sessions
            .create_session(identity.user_id, &sha256_hex(&refresh_jti), expires_at)
            .await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt.access_token_expiry_secs,
        })
    }
}

/// Maps a unique-constraint violation to the given error, passing other
/// database errors through.
fn unique_violation(conflict: AuthError) -> impl FnOnce(sqlx::Error) -> AuthError {
    move |err| match &err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => conflict,
        _ => AuthError::Database(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_passthrough() {
        let mapped = unique_violation(AuthError::SlugTaken)(sqlx::Error::RowNotFound);
        assert!(matches!(mapped, AuthError::Database(_)));
    }

    #[test]
    fn test_token_pair_serialization() {
        let pair = TokenPair {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 3600,
        };
        let json = serde_json::to_string(&pair).unwrap();
        assert!(json.contains("\"token_type\":\"Bearer\""));
        assert!(json.contains("\"expires_in\":3600"));
    }

    #[test]
    fn test_auth_error_messages() {
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Invalid email or password"
        );
        assert_eq!(AuthError::SlugTaken.to_string(), "Slug is already taken");
    }

    // Note: signup/login/refresh flows require a database connection and are
    // covered by integration tests.
}
