//! Commission tier endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use domain::models::commission_tier::{
    CommissionTier, CreateCommissionTierRequest, ListCommissionTiersResponse,
    UpdateCommissionTierRequest,
};
use domain::models::{Plan, PlanLimit};
use persistence::repositories::{CommissionTierRepository, TenantRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AdminAuth;
use crate::middleware::user_auth::UserAuth;

/// GET /api/v1/commission-tiers
pub async fn list_tiers(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<ListCommissionTiersResponse>, ApiError> {
    let tiers = CommissionTierRepository::new(state.pool.clone());
    let entities = tiers.list_by_tenant(auth.tenant_id).await?;

    Ok(Json(ListCommissionTiersResponse {
        data: entities.into_iter().map(Into::into).collect(),
    }))
}

/// POST /api/v1/commission-tiers (admin)
pub async fn create_tier(
    State(state): State<AppState>,
    AdminAuth(auth): AdminAuth,
    Json(req): Json<CreateCommissionTierRequest>,
) -> Result<(StatusCode, Json<CommissionTier>), ApiError> {
    req.validate()?;

    let tenants = TenantRepository::new(state.pool.clone());
    let tenant = tenants
        .find_by_id(auth.tenant_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Tenant not found".into()))?;

    let plan: Plan = tenant.plan.into();
    let count = tenants.count_commission_tiers(auth.tenant_id).await?;
    if plan.has_reached_limit(PlanLimit::MaxCommissionTiers, count) {
        return Err(ApiError::PlanLimit(format!(
            "Commission tier limit reached for the {} plan",
            plan
        )));
    }

    let tiers = CommissionTierRepository::new(state.pool.clone());
    let tier = tiers
        .create_tier(auth.tenant_id, &req.name, req.commission_rate)
        .await
        .map_err(|err| match &err {
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                ApiError::Conflict("A tier with this name already exists".into())
            }
            _ => err.into(),
        })?;

    tracing::info!(tier_id = %tier.id, tenant_id = %auth.tenant_id, "Commission tier created");
    Ok((StatusCode::CREATED, Json(tier.into())))
}

/// PUT /api/v1/commission-tiers/:id (admin)
pub async fn update_tier(
    State(state): State<AppState>,
    AdminAuth(auth): AdminAuth,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCommissionTierRequest>,
) -> Result<Json<CommissionTier>, ApiError> {
    req.validate()?;

    let tiers = CommissionTierRepository::new(state.pool.clone());
    let tier = tiers
        .update_tier(id, auth.tenant_id, req.name.as_deref(), req.commission_rate)
        .await?
        .ok_or_else(|| ApiError::NotFound("Commission tier not found".into()))?;

    Ok(Json(tier.into()))
}

/// DELETE /api/v1/commission-tiers/:id (admin)
///
/// A tier still referenced by affiliates cannot be deleted; the FK
/// violation surfaces as 409.
pub async fn delete_tier(
    State(state): State<AppState>,
    AdminAuth(auth): AdminAuth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let tiers = CommissionTierRepository::new(state.pool.clone());
    let affected = tiers
        .delete_tier(id, auth.tenant_id)
        .await
        .map_err(|err| match &err {
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23503") => {
                ApiError::Conflict("Tier is assigned to affiliates and cannot be deleted".into())
            }
            _ => err.into(),
        })?;

    if affected == 0 {
        return Err(ApiError::NotFound("Commission tier not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}
