//! Tenant endpoints (always scoped to the token's tenant).

use axum::{extract::State, Json};
use validator::Validate;

use domain::models::tenant::{Tenant, TenantUsageResponse, UpdateTenantRequest, UsageMetric};
use domain::models::{Plan, PlanLimit};
use persistence::repositories::TenantRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AdminAuth;
use crate::middleware::user_auth::UserAuth;

/// GET /api/v1/tenants/me
pub async fn get_current_tenant(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<Tenant>, ApiError> {
    let tenants = TenantRepository::new(state.pool.clone());
    let tenant = tenants
        .find_by_id(auth.tenant_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Tenant not found".into()))?;
    Ok(Json(tenant.into()))
}

/// PATCH /api/v1/tenants/me (admin)
pub async fn update_current_tenant(
    State(state): State<AppState>,
    AdminAuth(auth): AdminAuth,
    Json(req): Json<UpdateTenantRequest>,
) -> Result<Json<Tenant>, ApiError> {
    req.validate()?;

    let tenants = TenantRepository::new(state.pool.clone());
    let tenant = tenants
        .update_tenant(
            auth.tenant_id,
            req.name.as_deref(),
            req.plan.map(Into::into),
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Tenant not found".into()))?;

    tracing::info!(tenant_id = %auth.tenant_id, "Tenant updated");
    Ok(Json(tenant.into()))
}

/// GET /api/v1/tenants/me/usage
pub async fn get_tenant_usage(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<TenantUsageResponse>, ApiError> {
    let tenants = TenantRepository::new(state.pool.clone());
    let tenant = tenants
        .find_by_id(auth.tenant_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Tenant not found".into()))?;

    let plan: Plan = tenant.plan.into();
    let affiliates = tenants.count_affiliates(auth.tenant_id).await?;
    let users = tenants.count_users(auth.tenant_id).await?;
    let tiers = tenants.count_commission_tiers(auth.tenant_id).await?;
    let products = tenants.count_products(auth.tenant_id).await?;

    Ok(Json(TenantUsageResponse {
        tenant_id: auth.tenant_id,
        plan,
        affiliates: UsageMetric::new(plan, PlanLimit::MaxAffiliates, affiliates),
        users: UsageMetric::new(plan, PlanLimit::MaxUsers, users),
        commission_tiers: UsageMetric::new(plan, PlanLimit::MaxCommissionTiers, tiers),
        products: UsageMetric::new(plan, PlanLimit::MaxProducts, products),
        invoicing_available: plan.invoicing_available(),
    }))
}
