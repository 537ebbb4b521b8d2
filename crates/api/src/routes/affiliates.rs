//! Affiliate management and invitation endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use domain::models::affiliate::{
    AffiliateResponse, ListAffiliatesQuery, ListAffiliatesResponse, UpdateAffiliateStatusRequest,
    UpdateAffiliateTierRequest,
};
use domain::models::invite::{
    AcceptInviteResponse, CreateInviteRequest, CreateInviteResponse, ListInvitesQuery,
};
use domain::models::pagination::{clamp_page_params, page_offset, Pagination};
use domain::models::{Affiliate, Invite};
use persistence::repositories::{AffiliateRepository, CommissionTierRepository, InviteRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AdminAuth;
use crate::middleware::user_auth::UserAuth;

/// GET /api/v1/affiliates (admin, paginated, status filter)
pub async fn list_affiliates(
    State(state): State<AppState>,
    AdminAuth(auth): AdminAuth,
    Query(query): Query<ListAffiliatesQuery>,
) -> Result<Json<ListAffiliatesResponse>, ApiError> {
    let (page, per_page) = clamp_page_params(query.page, query.per_page);
    let offset = page_offset(page, per_page);
    let status = query.status.map(Into::into);

    let affiliates = AffiliateRepository::new(state.pool.clone());
    let entities = affiliates
        .list_with_users(auth.tenant_id, status, per_page as i64, offset)
        .await?;
    let total = affiliates.count_by_tenant(auth.tenant_id, status).await?;

    let data: Vec<AffiliateResponse> = entities.into_iter().map(Into::into).collect();
    Ok(Json(ListAffiliatesResponse {
        data,
        pagination: Pagination::new(page, per_page, total),
    }))
}

/// GET /api/v1/affiliates/:id
pub async fn get_affiliate(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<Affiliate>, ApiError> {
    let affiliates = AffiliateRepository::new(state.pool.clone());
    let affiliate = affiliates
        .find_by_id(id, auth.tenant_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Affiliate not found".into()))?;
    Ok(Json(affiliate.into()))
}

/// PUT /api/v1/affiliates/:id/tier (admin)
pub async fn update_affiliate_tier(
    State(state): State<AppState>,
    AdminAuth(auth): AdminAuth,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateAffiliateTierRequest>,
) -> Result<Json<Affiliate>, ApiError> {
    let tiers = CommissionTierRepository::new(state.pool.clone());
    tiers
        .find_by_id(req.commission_tier_id, auth.tenant_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Commission tier not found".into()))?;

    let affiliates = AffiliateRepository::new(state.pool.clone());
    let affiliate = affiliates
        .update_tier(id, auth.tenant_id, req.commission_tier_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Affiliate not found".into()))?;

    tracing::info!(affiliate_id = %id, tier_id = %req.commission_tier_id, "Affiliate tier updated");
    Ok(Json(affiliate.into()))
}

/// PUT /api/v1/affiliates/:id/status (admin, suspend/activate)
pub async fn update_affiliate_status(
    State(state): State<AppState>,
    AdminAuth(auth): AdminAuth,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateAffiliateStatusRequest>,
) -> Result<Json<Affiliate>, ApiError> {
    let affiliates = AffiliateRepository::new(state.pool.clone());
    let affiliate = affiliates
        .update_status(id, auth.tenant_id, req.status.into())
        .await?
        .ok_or_else(|| ApiError::NotFound("Affiliate not found".into()))?;

    tracing::info!(affiliate_id = %id, status = %req.status, "Affiliate status updated");
    Ok(Json(affiliate.into()))
}

/// POST /api/v1/affiliates/invite (admin)
pub async fn invite_affiliate(
    State(state): State<AppState>,
    AdminAuth(auth): AdminAuth,
    Json(req): Json<CreateInviteRequest>,
) -> Result<(StatusCode, Json<CreateInviteResponse>), ApiError> {
    req.validate()?;

    let response = state
        .invites
        .create_invite(auth.tenant_id, auth.user_id, &req.email, req.product_id)
        .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AcceptInviteRequest {
    pub token: String,
}

/// POST /api/v1/affiliates/accept-invite/:invite_id (public)
pub async fn accept_invite(
    State(state): State<AppState>,
    Path(invite_id): Path<Uuid>,
    Json(req): Json<AcceptInviteRequest>,
) -> Result<Json<AcceptInviteResponse>, ApiError> {
    let response = state.invites.accept_invite(invite_id, &req.token).await?;
    Ok(Json(response))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListInvitesResponse {
    pub data: Vec<Invite>,
    pub pagination: Pagination,
}

/// GET /api/v1/affiliates/invites (admin, status filter)
pub async fn list_invites(
    State(state): State<AppState>,
    AdminAuth(auth): AdminAuth,
    Query(query): Query<ListInvitesQuery>,
) -> Result<Json<ListInvitesResponse>, ApiError> {
    let (page, per_page) = clamp_page_params(query.page, query.per_page);
    let offset = page_offset(page, per_page);
    let status = query.status.map(Into::into);

    let invites = InviteRepository::new(state.pool.clone());
    let entities = invites
        .list_by_tenant(auth.tenant_id, status, per_page as i64, offset)
        .await?;
    let total = invites.count_by_tenant(auth.tenant_id, status).await?;

    Ok(Json(ListInvitesResponse {
        data: entities.into_iter().map(Into::into).collect(),
        pagination: Pagination::new(page, per_page, total),
    }))
}

/// DELETE /api/v1/affiliates/invites/:id (admin, pending only)
pub async fn delete_invite(
    State(state): State<AppState>,
    AdminAuth(auth): AdminAuth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let invites = InviteRepository::new(state.pool.clone());
    let affected = invites.delete_pending(id, auth.tenant_id).await?;
    if affected == 0 {
        return Err(ApiError::NotFound(
            "Pending invite not found (accepted invites cannot be deleted)".into(),
        ));
    }
    Ok(StatusCode::NO_CONTENT)
}
