//! Payout endpoints.
//!
//! A payout gathers all of an affiliate's unsettled commission
//! distributions into one row. The sum is computed under row locks and the
//! distributions are stamped with the payout id in the same transaction, so
//! a distribution is never settled twice.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use domain::models::pagination::{clamp_page_params, page_offset, Pagination};
use domain::models::payout::{
    CreatePayoutRequest, ListPayoutsQuery, ListPayoutsResponse, Payout, PayoutStatus,
};
use persistence::repositories::{AffiliateRepository, DistributionRepository, PayoutRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AdminAuth;

/// POST /api/v1/payouts (admin)
pub async fn create_payout(
    State(state): State<AppState>,
    AdminAuth(auth): AdminAuth,
    Json(req): Json<CreatePayoutRequest>,
) -> Result<(StatusCode, Json<Payout>), ApiError> {
    let affiliates = AffiliateRepository::new(state.pool.clone());
    affiliates
        .find_by_id(req.affiliate_id, auth.tenant_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Affiliate not found".into()))?;

    let payouts = PayoutRepository::new(state.pool.clone());
    let distributions = DistributionRepository::new();

    let mut tx = state.pool.begin().await?;

    let amount = distributions
        .sum_unsettled_tx(&mut tx, req.affiliate_id, auth.tenant_id)
        .await?;
    if amount == 0 {
        return Err(ApiError::Validation(
            "Affiliate has no unsettled commissions".into(),
        ));
    }

    let payout = payouts
        .create_payout_tx(&mut tx, auth.tenant_id, req.affiliate_id, amount)
        .await?;

    distributions
        .settle_tx(&mut tx, req.affiliate_id, auth.tenant_id, payout.id)
        .await?;

    tx.commit().await?;

    tracing::info!(
        payout_id = %payout.id,
        affiliate_id = %req.affiliate_id,
        amount_cents = amount,
        "Payout created"
    );

    Ok((StatusCode::CREATED, Json(payout.into())))
}

/// GET /api/v1/payouts (paginated, affiliate/status filters)
pub async fn list_payouts(
    State(state): State<AppState>,
    AdminAuth(auth): AdminAuth,
    Query(query): Query<ListPayoutsQuery>,
) -> Result<Json<ListPayoutsResponse>, ApiError> {
    let (page, per_page) = clamp_page_params(query.page, query.per_page);
    let offset = page_offset(page, per_page);
    let status = query.status.map(Into::into);

    let payouts = PayoutRepository::new(state.pool.clone());
    let entities = payouts
        .list_by_tenant(
            auth.tenant_id,
            query.affiliate_id,
            status,
            per_page as i64,
            offset,
        )
        .await?;
    let total = payouts
        .count_by_tenant(auth.tenant_id, query.affiliate_id, status)
        .await?;

    Ok(Json(ListPayoutsResponse {
        data: entities.into_iter().map(Into::into).collect(),
        pagination: Pagination::new(page, per_page, total),
    }))
}

/// POST /api/v1/payouts/:id/pay (admin)
///
/// Marks a pending payout as paid. The conditional update makes repeated
/// calls idempotent in effect: a second call finds no pending row and gets
/// a conflict.
pub async fn mark_payout_paid(
    State(state): State<AppState>,
    AdminAuth(auth): AdminAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<Payout>, ApiError> {
    let payouts = PayoutRepository::new(state.pool.clone());

    let affected = payouts.mark_paid(id, auth.tenant_id).await?;
    if affected == 0 {
        let existing = payouts.find_by_id(id, auth.tenant_id).await?;
        return match existing {
            Some(p) if PayoutStatus::from(p.status) == PayoutStatus::Paid => {
                Err(ApiError::Conflict("Payout is already paid".into()))
            }
            _ => Err(ApiError::NotFound("Payout not found".into())),
        };
    }

    let payout = payouts
        .find_by_id(id, auth.tenant_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Payout not found".into()))?;

    tracing::info!(payout_id = %id, "Payout marked paid");
    Ok(Json(payout.into()))
}
