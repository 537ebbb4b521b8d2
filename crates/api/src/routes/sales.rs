//! Sale recording endpoints.
//!
//! A sale is attributed to an affiliate by tracking link code when one is
//! provided, otherwise by referral code. The commission rate applied is the
//! affiliate's tier rate (falling back to the product's base rate) and is
//! snapshotted on the sale row; the commission is credited to the affiliate
//! and written to the distribution ledger in the same transaction.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use domain::models::affiliate::AffiliateStatus;
use domain::models::pagination::{clamp_page_params, page_offset, Pagination};
use domain::models::sale::{ListSalesQuery, ListSalesResponse, RecordSaleRequest, Sale};
use domain::services::commission::{commission_cents, effective_rate};
use persistence::entities::{AffiliateEntity, TrackingLinkEntity};
use persistence::repositories::{
    AffiliateRepository, CommissionTierRepository, DistributionRepository, ProductRepository,
    SaleRepository, TrackingLinkRepository,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AdminAuth;
use crate::middleware::metrics::record_sale_recorded;
use crate::middleware::user_auth::UserAuth;

/// POST /api/v1/sales (admin)
pub async fn record_sale(
    State(state): State<AppState>,
    AdminAuth(auth): AdminAuth,
    Json(req): Json<RecordSaleRequest>,
) -> Result<(StatusCode, Json<Sale>), ApiError> {
    req.validate()?;

    let products = ProductRepository::new(state.pool.clone());
    let product = products
        .find_by_id(req.product_id, auth.tenant_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".into()))?;

    let (affiliate, link) = resolve_attribution(&state, auth.tenant_id, &req).await?;

    let status: AffiliateStatus = affiliate.status.into();
    if status != AffiliateStatus::Active {
        return Err(ApiError::Conflict(
            "Affiliate is not active and cannot earn commissions".into(),
        ));
    }

    let tiers = CommissionTierRepository::new(state.pool.clone());
    let tier_rate = tiers
        .find_by_id(affiliate.commission_tier_id, auth.tenant_id)
        .await?
        .map(|t| t.commission_rate);

    let rate = effective_rate(product.commission_rate, tier_rate);
    let commission = commission_cents(req.amount_cents, rate);
    let occurred_at = req.occurred_at.unwrap_or_else(Utc::now);

    let sales = SaleRepository::new(state.pool.clone());
    let distributions = DistributionRepository::new();
    let affiliates = AffiliateRepository::new(state.pool.clone());
    let links = TrackingLinkRepository::new(state.pool.clone());

    let mut tx = state.pool.begin().await?;

    let sale = sales
        .create_sale_tx(
            &mut tx,
            auth.tenant_id,
            product.id,
            affiliate.id,
            link.as_ref().map(|l| l.id),
            req.amount_cents,
            rate,
            commission,
            occurred_at,
        )
        .await?;

    distributions
        .create_distribution_tx(&mut tx, auth.tenant_id, sale.id, affiliate.id, commission)
        .await?;

    affiliates
        .add_earnings_tx(&mut tx, affiliate.id, commission)
        .await?;

    if let Some(ref link) = link {
        links.record_conversion_tx(&mut tx, link.id).await?;
    }

    tx.commit().await?;

    record_sale_recorded(commission);
    tracing::info!(
        sale_id = %sale.id,
        affiliate_id = %affiliate.id,
        commission_cents = commission,
        "Sale recorded"
    );

    Ok((StatusCode::CREATED, Json(sale.into())))
}

/// GET /api/v1/sales (paginated, affiliate filter)
pub async fn list_sales(
    State(state): State<AppState>,
    auth: UserAuth,
    Query(query): Query<ListSalesQuery>,
) -> Result<Json<ListSalesResponse>, ApiError> {
    let (page, per_page) = clamp_page_params(query.page, query.per_page);
    let offset = page_offset(page, per_page);

    let sales = SaleRepository::new(state.pool.clone());
    let entities = sales
        .list_by_tenant(auth.tenant_id, query.affiliate_id, per_page as i64, offset)
        .await?;
    let total = sales
        .count_by_tenant(auth.tenant_id, query.affiliate_id)
        .await?;

    Ok(Json(ListSalesResponse {
        data: entities.into_iter().map(Into::into).collect(),
        pagination: Pagination::new(page, per_page, total),
    }))
}

/// GET /api/v1/sales/:id
pub async fn get_sale(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<Sale>, ApiError> {
    let sales = SaleRepository::new(state.pool.clone());
    let sale = sales
        .find_by_id(id, auth.tenant_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Sale not found".into()))?;
    Ok(Json(sale.into()))
}

/// Resolves the affiliate the sale is attributed to: by tracking code when
/// present, otherwise by referral code.
async fn resolve_attribution(
    state: &AppState,
    tenant_id: Uuid,
    req: &RecordSaleRequest,
) -> Result<(AffiliateEntity, Option<TrackingLinkEntity>), ApiError> {
    let affiliates = AffiliateRepository::new(state.pool.clone());

    if let Some(ref code) = req.tracking_code {
        let links = TrackingLinkRepository::new(state.pool.clone());
        let link = links
            .find_by_code(code)
            .await?
            .filter(|l| l.tenant_id == tenant_id)
            .ok_or_else(|| ApiError::NotFound("Tracking link not found".into()))?;

        let affiliate = affiliates
            .find_by_id(link.affiliate_id, tenant_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Affiliate not found".into()))?;

        return Ok((affiliate, Some(link)));
    }

    if let Some(ref code) = req.referral_code {
        let affiliate = affiliates
            .find_by_referral_code(code)
            .await?
            .filter(|a| a.tenant_id == tenant_id)
            .ok_or_else(|| ApiError::NotFound("Affiliate not found".into()))?;

        return Ok((affiliate, None));
    }

    Err(ApiError::Validation(
        "Either tracking_code or referral_code is required".into(),
    ))
}
