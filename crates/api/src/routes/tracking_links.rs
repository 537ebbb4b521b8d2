//! Tracking link endpoints.
//!
//! Affiliates create and list their own links; admins see every link in the
//! tenant. The click endpoints are public: promotional URLs are followed by
//! anonymous visitors.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Redirect,
    Json,
};
use serde::Serialize;
use serde_json::json;
use validator::Validate;

use domain::models::tracking_link::{
    tracking_link_url, CreateTrackingLinkRequest, ListTrackingLinksResponse, TrackingLink,
};
use persistence::entities::TrackingLinkEntity;
use persistence::repositories::{AffiliateRepository, ProductRepository, TrackingLinkRepository};
use shared::codes::generate_tracking_code;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_link_click;
use crate::middleware::user_auth::UserAuth;

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TrackingLinkResponse {
    #[serde(flatten)]
    pub link: TrackingLink,
    pub url: String,
}

/// GET /api/v1/tracking-links
///
/// Affiliates see their own links; admins see all links for the tenant.
pub async fn list_links(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<ListTrackingLinksResponse>, ApiError> {
    let links = TrackingLinkRepository::new(state.pool.clone());

    let entities = if auth.role.is_admin() {
        links.list_by_tenant(auth.tenant_id).await?
    } else {
        let affiliates = AffiliateRepository::new(state.pool.clone());
        let affiliate = affiliates
            .find_by_user(auth.user_id, auth.tenant_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Affiliate profile not found".into()))?;
        links.list_by_affiliate(affiliate.id, auth.tenant_id).await?
    };

    Ok(Json(ListTrackingLinksResponse {
        data: entities.into_iter().map(Into::into).collect(),
    }))
}

/// POST /api/v1/tracking-links
///
/// Creates a link owned by the caller's affiliate profile.
pub async fn create_link(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(req): Json<CreateTrackingLinkRequest>,
) -> Result<(StatusCode, Json<TrackingLinkResponse>), ApiError> {
    req.validate()?;

    let affiliates = AffiliateRepository::new(state.pool.clone());
    let affiliate = affiliates
        .find_by_user(auth.user_id, auth.tenant_id)
        .await?
        .ok_or_else(|| {
            ApiError::Forbidden("Only affiliates can create tracking links".into())
        })?;

    let products = ProductRepository::new(state.pool.clone());
    products
        .find_by_id(req.product_id, auth.tenant_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".into()))?;

    let links = TrackingLinkRepository::new(state.pool.clone());
    let code = links.generate_unique_code(generate_tracking_code).await?;

    let entity = links
        .create_link(
            auth.tenant_id,
            affiliate.id,
            req.product_id,
            &code,
            &req.destination_url,
            req.utm_source.as_deref(),
            req.utm_medium.as_deref(),
            req.utm_campaign.as_deref(),
            req.expires_at,
        )
        .await?;

    tracing::info!(link_id = %entity.id, affiliate_id = %affiliate.id, "Tracking link created");

    let url = tracking_link_url(&state.config.server.app_base_url, &code);
    Ok((
        StatusCode::CREATED,
        Json(TrackingLinkResponse {
            link: entity.into(),
            url,
        }),
    ))
}

/// POST /api/v1/tracking-links/:code/click (public counter)
pub async fn record_click(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let entity = click(&state, &code).await?;
    Ok(Json(json!({
        "destination_url": entity.destination_url,
        "click_count": entity.click_count,
    })))
}

/// GET /t/:code (public redirect)
///
/// Counts the click and redirects to the destination with the link's UTM
/// parameters appended.
pub async fn follow_link(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Redirect, ApiError> {
    let entity = click(&state, &code).await?;
    let link: TrackingLink = entity.into();
    Ok(Redirect::temporary(&destination_with_utm(&link)))
}

/// Shared click recording with unknown/expired discrimination.
async fn click(state: &AppState, code: &str) -> Result<TrackingLinkEntity, ApiError> {
    let links = TrackingLinkRepository::new(state.pool.clone());

    match links.record_click(code).await? {
        Some(entity) => {
            record_link_click();
            Ok(entity)
        }
        // The atomic update skips expired links; look the code up again to
        // tell expired apart from unknown.
        None => match links.find_by_code(code).await? {
            Some(_) => Err(ApiError::Gone("Tracking link has expired".into())),
            None => Err(ApiError::NotFound("Tracking link not found".into())),
        },
    }
}

fn destination_with_utm(link: &TrackingLink) -> String {
    let mut params: Vec<String> = Vec::new();
    if let Some(ref source) = link.utm_source {
        params.push(format!("utm_source={}", source));
    }
    if let Some(ref medium) = link.utm_medium {
        params.push(format!("utm_medium={}", medium));
    }
    if let Some(ref campaign) = link.utm_campaign {
        params.push(format!("utm_campaign={}", campaign));
    }

    if params.is_empty() {
        return link.destination_url.clone();
    }

    let separator = if link.destination_url.contains('?') {
        '&'
    } else {
        '?'
    };
    format!("{}{}{}", link.destination_url, separator, params.join("&"))
}
