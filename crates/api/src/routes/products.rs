//! Product catalog endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use domain::models::pagination::{clamp_page_params, page_offset, Pagination};
use domain::models::product::{
    CreateProductRequest, ListProductsQuery, ListProductsResponse, Product, UpdateProductRequest,
};
use domain::models::{Plan, PlanLimit};
use persistence::repositories::{ProductRepository, TenantRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AdminAuth;
use crate::middleware::user_auth::UserAuth;

/// GET /api/v1/products
pub async fn list_products(
    State(state): State<AppState>,
    auth: UserAuth,
    Query(query): Query<ListProductsQuery>,
) -> Result<Json<ListProductsResponse>, ApiError> {
    let (page, per_page) = clamp_page_params(query.page, query.per_page);
    let offset = page_offset(page, per_page);

    let products = ProductRepository::new(state.pool.clone());
    let entities = products
        .list_by_tenant(auth.tenant_id, query.is_active, per_page as i64, offset)
        .await?;
    let total = products
        .count_by_tenant(auth.tenant_id, query.is_active)
        .await?;

    Ok(Json(ListProductsResponse {
        data: entities.into_iter().map(Into::into).collect(),
        pagination: Pagination::new(page, per_page, total),
    }))
}

/// GET /api/v1/products/:id
pub async fn get_product(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, ApiError> {
    let products = ProductRepository::new(state.pool.clone());
    let product = products
        .find_by_id(id, auth.tenant_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".into()))?;
    Ok(Json(product.into()))
}

/// POST /api/v1/products (admin)
pub async fn create_product(
    State(state): State<AppState>,
    AdminAuth(auth): AdminAuth,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    req.validate()?;

    let tenants = TenantRepository::new(state.pool.clone());
    let tenant = tenants
        .find_by_id(auth.tenant_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Tenant not found".into()))?;

    let plan: Plan = tenant.plan.into();
    let count = tenants.count_products(auth.tenant_id).await?;
    if plan.has_reached_limit(PlanLimit::MaxProducts, count) {
        return Err(ApiError::PlanLimit(format!(
            "Product limit reached for the {} plan",
            plan
        )));
    }

    let products = ProductRepository::new(state.pool.clone());
    let product = products
        .create_product(
            auth.tenant_id,
            &req.name,
            req.description.as_deref(),
            req.price_cents,
            req.commission_rate,
        )
        .await?;

    tracing::info!(product_id = %product.id, tenant_id = %auth.tenant_id, "Product created");
    Ok((StatusCode::CREATED, Json(product.into())))
}

/// PUT /api/v1/products/:id (admin)
pub async fn update_product(
    State(state): State<AppState>,
    AdminAuth(auth): AdminAuth,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<Product>, ApiError> {
    req.validate()?;

    let products = ProductRepository::new(state.pool.clone());
    let product = products
        .update_product(
            id,
            auth.tenant_id,
            req.name.as_deref(),
            req.description.as_deref(),
            req.price_cents,
            req.commission_rate,
            req.is_active,
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".into()))?;

    Ok(Json(product.into()))
}

/// DELETE /api/v1/products/:id (admin, soft-deactivate)
pub async fn delete_product(
    State(state): State<AppState>,
    AdminAuth(auth): AdminAuth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let products = ProductRepository::new(state.pool.clone());
    let affected = products.deactivate(id, auth.tenant_id).await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Product not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}
