//! User endpoints.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use domain::models::pagination::{clamp_page_params, page_offset, Pagination};
use domain::models::user::{ListUsersQuery, UserResponse};
use persistence::repositories::UserRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AdminAuth;
use crate::middleware::user_auth::UserAuth;

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListUsersResponse {
    pub data: Vec<UserResponse>,
    pub pagination: Pagination,
}

/// GET /api/v1/users/me
pub async fn get_current_user(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<UserResponse>, ApiError> {
    let users = UserRepository::new(state.pool.clone());
    let user = users
        .find_by_id(auth.user_id)
        .await?
        .filter(|u| u.tenant_id == auth.tenant_id)
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    let user: domain::models::User = user.into();
    Ok(Json(user.into()))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct SetPasswordRequest {
    /// Required once the user has a password; invited users setting their
    /// first password omit it.
    pub current_password: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

/// PUT /api/v1/users/me/password
pub async fn set_password(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(req): Json<SetPasswordRequest>,
) -> Result<StatusCode, ApiError> {
    req.validate()?;

    state
        .auth
        .set_password(
            auth.user_id,
            req.current_password.as_deref(),
            &req.new_password,
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/users (admin, paginated, optional role filter)
pub async fn list_users(
    State(state): State<AppState>,
    AdminAuth(auth): AdminAuth,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<ListUsersResponse>, ApiError> {
    let (page, per_page) = clamp_page_params(query.page, query.per_page);
    let offset = page_offset(page, per_page);
    let role = query.role.map(Into::into);

    let users = UserRepository::new(state.pool.clone());

    let entities = users
        .list_by_tenant(auth.tenant_id, role, per_page as i64, offset)
        .await?;
    let total = users.count_by_tenant(auth.tenant_id, role).await?;

    let data = entities
        .into_iter()
        .map(|e| {
            let user: domain::models::User = e.into();
            user.into()
        })
        .collect();

    Ok(Json(ListUsersResponse {
        data,
        pagination: Pagination::new(page, per_page, total),
    }))
}
