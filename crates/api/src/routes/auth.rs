//! Authentication endpoints: signup, login, refresh, logout.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use domain::models::tenant::Tenant;
use domain::models::user::UserResponse;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::TokenPair;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct SignupRequest {
    #[validate(length(min = 2, max = 255, message = "Tenant name must be 2-255 characters"))]
    pub tenant_name: String,
    #[validate(length(min = 2, max = 63, message = "Slug must be 2-63 characters"))]
    pub slug: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 255, message = "Display name is required"))]
    pub display_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SignupResponse {
    pub tenant: Tenant,
    pub user: UserResponse,
    pub tokens: TokenPair,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct LoginResponse {
    pub user: UserResponse,
    pub tokens: TokenPair,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LogoutRequest {
    pub refresh_token: String,
    #[serde(default)]
    pub all_devices: bool,
}

/// POST /api/v1/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    req.validate()?;

    let (tenant, user, tokens) = state
        .auth
        .signup(
            &req.tenant_name,
            &req.slug,
            &req.email,
            &req.password,
            &req.display_name,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            tenant,
            user: user.into(),
            tokens,
        }),
    ))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    req.validate()?;

    let (user, tokens) = state.auth.login(&req.email, &req.password).await?;

    Ok(Json(LoginResponse {
        user: user.into(),
        tokens,
    }))
}

/// POST /api/v1/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<TokenPair>, ApiError> {
    let tokens = state.auth.refresh(&req.refresh_token).await?;
    Ok(Json(tokens))
}

/// POST /api/v1/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    Json(req): Json<LogoutRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .auth
        .logout(&req.refresh_token, req.all_devices)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
