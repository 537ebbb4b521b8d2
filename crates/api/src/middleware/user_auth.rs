//! Bearer-token authentication.
//!
//! Tokens carry the tenant id and role, so tenant scoping needs no extra
//! database lookup; handlers read the validated [`UserAuth`] from request
//! extensions.

use std::str::FromStr;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use domain::models::user::UserRole;
use shared::jwt::{extract_identity, JwtConfig};

use crate::app::AppState;

/// Identity carried by a validated access token.
#[derive(Debug, Clone)]
pub struct UserAuth {
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub role: UserRole,
    /// Token id, used for session correlation.
    pub jti: String,
}

impl UserAuth {
    /// Validates an access token and extracts the identity it carries.
    pub fn validate(jwt_config: &JwtConfig, token: &str) -> Result<Self, String> {
        let claims = jwt_config
            .validate_access_token(token)
            .map_err(|e| format!("Invalid token: {}", e))?;
        let identity =
            extract_identity(&claims).map_err(|_| "Invalid identity in token".to_string())?;
        let role =
            UserRole::from_str(&claims.role).map_err(|_| "Invalid role in token".to_string())?;

        Ok(UserAuth {
            user_id: identity.user_id,
            tenant_id: identity.tenant_id,
            role,
            jti: claims.jti,
        })
    }
}

/// Rejects requests without a valid Bearer access token and stores the
/// identity in extensions for handlers and the rate limiter.
pub async fn require_user_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(&req) else {
        return unauthorized_response("Missing or invalid Authorization header");
    };

    match UserAuth::validate(&state.jwt, token) {
        Ok(auth) => {
            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Err(reason) => {
            tracing::debug!("Token rejected: {}", reason);
            unauthorized_response("Invalid or expired token")
        }
    }
}

fn bearer_token(req: &Request<Body>) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "message": message,
        })),
    )
        .into_response()
}
