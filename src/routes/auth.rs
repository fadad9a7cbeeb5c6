//! Authentication routes: login, refresh, logout, sign-up, profile.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Deserialize;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::models::user::{SignUp, UserResponse};
use crate::services::auth::{self as auth_service, TokenExpiry, TokenPair};
use crate::services::session;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email address or username.
    #[serde(alias = "email", alias = "username")]
    pub login: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

fn expiry(state: &AppState) -> TokenExpiry {
    TokenExpiry {
        access_secs: state.config.jwt_access_token_expiry_secs,
        refresh_secs: state.config.jwt_refresh_token_expiry_secs,
    }
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<ApiResponse<TokenPair>>, AppError> {
    let tokens = auth_service::login(
        &state.db,
        &body.login,
        &body.password,
        &state.config.jwt_secret,
        expiry(&state),
    )
    .await?;

    Ok(ApiResponse::success(tokens))
}

/// POST /api/v1/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<TokenPair>>, AppError> {
    let tokens = auth_service::refresh_token(
        &state.db,
        &body.refresh_token,
        &state.config.jwt_secret,
        expiry(&state),
    )
    .await?;

    Ok(ApiResponse::success(tokens))
}

/// POST /api/v1/auth/logout - revokes the presented access token until it expires.
pub async fn logout(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<ApiResponse<&'static str>>, AppError> {
    let ttl = session::remaining_ttl(current_user.expires_at, Utc::now().timestamp());
    session::revoke(&state.redis, &current_user.token, ttl).await?;
    tracing::info!(user_id = %current_user.id, "User logged out");
    Ok(ApiResponse::success("Logged out successfully"))
}

/// POST /api/v1/auth/signup - public employee sign-up, when enabled.
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignUp>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    if !state.config.allow_signup {
        return Err(AppError::Forbidden("Sign-up is disabled".to_string()));
    }
    let user = auth_service::sign_up(&state.db, &body).await?;
    Ok(ApiResponse::success(UserResponse::from(user)))
}

/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let user = auth_service::find_user_by_id(&state.db, current_user.id).await?;
    Ok(ApiResponse::success(UserResponse::from(user)))
}
