//! Staff account management (admin only).

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::rbac::RequireAdmin;
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::user::{CreateUser, UpdateUser, UserResponse};
use crate::services::user as user_service;
use crate::AppState;

/// GET /api/v1/users
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(pagination): Query<Pagination>,
) -> Result<Json<ApiResponse<PagedResult<UserResponse>>>, AppError> {
    let users = user_service::list(&state.db, &pagination).await?;
    Ok(ApiResponse::success(users))
}

/// POST /api/v1/users
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<CreateUser>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let user = user_service::create(&state.db, &body).await?;
    Ok(ApiResponse::success(user))
}

/// GET /api/v1/users/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let user = user_service::get(&state.db, id).await?;
    Ok(ApiResponse::success(user))
}

/// PUT /api/v1/users/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateUser>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let user = user_service::update(&state.db, id, &body).await?;
    Ok(ApiResponse::success(user))
}

/// DELETE /api/v1/users/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<&'static str>>, AppError> {
    user_service::delete(&state.db, id, &admin.actor()).await?;
    Ok(ApiResponse::success("User deleted"))
}
