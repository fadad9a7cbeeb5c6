//! Customer routes, including the admin-only service history.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::middleware::rbac::RequireAdmin;
use crate::models::customer::{CreateCustomer, Customer, UpdateCustomer};
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::service_history::{CreateHistoryEntry, ServiceHistoryEntry};
use crate::services::customer::{self as customer_service, CustomerFilters};
use crate::services::history;
use crate::AppState;

/// GET /api/v1/customers
pub async fn list(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(pagination): Query<Pagination>,
    Query(filters): Query<CustomerFilters>,
) -> Result<Json<ApiResponse<PagedResult<Customer>>>, AppError> {
    let result = customer_service::list(&state.db, &filters, &pagination).await?;
    Ok(ApiResponse::success(result))
}

/// POST /api/v1/customers
pub async fn create(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(body): Json<CreateCustomer>,
) -> Result<Json<ApiResponse<Customer>>, AppError> {
    let customer = customer_service::create(&state.db, &body).await?;
    Ok(ApiResponse::success(customer))
}

/// GET /api/v1/customers/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Customer>>, AppError> {
    let customer = customer_service::find_by_id(&state.db, id).await?;
    Ok(ApiResponse::success(customer))
}

/// PUT /api/v1/customers/{id}
pub async fn update(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateCustomer>,
) -> Result<Json<ApiResponse<Customer>>, AppError> {
    let customer = customer_service::update(&state.db, id, &body).await?;
    Ok(ApiResponse::success(customer))
}

/// DELETE /api/v1/customers/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<&'static str>>, AppError> {
    customer_service::delete(&state.db, id, &user.actor()).await?;
    Ok(ApiResponse::success("Customer deleted"))
}

/// GET /api/v1/customers/{id}/history
pub async fn list_history(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<ServiceHistoryEntry>>>, AppError> {
    let entries = history::list_for_customer(&state.db, id).await?;
    Ok(ApiResponse::success(entries))
}

/// POST /api/v1/customers/{id}/history
pub async fn add_history(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(body): Json<CreateHistoryEntry>,
) -> Result<Json<ApiResponse<ServiceHistoryEntry>>, AppError> {
    let entry = history::add_entry(&state.db, id, &body).await?;
    Ok(ApiResponse::success(entry))
}
