//! Vehicle routes.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::vehicle::{CreateVehicle, UpdateVehicle, Vehicle, VehicleSummary};
use crate::services::vehicle::{self as vehicle_service, VehicleFilters};
use crate::AppState;

/// GET /api/v1/vehicles
pub async fn list(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(pagination): Query<Pagination>,
    Query(filters): Query<VehicleFilters>,
) -> Result<Json<ApiResponse<PagedResult<VehicleSummary>>>, AppError> {
    let result = vehicle_service::list(&state.db, &filters, &pagination).await?;
    Ok(ApiResponse::success(result))
}

/// POST /api/v1/vehicles
pub async fn create(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(body): Json<CreateVehicle>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    let vehicle = vehicle_service::create(&state.db, &body).await?;
    Ok(ApiResponse::success(vehicle))
}

/// GET /api/v1/vehicles/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    let vehicle = vehicle_service::find_by_id(&state.db, id).await?;
    Ok(ApiResponse::success(vehicle))
}

/// PUT /api/v1/vehicles/{id}
pub async fn update(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateVehicle>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    let vehicle = vehicle_service::update(&state.db, id, &body).await?;
    Ok(ApiResponse::success(vehicle))
}

/// DELETE /api/v1/vehicles/{id}
pub async fn delete(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<&'static str>>, AppError> {
    vehicle_service::delete(&state.db, id).await?;
    Ok(ApiResponse::success("Vehicle deleted"))
}
