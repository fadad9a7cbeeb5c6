//! Dashboard statistics route.

use axum::{extract::State, Json};

use crate::errors::{ApiResponse, AppError};
use crate::middleware::rbac::RequireAdmin;
use crate::services::dashboard::{self as dashboard_service, DashboardStats};
use crate::AppState;

/// GET /api/v1/dashboard/stats
pub async fn stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<ApiResponse<DashboardStats>>, AppError> {
    let stats = dashboard_service::get_stats(&state.db, &state.config).await?;
    Ok(ApiResponse::success(stats))
}
