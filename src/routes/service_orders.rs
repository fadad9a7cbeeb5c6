//! Service order routes and the printable order sheet.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::service_order::{
    CreateServiceOrder, ServiceOrder, ServiceOrderDetails, UpdateServiceOrder,
};
use crate::services::document::{self, DocumentQuery};
use crate::services::service_order::{self as order_service, OrderFilters};
use crate::AppState;

/// GET /api/v1/service-orders
pub async fn list(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(pagination): Query<Pagination>,
    Query(filters): Query<OrderFilters>,
) -> Result<Json<ApiResponse<PagedResult<ServiceOrderDetails>>>, AppError> {
    let result = order_service::list(&state.db, &filters, &pagination).await?;
    Ok(ApiResponse::success(result))
}

/// POST /api/v1/service-orders
pub async fn create(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(body): Json<CreateServiceOrder>,
) -> Result<Json<ApiResponse<ServiceOrder>>, AppError> {
    let order = order_service::create(&state.db, &body).await?;
    Ok(ApiResponse::success(order))
}

/// GET /api/v1/service-orders/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ServiceOrderDetails>>, AppError> {
    let order = order_service::find_details(&state.db, id).await?;
    Ok(ApiResponse::success(order))
}

/// PUT /api/v1/service-orders/{id}
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateServiceOrder>,
) -> Result<Json<ApiResponse<ServiceOrder>>, AppError> {
    let order = order_service::update(&state.db, id, &body, &user.actor()).await?;
    Ok(ApiResponse::success(order))
}

/// DELETE /api/v1/service-orders/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<&'static str>>, AppError> {
    order_service::delete(&state.db, id, &user.actor()).await?;
    Ok(ApiResponse::success("Service order deleted"))
}

/// GET /api/v1/service-orders/{id}/document?format=pdf|text
pub async fn document(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
    Query(query): Query<DocumentQuery>,
) -> Result<impl IntoResponse, AppError> {
    let order = order_service::find_details(&state.db, id).await?;
    let text = document::render_order_sheet(&state.config.company, &order);
    let doc = query.format.render("Ordem de Serviço", text)?;
    Ok((
        [
            (header::CONTENT_TYPE, doc.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"ordem-servico-{id}.{}\"", doc.extension),
            ),
        ],
        doc.body,
    ))
}
