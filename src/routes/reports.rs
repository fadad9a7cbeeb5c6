//! General report routes: JSON, CSV export and printable document.

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};

use crate::errors::{ApiResponse, AppError};
use crate::middleware::rbac::RequireAdmin;
use crate::services::document::{self, DocumentQuery};
use crate::services::report::{self as report_service, GeneralReport};
use crate::AppState;

/// GET /api/v1/reports/general
pub async fn general(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<ApiResponse<GeneralReport>>, AppError> {
    let report = report_service::general(&state.db).await?;
    Ok(ApiResponse::success(report))
}

/// GET /api/v1/reports/general/csv
pub async fn general_csv(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<impl IntoResponse, AppError> {
    let report = report_service::general(&state.db).await?;
    let csv = report_service::to_csv(&report)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"relatorio-geral.csv\"",
            ),
        ],
        csv,
    ))
}

/// GET /api/v1/reports/general/document?format=pdf|text
pub async fn general_document(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<DocumentQuery>,
) -> Result<impl IntoResponse, AppError> {
    let report = report_service::general(&state.db).await?;
    let text = document::render_report(&state.config.company, &report);
    let doc = query.format.render("Relatório Geral", text)?;
    Ok((
        [
            (header::CONTENT_TYPE, doc.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"relatorio-geral.{}\"", doc.extension),
            ),
        ],
        doc.body,
    ))
}
