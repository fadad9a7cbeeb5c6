//! Health check endpoints for liveness and readiness checks.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::errors::ApiResponse;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub database: String,
    pub redis: String,
}

/// Liveness check: OK while the process runs.
pub async fn live() -> &'static str {
    "OK"
}

/// Readiness check: 503 unless both Postgres and Redis answer.
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ApiResponse<HealthStatus>>) {
    let database = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => Ok(()),
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            Err(e.to_string())
        }
    };

    let redis = match state.redis.get_multiplexed_async_connection().await {
        Ok(mut conn) => redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| {
                tracing::warn!(error = %e, "Redis health check failed");
                e.to_string()
            }),
        Err(e) => {
            tracing::warn!(error = %e, "Redis connection failed");
            Err(e.to_string())
        }
    };

    let code = if database.is_ok() && redis.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let describe = |r: Result<(), String>| match r {
        Ok(()) => "connected".to_string(),
        Err(e) => format!("error: {e}"),
    };

    (
        code,
        ApiResponse::success(HealthStatus {
            status: if code == StatusCode::OK { "ok" } else { "degraded" },
            database: describe(database),
            redis: describe(redis),
        }),
    )
}
